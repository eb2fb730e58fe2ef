#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! The host pushes these into the engine. Keyboard events carry the key, the
//! modifier flags reported by the host at dispatch time, and whether the key
//! went down or up. Environment notifications (resize, scroll, wheel, click)
//! carry no payload; the engine re-queries geometry when it relabels.
//!
//! # Design Notes
//!
//! - `KeyEventKind` defaults to `Press`. `Repeat` is a held-down key-down.
//! - `Modifiers` use bitflags and reflect the host's flags on the event, not
//!   a reconstruction from earlier key-downs.
//! - Key names follow the DOM `KeyboardEvent.key` vocabulary so hosts can
//!   forward them through [`KeyCode::from_key_name`]. Names outside the
//!   enumerated set are kept verbatim in [`KeyCode::Named`], so any key the
//!   host reports can take part in a chord.

use bitflags::bitflags;

use crate::key::KeySymbol;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),

    /// The viewport was resized.
    Resize {
        /// New viewport width.
        width: f64,
        /// New viewport height.
        height: f64,
    },

    /// The document scrolled.
    Scroll,

    /// A wheel gesture was observed.
    Wheel,

    /// A pointer click landed somewhere in the document.
    Click,

    /// The host clock advanced; pending timers may be due.
    Tick,
}

/// A keyboard event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed or released.
    pub code: KeyCode,

    /// Modifier flags active during the event.
    pub modifiers: Modifiers,

    /// Press, repeat, or release.
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a key-down event with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Shorthand for the matching key-up event.
    #[must_use]
    pub const fn released(self) -> Self {
        self.with_kind(KeyEventKind::Release)
    }

    /// True for press and repeat.
    #[must_use]
    pub const fn is_down(&self) -> bool {
        matches!(self.kind, KeyEventKind::Press | KeyEventKind::Repeat)
    }

    /// Listener class this event is delivered under.
    #[must_use]
    pub const fn class(&self) -> KeyEventClass {
        if self.is_down() {
            KeyEventClass::KeyDown
        } else {
            KeyEventClass::KeyUp
        }
    }

    /// Upper-cased symbol of the key.
    #[must_use]
    pub fn symbol(&self) -> KeySymbol {
        self.code.symbol()
    }

    /// Check if Shift is active.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Check if Alt is active.
    #[must_use]
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    /// Check if Control is active.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Check if Meta is active.
    #[must_use]
    pub const fn meta(&self) -> bool {
        self.modifiers.contains(Modifiers::META)
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A character-producing key.
    Char(char),

    /// Shift modifier key.
    Shift,

    /// Alt/Option modifier key.
    Alt,

    /// Control modifier key.
    Control,

    /// Meta/Super/Command modifier key.
    Meta,

    /// Enter/Return key.
    Enter,

    /// Escape key.
    Escape,

    /// Backspace key.
    Backspace,

    /// Tab key.
    Tab,

    /// Delete key.
    Delete,

    /// Home key.
    Home,

    /// End key.
    End,

    /// Page Up key.
    PageUp,

    /// Page Down key.
    PageDown,

    /// Up arrow key.
    Up,

    /// Down arrow key.
    Down,

    /// Left arrow key.
    Left,

    /// Right arrow key.
    Right,

    /// Function key (F1-F24).
    F(u8),

    /// Any other key, by its normalized host name (`CAPSLOCK`, `INSERT`).
    Named(KeySymbol),

    /// The host reported the key as `Unidentified`.
    Unidentified,
}

impl KeyCode {
    /// Parse a DOM-style key name (`"a"`, `"Shift"`, `"ArrowUp"`, `"F5"`).
    ///
    /// Single characters map to [`KeyCode::Char`]. Names without a
    /// dedicated variant map to [`KeyCode::Named`]; only the literal
    /// `"Unidentified"` (or an empty name) maps to [`KeyCode::Unidentified`].
    #[must_use]
    pub fn from_key_name(name: &str) -> Self {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (None, _) => return Self::Unidentified,
            (Some(c), None) => return Self::Char(c),
            _ => {}
        }
        match name {
            "Shift" => Self::Shift,
            "Alt" | "AltGraph" => Self::Alt,
            "Control" => Self::Control,
            "Meta" | "OS" | "Super" => Self::Meta,
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            "Backspace" => Self::Backspace,
            "Tab" => Self::Tab,
            "Delete" | "Del" => Self::Delete,
            "Home" => Self::Home,
            "End" => Self::End,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "ArrowUp" | "Up" => Self::Up,
            "ArrowDown" | "Down" => Self::Down,
            "ArrowLeft" | "Left" => Self::Left,
            "ArrowRight" | "Right" => Self::Right,
            "Unidentified" => Self::Unidentified,
            _ => name
                .strip_prefix('F')
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|n| (1..=24).contains(n))
                .map_or_else(|| Self::Named(KeySymbol::new(name)), Self::F),
        }
    }

    /// True for Shift, Alt, Control and Meta.
    #[must_use]
    pub const fn is_modifier(&self) -> bool {
        matches!(self, Self::Shift | Self::Alt | Self::Control | Self::Meta)
    }

    /// Upper-cased symbolic name, as compared against pools and chords.
    #[must_use]
    pub fn symbol(&self) -> KeySymbol {
        match self {
            Self::Char(c) => KeySymbol::from(*c),
            Self::F(n) => KeySymbol::new(&format!("F{n}")),
            Self::Named(symbol) => symbol.clone(),
            other => KeySymbol::new(other.name()),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Char(_) | Self::F(_) | Self::Named(_) => "",
            Self::Shift => "SHIFT",
            Self::Alt => "ALT",
            Self::Control => "CONTROL",
            Self::Meta => "META",
            Self::Enter => "ENTER",
            Self::Escape => "ESCAPE",
            Self::Backspace => "BACKSPACE",
            Self::Tab => "TAB",
            Self::Delete => "DELETE",
            Self::Home => "HOME",
            Self::End => "END",
            Self::PageUp => "PAGEUP",
            Self::PageDown => "PAGEDOWN",
            Self::Up => "ARROWUP",
            Self::Down => "ARROWDOWN",
            Self::Left => "ARROWLEFT",
            Self::Right => "ARROWRIGHT",
            Self::Unidentified => "UNIDENTIFIED",
        }
    }
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key went down.
    #[default]
    Press,

    /// Key is being held (auto-repeat key-down).
    Repeat,

    /// Key went up.
    Release,
}

/// Listener classes a host dispatches keyboard traffic under.
///
/// `KeyPress` is the legacy character-producing class some hosts still fire
/// between key-down and key-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyEventClass {
    /// Key-down (including repeats).
    KeyDown,
    /// Character-producing key press.
    KeyPress,
    /// Key-up.
    KeyUp,
}

impl KeyEventClass {
    /// Every class, in installation order.
    pub const ALL: [Self; 3] = [Self::KeyDown, Self::KeyPress, Self::KeyUp];
}

bitflags! {
    /// Modifier flags active during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Meta/Super/Command key.
        const META  = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

impl Modifiers {
    /// Parse a modifier name as used in chord configuration.
    ///
    /// Accepts `SHIFT`, `ALT`/`OPTION`, `CONTROL`/`CTRL` and
    /// `META`/`SUPER`/`CMD`, case-insensitively. Distinct from the
    /// bitflags-generated `from_name`, which only knows the flag names.
    #[must_use]
    pub fn from_chord_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "SHIFT" => Some(Self::SHIFT),
            "ALT" | "OPTION" => Some(Self::ALT),
            "CONTROL" | "CTRL" => Some(Self::CTRL),
            "META" | "SUPER" | "CMD" => Some(Self::META),
            _ => None,
        }
    }
}
