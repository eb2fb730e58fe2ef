#![forbid(unsafe_code)]

//! Keyboard interception.
//!
//! Two concerns run side by side:
//!
//! 1. **Global capture** ([`Interceptor`]): always on. Every key-down adds
//!    its symbol to the held set, every key-up clears the whole set, and
//!    each key-down is then classified as a toggle, a candidate hotkey, or
//!    nothing. Held-key mutation always happens before classification.
//! 2. **Suppression** ([`SuppressionGuard`]): installed only while hints are
//!    shown. One listener per key event class prevents the default action
//!    and stops all further propagation, leaving the host's own keyboard
//!    handling inert.
//!
//! While the focused element accepts typing (see [`is_typing_context`]),
//! key-downs are neither toggles nor hotkeys.
//!
//! # Held keys
//!
//! Any key-up clears every held key, not just the released one. Releasing
//! one key of a multi-key chord therefore forgets the others as well.

use std::cell::Cell;
use std::collections::BTreeSet;
use std::rc::Rc;

use claw_core::chord::ToggleChord;
use claw_core::event::{KeyEvent, KeyEventClass};
use claw_core::key::KeySymbol;

use crate::host::{CaptureListener, CaptureTarget, ElementKind, FocusState, KeyDispatch, ListenerId};

/// Whether the focused element is accepting text input.
///
/// True for inputs, text areas, content-editable elements and elements with
/// a textbox role, unless read-only or disabled.
#[must_use]
pub fn is_typing_context(focus: Option<&FocusState>) -> bool {
    let Some(focus) = focus else {
        return false;
    };
    let editable = matches!(focus.kind, ElementKind::Input | ElementKind::TextArea)
        || focus.content_editable
        || focus.textbox_role;
    editable && !focus.read_only && !focus.disabled
}

/// Non-modifier keys currently held down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeldKeys {
    keys: BTreeSet<KeySymbol>,
}

impl HeldKeys {
    /// Record a key-down. Modifier keys are tracked through event flags
    /// instead and are not recorded.
    pub fn press(&mut self, event: &KeyEvent) {
        if !event.code.is_modifier() {
            self.keys.insert(event.symbol());
        }
    }

    /// Forget every held key.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Whether `symbol` is held.
    #[must_use]
    pub fn contains(&self, symbol: &KeySymbol) -> bool {
        self.keys.contains(symbol)
    }

    /// Number of held keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// How the global capture classified one key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interception {
    /// A key-up; the held set was cleared.
    Released,
    /// A key-down while the user is typing; nothing else happens.
    Typing,
    /// The toggle chord is satisfied.
    Toggle,
    /// A key-down that may select a hint.
    Key(KeySymbol),
}

/// Always-on key classifier owning the held-key set.
#[derive(Debug, Clone)]
pub struct Interceptor {
    chord: ToggleChord,
    held: HeldKeys,
}

impl Interceptor {
    /// Create an interceptor recognizing `chord`.
    #[must_use]
    pub fn new(chord: ToggleChord) -> Self {
        Self {
            chord,
            held: HeldKeys::default(),
        }
    }

    /// Update the held set for `event`, then classify it.
    pub fn classify(&mut self, event: &KeyEvent, typing: bool) -> Interception {
        if !event.is_down() {
            self.held.clear();
            return Interception::Released;
        }

        self.held.press(event);

        if typing {
            return Interception::Typing;
        }

        if self.chord_pressed(event) {
            return Interception::Toggle;
        }

        Interception::Key(event.symbol())
    }

    fn chord_pressed(&self, event: &KeyEvent) -> bool {
        let matched = self
            .chord
            .is_satisfied_by(event.modifiers, |sym| self.held.contains(sym));
        tracing::trace!(
            chord = %self.chord,
            modifiers = ?event.modifiers,
            held = self.held.len(),
            matched,
            "toggle chord evaluated"
        );
        matched
    }

    /// Current held keys.
    #[must_use]
    pub fn held(&self) -> &HeldKeys {
        &self.held
    }

    /// The configured chord.
    #[must_use]
    pub fn chord(&self) -> &ToggleChord {
        &self.chord
    }
}

/// Shared flag read by suppression listeners.
#[derive(Debug, Clone, Default)]
pub struct VisibilityFlag(Rc<Cell<bool>>);

impl VisibilityFlag {
    /// Set the flag.
    pub fn set(&self, visible: bool) {
        self.0.set(visible);
    }

    /// Read the flag.
    #[must_use]
    pub fn get(&self) -> bool {
        self.0.get()
    }
}

/// Listener that swallows keyboard traffic while hints are shown.
#[derive(Debug)]
struct Suppressor {
    visible: VisibilityFlag,
}

impl CaptureListener for Suppressor {
    fn handle(&self, dispatch: &mut KeyDispatch) {
        if self.visible.get() {
            dispatch.prevent_default();
            dispatch.stop_immediate_propagation();
            dispatch.stop_propagation();
        }
    }
}

/// Scoped ownership of the suppression listeners.
///
/// Acquiring installs one listener per [`KeyEventClass`]; releasing (or
/// dropping) removes exactly those listeners by identity.
#[must_use = "dropping the guard removes the suppression listeners"]
pub struct SuppressionGuard {
    target: Rc<dyn CaptureTarget>,
    installed: Vec<(KeyEventClass, ListenerId)>,
}

impl SuppressionGuard {
    /// Install suppression listeners on `target` gated by `visible`.
    pub fn acquire(target: Rc<dyn CaptureTarget>, visible: VisibilityFlag) -> Self {
        let listener: Rc<dyn CaptureListener> = Rc::new(Suppressor { visible });
        let installed = KeyEventClass::ALL
            .iter()
            .map(|class| {
                let id = target.add_capture_listener(*class, Rc::clone(&listener));
                (*class, id)
            })
            .collect::<Vec<_>>();
        tracing::trace!(listeners = installed.len(), "suppression acquired");
        Self { target, installed }
    }

    /// Number of listeners this guard owns.
    #[must_use]
    pub fn installed(&self) -> usize {
        self.installed.len()
    }

    /// Remove the listeners. Returns how many the target actually removed.
    pub fn release(mut self) -> usize {
        self.remove_all()
    }

    fn remove_all(&mut self) -> usize {
        let mut removed = 0;
        for (class, id) in self.installed.drain(..) {
            if self.target.remove_capture_listener(class, id) {
                removed += 1;
            }
        }
        removed
    }
}

impl Drop for SuppressionGuard {
    fn drop(&mut self) {
        if !self.installed.is_empty() {
            tracing::warn!(
                listeners = self.installed.len(),
                "suppression guard dropped without release"
            );
            self.remove_all();
        }
    }
}

impl std::fmt::Debug for SuppressionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuppressionGuard")
            .field("installed", &self.installed)
            .finish_non_exhaustive()
    }
}
