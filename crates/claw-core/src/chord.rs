#![forbid(unsafe_code)]

//! Toggle chord definition and matching.
//!
//! A chord is a set of modifier names plus zero or more non-modifier key
//! symbols. It matches when every named modifier is active on the current
//! event and every named non-modifier key is currently held. Key-down order
//! is irrelevant.
//!
//! Several non-modifier keys are allowed; all of them must be held at once.
//! The default chord `G`+`H` is such a chord.

use std::fmt;

use crate::config::ConfigError;
use crate::event::Modifiers;
use crate::key::KeySymbol;

/// Chord used when none is configured.
pub const DEFAULT_TOGGLE_KEYS: [&str; 2] = ["G", "H"];

/// Key combination that switches hint mode on and off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleChord {
    modifiers: Modifiers,
    keys: Vec<KeySymbol>,
}

impl ToggleChord {
    /// Build a chord from symbolic key names.
    ///
    /// Modifier names are recognized by [`Modifiers::from_chord_name`]; anything
    /// else is a non-modifier key. Repeated names collapse.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyToggleChord`] if no names are given.
    /// - [`ConfigError::UnknownKeyName`] for a blank name.
    pub fn new<I, S>(names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut modifiers = Modifiers::NONE;
        let mut keys: Vec<KeySymbol> = Vec::new();
        let mut any = false;

        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                return Err(ConfigError::UnknownKeyName(name.to_string()));
            }
            any = true;
            if let Some(flag) = Modifiers::from_chord_name(name) {
                modifiers |= flag;
                continue;
            }
            let symbol = KeySymbol::new(name);
            if !keys.contains(&symbol) {
                keys.push(symbol);
            }
        }

        if !any {
            return Err(ConfigError::EmptyToggleChord);
        }
        Ok(Self { modifiers, keys })
    }

    /// Parse a chord written as names joined by `+` or `,` (`"shift+alt"`).
    ///
    /// # Errors
    ///
    /// Same as [`ToggleChord::new`].
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        if spec.trim().is_empty() {
            return Err(ConfigError::EmptyToggleChord);
        }
        Self::new(spec.split(['+', ',']))
    }

    /// Modifiers that must be active.
    #[must_use]
    pub const fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Non-modifier keys that must be held.
    #[must_use]
    pub fn keys(&self) -> &[KeySymbol] {
        &self.keys
    }

    /// Evaluate the chord against the event's modifier flags and the held
    /// key set (queried through `is_held`).
    pub fn is_satisfied_by<F>(&self, active: Modifiers, is_held: F) -> bool
    where
        F: Fn(&KeySymbol) -> bool,
    {
        active.contains(self.modifiers) && self.keys.iter().all(is_held)
    }
}

impl Default for ToggleChord {
    fn default() -> Self {
        Self {
            modifiers: Modifiers::NONE,
            keys: DEFAULT_TOGGLE_KEYS.iter().map(|k| KeySymbol::new(k)).collect(),
        }
    }
}

impl fmt::Display for ToggleChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<&str> = Vec::new();
        for (flag, name) in [
            (Modifiers::CTRL, "CONTROL"),
            (Modifiers::ALT, "ALT"),
            (Modifiers::SHIFT, "SHIFT"),
            (Modifiers::META, "META"),
        ] {
            if self.modifiers.contains(flag) {
                parts.push(name);
            }
        }
        parts.extend(self.keys.iter().map(KeySymbol::as_str));
        f.write_str(&parts.join("+"))
    }
}
