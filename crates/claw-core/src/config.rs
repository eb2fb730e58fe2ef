#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! Supplied once at construction and fixed for the lifetime of a session.
//!
//! # Environment Variables
//!
//! | Variable | Type | Default | Description |
//! |----------|------|---------|-------------|
//! | `CLAW_HINT_KEYS` | string | `QWERTYUIOPLKJHGFDSAZXCVBNM1234567890` | Hotkey pool, one symbol per character |
//! | `CLAW_REFRESH_TIMEOUT_MS` | u64 | 500 | Full-class refresh delay |
//! | `CLAW_TOGGLE_KEYS` | string | `G+H` | Toggle chord, names joined by `+` or `,` |

use std::fmt;
use std::time::Duration;

use crate::chord::ToggleChord;
use crate::key::{KeyPool, KeySymbol};

/// Default Full-class refresh delay in milliseconds.
pub const DEFAULT_REFRESH_TIMEOUT_MS: u64 = 500;

/// Environment variable for the hotkey pool.
pub const ENV_HINT_KEYS: &str = "CLAW_HINT_KEYS";
/// Environment variable for the refresh timeout.
pub const ENV_REFRESH_TIMEOUT_MS: &str = "CLAW_REFRESH_TIMEOUT_MS";
/// Environment variable for the toggle chord.
pub const ENV_TOGGLE_KEYS: &str = "CLAW_TOGGLE_KEYS";

/// Configuration errors, all raised at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The hotkey pool has no symbols.
    EmptyKeyPool,
    /// Two pool entries normalize to the same symbol.
    DuplicateKey(KeySymbol),
    /// A pool entry is not exactly one character.
    MultiCharacterKey(String),
    /// The toggle chord names no keys.
    EmptyToggleChord,
    /// A toggle chord entry is blank.
    UnknownKeyName(String),
    /// An environment variable holds an unparsable value.
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Raw value found.
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyKeyPool => write!(f, "hotkey pool is empty"),
            Self::DuplicateKey(sym) => write!(f, "hotkey pool contains {sym} more than once"),
            Self::MultiCharacterKey(name) => {
                write!(f, "hotkey {name:?} is not a single character")
            }
            Self::EmptyToggleChord => write!(f, "toggle chord names no keys"),
            Self::UnknownKeyName(name) => write!(f, "toggle chord has unusable key name {name:?}"),
            Self::InvalidEnv { var, value } => write!(f, "invalid value {value:?} for {var}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for a hint-mode session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintConfig {
    /// Hotkey pool, in assignment priority order.
    pub keys: KeyPool,
    /// Full-class refresh delay. Half-class refreshes wait half of this.
    pub refresh_timeout: Duration,
    /// Chord that toggles hint mode.
    pub toggle: ToggleChord,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            keys: KeyPool::default(),
            refresh_timeout: Duration::from_millis(DEFAULT_REFRESH_TIMEOUT_MS),
            toggle: ToggleChord::default(),
        }
    }
}

impl HintConfig {
    /// Replace the hotkey pool with the characters of `keys`.
    ///
    /// # Errors
    ///
    /// See [`KeyPool::from_chars`].
    pub fn with_keys(mut self, keys: &str) -> Result<Self, ConfigError> {
        self.keys = KeyPool::from_chars(keys)?;
        Ok(self)
    }

    /// Set the Full-class refresh delay.
    ///
    /// A zero timeout falls back to the default.
    #[must_use]
    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = if timeout.is_zero() {
            Duration::from_millis(DEFAULT_REFRESH_TIMEOUT_MS)
        } else {
            timeout
        };
        self
    }

    /// Replace the toggle chord.
    ///
    /// # Errors
    ///
    /// See [`ToggleChord::new`].
    pub fn with_toggle_keys<I, S>(mut self, names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.toggle = ToggleChord::new(names)?;
        Ok(self)
    }

    /// Half-class refresh delay.
    #[must_use]
    pub fn half_timeout(&self) -> Duration {
        self.refresh_timeout / 2
    }

    /// Load configuration from `CLAW_*` environment variables, keeping the
    /// default for anything unset.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value encountered.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value encountered.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(keys) = lookup(ENV_HINT_KEYS) {
            config = config.with_keys(&keys)?;
        }

        if let Some(raw) = lookup(ENV_REFRESH_TIMEOUT_MS) {
            let ms = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidEnv {
                    var: ENV_REFRESH_TIMEOUT_MS,
                    value: raw.clone(),
                })?;
            config = config.with_refresh_timeout(Duration::from_millis(ms));
        }

        if let Some(chord) = lookup(ENV_TOGGLE_KEYS) {
            config.toggle = ToggleChord::parse(&chord)?;
        }

        crate::debug!(
            keys = config.keys.len(),
            refresh_timeout = ?config.refresh_timeout,
            toggle = %config.toggle,
            "hint configuration loaded"
        );
        Ok(config)
    }
}
