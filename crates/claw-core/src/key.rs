#![forbid(unsafe_code)]

//! Key symbols and the hotkey pool.
//!
//! A [`KeySymbol`] is the upper-cased name of a key as the engine compares
//! it: pool entries, held keys and chord members all go through the same
//! normalization, so `"g"` typed by the user matches `"G"` in a pool.
//!
//! A [`KeyPool`] is the ordered set of single-character symbols available
//! for labels. Order is assignment priority. Entries are distinct and the
//! pool is immutable once built.

use std::fmt;

use unicode_segmentation::UnicodeSegmentation;

use crate::config::ConfigError;

/// Symbols used when no pool is configured.
pub const DEFAULT_KEYS: &str = "QWERTYUIOPLKJHGFDSAZXCVBNM1234567890";

/// Upper-cased key name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeySymbol(String);

impl KeySymbol {
    /// Normalize a key name into a symbol.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.to_uppercase())
    }

    /// The normalized name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<char> for KeySymbol {
    fn from(c: char) -> Self {
        Self(c.to_uppercase().collect())
    }
}

impl fmt::Display for KeySymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, duplicate-free pool of single-character hotkey symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPool {
    symbols: Vec<KeySymbol>,
}

impl KeyPool {
    /// Build a pool from individual key names.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyKeyPool`] if no names are given.
    /// - [`ConfigError::MultiCharacterKey`] if a name is not exactly one
    ///   grapheme cluster.
    /// - [`ConfigError::DuplicateKey`] if two names normalize to the same
    ///   symbol.
    pub fn new<I, S>(names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut symbols: Vec<KeySymbol> = Vec::new();
        for name in names {
            let name = name.as_ref();
            if name.graphemes(true).count() != 1 {
                return Err(ConfigError::MultiCharacterKey(name.to_string()));
            }
            let symbol = KeySymbol::new(name);
            if symbols.contains(&symbol) {
                return Err(ConfigError::DuplicateKey(symbol));
            }
            symbols.push(symbol);
        }
        if symbols.is_empty() {
            return Err(ConfigError::EmptyKeyPool);
        }
        Ok(Self { symbols })
    }

    /// Build a pool from a string, one symbol per grapheme cluster.
    ///
    /// # Errors
    ///
    /// Same as [`KeyPool::new`].
    pub fn from_chars(keys: &str) -> Result<Self, ConfigError> {
        Self::new(keys.graphemes(true))
    }

    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false for a constructed pool; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in priority order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &KeySymbol> + '_ {
        self.symbols.iter()
    }

    /// Symbol at priority `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&KeySymbol> {
        self.symbols.get(index)
    }

    /// Whether `symbol` is part of the pool.
    #[must_use]
    pub fn contains(&self, symbol: &KeySymbol) -> bool {
        self.symbols.contains(symbol)
    }
}

impl Default for KeyPool {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_KEYS.chars().map(KeySymbol::from).collect(),
        }
    }
}
