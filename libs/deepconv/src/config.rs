use serde::Deserialize;

use crate::error::ConvertError;

/// Tunables for a [`crate::Converter`].
///
/// Deserializable so it can live in the host application's config file;
/// missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Maximum nesting depth of a single conversion. Every indirect or open
    /// layer counts as a level of its own.
    pub max_depth: usize,

    /// Largest length a growable destination sequence may be grown to.
    pub max_sequence_len: usize,
}

impl Options {
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    /// `max_depth` values above this are rejected. Conversion recurses once
    /// per level, and this bound keeps the deepest walk within a 2 MiB
    /// thread stack.
    pub const HARD_MAX_DEPTH: usize = 256;

    pub const DEFAULT_MAX_SEQUENCE_LEN: usize = 1 << 20;

    /// `max_sequence_len` values above this are rejected.
    pub const HARD_MAX_SEQUENCE_LEN: usize = 1 << 28;

    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.max_depth == 0 {
            return Err(ConvertError::InvalidOptions(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.max_depth > Self::HARD_MAX_DEPTH {
            return Err(ConvertError::InvalidOptions(format!(
                "max_depth {} exceeds hard maximum {}",
                self.max_depth,
                Self::HARD_MAX_DEPTH
            )));
        }
        if self.max_sequence_len == 0 {
            return Err(ConvertError::InvalidOptions(
                "max_sequence_len must be at least 1".to_string(),
            ));
        }
        if self.max_sequence_len > Self::HARD_MAX_SEQUENCE_LEN {
            return Err(ConvertError::InvalidOptions(format!(
                "max_sequence_len {} exceeds hard maximum {}",
                self.max_sequence_len,
                Self::HARD_MAX_SEQUENCE_LEN
            )));
        }
        Ok(())
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_sequence_len: Self::DEFAULT_MAX_SEQUENCE_LEN,
        }
    }
}
