use crate::key::Key;

/// Failure of a single `convert` call.
///
/// Every variant aborts the call: the destination may be partially written
/// and must not be trusted. `location` is the destination-relative path (for
/// record reads, the source-relative path) up to and including the segment
/// that failed.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("at {location}: cannot convert {found} {value} to {target}")]
    IncompatibleScalar {
        location: String,
        found: &'static str,
        value: String,
        target: &'static str,
    },

    #[error("at {location}: {type_name} is not addressable by key '{key}'")]
    Unaddressable {
        location: String,
        key: Key,
        type_name: &'static str,
    },

    #[error("at {location}: index {index} out of range for fixed-size {type_name} of length {len}")]
    SequenceOverflow {
        location: String,
        index: usize,
        len: usize,
        type_name: &'static str,
    },

    #[error("at {location}: index {index} exceeds sequence length limit {limit}")]
    SequenceLimitExceeded {
        location: String,
        index: usize,
        limit: usize,
    },

    #[error("at {location}: cannot grow sequence to {len} elements: {source}")]
    AllocationFailed {
        location: String,
        len: usize,
        source: std::collections::TryReserveError,
    },

    #[error("at {location}: key '{key}' cannot be converted to {key_type}")]
    InconvertibleKey {
        location: String,
        key: Key,
        key_type: &'static str,
    },

    #[error("at {location}: conversion depth limit {limit} exceeded")]
    DepthLimitExceeded { location: String, limit: usize },

    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl ConvertError {
    /// Location the error was raised at, if it has one.
    pub fn location(&self) -> Option<&str> {
        match self {
            ConvertError::IncompatibleScalar { location, .. }
            | ConvertError::Unaddressable { location, .. }
            | ConvertError::SequenceOverflow { location, .. }
            | ConvertError::SequenceLimitExceeded { location, .. }
            | ConvertError::AllocationFailed { location, .. }
            | ConvertError::InconvertibleKey { location, .. }
            | ConvertError::DepthLimitExceeded { location, .. } => Some(location),
            ConvertError::InvalidOptions(_) => None,
        }
    }
}

/// A key that a mapping or sequence cannot represent.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("key '{key}' cannot be converted to {key_type}")]
pub struct KeyMismatch {
    pub key: Key,
    pub key_type: &'static str,
}

impl KeyMismatch {
    pub(crate) fn at(self, location: String) -> ConvertError {
        ConvertError::InconvertibleKey {
            location,
            key: self.key,
            key_type: self.key_type,
        }
    }
}

/// A scalar that cannot be assigned to a destination type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cannot convert {found} {value} to {target}")]
pub struct ScalarMismatch {
    pub found: &'static str,
    pub value: String,
    pub target: &'static str,
}

impl ScalarMismatch {
    pub(crate) fn at(self, location: String) -> ConvertError {
        ConvertError::IncompatibleScalar {
            location,
            found: self.found,
            value: self.value,
            target: self.target,
        }
    }
}
