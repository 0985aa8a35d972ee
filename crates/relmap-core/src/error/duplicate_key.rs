use super::Error;

/// Error when a write conflicts with a unique or primary key constraint.
#[derive(Debug)]
pub(super) struct DuplicateKey {
    message: Box<str>,
}

impl std::error::Error for DuplicateKey {}

impl core::fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "duplicate key: {}", self.message)
    }
}

impl Error {
    /// Creates a duplicate key error. Drivers classify constraint violations
    /// into this kind so callers can tell conflicts from other failures.
    pub fn duplicate_key(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::DuplicateKey(DuplicateKey {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a duplicate key error.
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::DuplicateKey(_))
    }
}
