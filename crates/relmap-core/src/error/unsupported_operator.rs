use super::Error;

/// Error when a condition operator cannot be applied to the value it was given,
/// e.g. `BETWEEN` with one value or `>` with none.
#[derive(Debug)]
pub(super) struct UnsupportedOperator {
    message: Box<str>,
}

impl std::error::Error for UnsupportedOperator {}

impl core::fmt::Display for UnsupportedOperator {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unsupported operator: {}", self.message)
    }
}

impl Error {
    /// Creates an unsupported operator error.
    pub fn unsupported_operator(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnsupportedOperator(UnsupportedOperator {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an unsupported operator error.
    pub fn is_unsupported_operator(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnsupportedOperator(_))
    }
}
