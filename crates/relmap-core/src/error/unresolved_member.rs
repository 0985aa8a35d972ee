use super::Error;

/// Error when a member path cannot be resolved against the schema.
///
/// Raised per query, before any SQL is sent.
#[derive(Debug)]
pub(super) struct UnresolvedMember {
    entity: Box<str>,
    path: Box<str>,
    reason: Box<str>,
}

impl std::error::Error for UnresolvedMember {}

impl core::fmt::Display for UnresolvedMember {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "cannot resolve member `{}` on `{}`: {}",
            self.path, self.entity, self.reason
        )
    }
}

impl Error {
    /// Creates an unresolved member error for `path`, relative to `entity`.
    pub fn unresolved_member(
        entity: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::UnresolvedMember(UnresolvedMember {
            entity: entity.into().into(),
            path: path.into().into(),
            reason: reason.into().into(),
        }))
    }

    /// Returns `true` if this error is an unresolved member error.
    pub fn is_unresolved_member(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnresolvedMember(_))
    }
}
