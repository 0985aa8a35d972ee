use super::Operation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastInsertId;

impl From<LastInsertId> for Operation {
    fn from(value: LastInsertId) -> Self {
        Self::LastInsertId(value)
    }
}
