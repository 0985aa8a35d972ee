use super::Operation;

use crate::stmt::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct QueryScalar {
    /// The SQL query to execute, with `{N}` placeholders
    pub sql: String,

    pub params: Vec<Value>,
}

impl From<QueryScalar> for Operation {
    fn from(value: QueryScalar) -> Self {
        Self::QueryScalar(value)
    }
}
