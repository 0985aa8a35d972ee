use super::Operation;

use crate::stmt::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteSql {
    /// The statement, with `{N}` placeholders
    pub sql: String,

    pub params: Vec<Value>,
}

impl From<ExecuteSql> for Operation {
    fn from(value: ExecuteSql) -> Self {
        Self::ExecuteSql(value)
    }
}
