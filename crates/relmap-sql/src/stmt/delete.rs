use super::{Expr, TableName};

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: TableName,
    pub filter: Option<Expr>,
}
