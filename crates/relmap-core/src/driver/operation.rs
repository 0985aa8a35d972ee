use crate::stmt::Value;

mod execute_sql;
pub use execute_sql::ExecuteSql;

mod last_insert_id;
pub use last_insert_id::LastInsertId;

mod query_scalar;
pub use query_scalar::QueryScalar;

mod query_sql;
pub use query_sql::QuerySql;

mod transaction;
pub use transaction::Transaction;

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Execute an INSERT, UPDATE or DELETE. Responds with the affected row count.
    ExecuteSql(ExecuteSql),

    /// Read the key generated by the last insert on this connection.
    /// Responds with a scalar.
    LastInsertId(LastInsertId),

    /// Execute a query returning a single value. Responds with a scalar,
    /// null when the query produced no row.
    QueryScalar(QueryScalar),

    /// Execute a query. Responds with a stream of rows.
    QuerySql(QuerySql),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),
}

impl Operation {
    /// The SQL text, for operations that carry one.
    pub fn sql(&self) -> Option<&str> {
        match self {
            Operation::ExecuteSql(op) => Some(&op.sql),
            Operation::QueryScalar(op) => Some(&op.sql),
            Operation::QuerySql(op) => Some(&op.sql),
            Operation::LastInsertId(_) | Operation::Transaction(_) => None,
        }
    }

    /// Parameters bound to the SQL text's `{N}` placeholders.
    pub fn params(&self) -> &[Value] {
        match self {
            Operation::ExecuteSql(op) => &op.params,
            Operation::QueryScalar(op) => &op.params,
            Operation::QuerySql(op) => &op.params,
            Operation::LastInsertId(_) | Operation::Transaction(_) => &[],
        }
    }
}
