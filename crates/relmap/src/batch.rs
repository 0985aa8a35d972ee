use crate::Error;

/// Result of a multi-row insert or update run outside an explicit
/// transaction. Statements after a failed one still run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Rows affected by the statements that succeeded
    pub count: u64,

    /// One error per failed statement, in batch order
    pub failures: Vec<Error>,
}

impl BatchOutcome {
    /// True when no statement failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
