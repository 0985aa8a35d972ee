#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    /// Rows to skip
    pub offset: u64,

    /// Rows to return
    pub count: u64,
}
