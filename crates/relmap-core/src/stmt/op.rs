/// Comparison applied by a [`Condition`](super::Condition).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `=`, or `IS NULL` without a value. Becomes `LIKE` when the value is a
    /// string containing a wildcard.
    #[default]
    Equal,

    /// `!=`, or `IS NOT NULL` without a value
    NotEqual,

    /// Same lowering as [`Op::Equal`]
    Like,

    GreaterThan,

    GreaterThanOrEqual,

    LessThan,

    LessThanOrEqual,

    /// Inclusive range. Takes exactly two values.
    Between,

    /// Membership in a list of values or a sub-query
    In,

    NotIn,
}
