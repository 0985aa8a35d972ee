mod condition;
pub use condition::{Condition, Operand};

mod filter;
pub use filter::{Combinator, Filter};

mod grouping;
pub use grouping::Grouping;

mod op;
pub use op::Op;

mod paging;
pub use paging::Paging;

mod query;
pub use query::Query;

mod record;
pub use record::Record;

mod row;
pub use row::Row;

mod sorting;
pub use sorting::{Direction, Sorting};

mod value;
pub use value::Value;

mod write;
pub use write::{ArithOp, Write};

/// The literal member naming the grouped row count.
pub const COUNT_MARKER: &str = "count(0)";

/// Returns true if `member` is the grouped row count marker.
pub fn is_count_marker(member: &str) -> bool {
    member.trim().eq_ignore_ascii_case(COUNT_MARKER)
}
