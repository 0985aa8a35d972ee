mod delete;
pub use delete::Delete;

mod expr;
pub use expr::{BinaryOp, Expr, ExprColumn};

mod insert;
pub use insert::Insert;

mod join;
pub use join::Join;

mod limit;
pub use limit::Limit;

mod select;
pub use select::{OrderBy, Select, SelectItem};

mod source;
pub use source::Source;

mod table_name;
pub use table_name::TableName;

mod update;
pub use update::{Assignment, Update};

pub use relmap_core::schema::JoinKind;
pub use relmap_core::stmt::Direction;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Delete(Delete),
    Insert(Insert),
    Select(Select),
    Update(Update),
}

impl From<Select> for Statement {
    fn from(value: Select) -> Self {
        Statement::Select(value)
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Statement::Insert(value)
    }
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Statement::Update(value)
    }
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Statement::Delete(value)
    }
}
