use super::Value;

/// The value written to one member by an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    /// `col = value`, or `col = NULL`
    Set(Value),

    /// `col = <member> <op> value`, for atomic in-place arithmetic
    Expr {
        member: String,
        op: ArithOp,
        value: Value,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl Write {
    pub fn set(value: impl Into<Value>) -> Write {
        Write::Set(value.into())
    }

    /// `col = col + value`
    pub fn add(member: impl Into<String>, value: impl Into<Value>) -> Write {
        Write::Expr {
            member: member.into(),
            op: ArithOp::Add,
            value: value.into(),
        }
    }

    /// `col = col - value`
    pub fn sub(member: impl Into<String>, value: impl Into<Value>) -> Write {
        Write::Expr {
            member: member.into(),
            op: ArithOp::Sub,
            value: value.into(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Write::Set(Value::Null))
    }
}
