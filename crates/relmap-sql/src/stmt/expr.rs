use super::Select;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `AND` of every operand
    And(Vec<Expr>),

    /// `<lhs> <op> <rhs>`
    BinaryOp {
        lhs: Box<Expr>,
        op: BinaryOp,
        rhs: Box<Expr>,
    },

    /// `<expr> BETWEEN <low> AND <high>`
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
    },

    Column(ExprColumn),

    /// `COUNT(0)`
    CountAll,

    /// `EXISTS (<select>)`
    Exists(Box<Select>),

    /// `NAME(<args>)`
    Func { name: String, args: Vec<Expr> },

    /// `<expr> [NOT] IN (<list>)`
    InList {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negate: bool,
    },

    /// `<expr> [NOT] IN (<select>)`
    InSubquery {
        expr: Box<Expr>,
        query: Box<Select>,
        negate: bool,
    },

    /// `<expr> IS [NOT] NULL`
    IsNull { expr: Box<Expr>, negate: bool },

    /// An integer literal
    Literal(i64),

    Null,

    /// `OR` of every operand
    Or(Vec<Expr>),

    /// Positional parameter `{N}`
    Placeholder(usize),
}

/// A column, optionally qualified by a table alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprColumn {
    pub table: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
    Add,
    Sub,
    Mul,
    Div,
}

impl Expr {
    /// A column qualified by `table`. An empty alias leaves it unqualified.
    pub fn column(table: impl Into<String>, name: impl Into<String>) -> Expr {
        let table = table.into();
        Expr::Column(ExprColumn {
            table: (!table.is_empty()).then_some(table),
            name: name.into(),
        })
    }

    pub fn binary_op(lhs: impl Into<Box<Expr>>, op: BinaryOp, rhs: impl Into<Box<Expr>>) -> Expr {
        Expr::BinaryOp {
            lhs: lhs.into(),
            op,
            rhs: rhs.into(),
        }
    }

    pub fn eq(lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary_op(lhs, BinaryOp::Eq, rhs)
    }

    /// `1 = 0`
    pub fn always_false() -> Expr {
        Expr::eq(Expr::Literal(1), Expr::Literal(0))
    }

    pub fn func(name: impl Into<String>, args: Vec<Expr>) -> Expr {
        Expr::Func {
            name: name.into(),
            args,
        }
    }

    /// Combines operands with `AND`. A single operand is returned as is;
    /// no operands yields `None`.
    pub fn and_from_vec(mut operands: Vec<Expr>) -> Option<Expr> {
        match operands.len() {
            0 => None,
            1 => operands.pop(),
            _ => Some(Expr::And(operands)),
        }
    }

    /// Like [`Expr::and_from_vec`], with `OR`.
    pub fn or_from_vec(mut operands: Vec<Expr>) -> Option<Expr> {
        match operands.len() {
            0 => None,
            1 => operands.pop(),
            _ => Some(Expr::Or(operands)),
        }
    }

    /// True for `AND`/`OR` nodes, which are parenthesized when nested.
    pub fn is_junction(&self) -> bool {
        matches!(self, Expr::And(_) | Expr::Or(_))
    }
}

impl From<ExprColumn> for Expr {
    fn from(value: ExprColumn) -> Self {
        Expr::Column(value)
    }
}
