use super::{Op, Query, Value};

/// A leaf of the filter tree: `<member> <op> <operand>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Dotted member path, e.g. `Customer.Name`
    pub member: String,

    pub op: Op,

    pub operand: Operand,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub enum Operand {
    /// No value. Null checks for `Equal`/`NotEqual`.
    #[default]
    None,

    Value(Value),

    List(Vec<Value>),

    /// A nested query projecting exactly one member
    Query(Box<Query>),
}

impl Condition {
    pub fn new(member: impl Into<String>, op: Op, operand: Operand) -> Condition {
        Condition {
            member: member.into(),
            op,
            operand,
        }
    }

    /// `member = value`. A null value compiles to `IS NULL`.
    pub fn eq(member: impl Into<String>, value: impl Into<Value>) -> Condition {
        Condition::new(member, Op::Equal, Operand::value(value))
    }

    pub fn ne(member: impl Into<String>, value: impl Into<Value>) -> Condition {
        Condition::new(member, Op::NotEqual, Operand::value(value))
    }

    pub fn like(member: impl Into<String>, pattern: impl Into<Value>) -> Condition {
        Condition::new(member, Op::Like, Operand::value(pattern))
    }

    pub fn gt(member: impl Into<String>, value: impl Into<Value>) -> Condition {
        Condition::new(member, Op::GreaterThan, Operand::value(value))
    }

    pub fn ge(member: impl Into<String>, value: impl Into<Value>) -> Condition {
        Condition::new(member, Op::GreaterThanOrEqual, Operand::value(value))
    }

    pub fn lt(member: impl Into<String>, value: impl Into<Value>) -> Condition {
        Condition::new(member, Op::LessThan, Operand::value(value))
    }

    pub fn le(member: impl Into<String>, value: impl Into<Value>) -> Condition {
        Condition::new(member, Op::LessThanOrEqual, Operand::value(value))
    }

    pub fn between(
        member: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Condition {
        Condition::new(
            member,
            Op::Between,
            Operand::List(vec![low.into(), high.into()]),
        )
    }

    pub fn is_in<I>(member: impl Into<String>, values: I) -> Condition
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Condition::new(member, Op::In, Operand::list(values))
    }

    pub fn not_in<I>(member: impl Into<String>, values: I) -> Condition
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Condition::new(member, Op::NotIn, Operand::list(values))
    }

    /// `member IN (<query>)`
    pub fn in_query(member: impl Into<String>, query: Query) -> Condition {
        Condition::new(member, Op::In, Operand::Query(Box::new(query)))
    }

    pub fn not_in_query(member: impl Into<String>, query: Query) -> Condition {
        Condition::new(member, Op::NotIn, Operand::Query(Box::new(query)))
    }

    pub fn is_null(member: impl Into<String>) -> Condition {
        Condition::new(member, Op::Equal, Operand::None)
    }

    pub fn is_not_null(member: impl Into<String>) -> Condition {
        Condition::new(member, Op::NotEqual, Operand::None)
    }
}

impl Operand {
    /// A single value. Null becomes [`Operand::None`].
    pub fn value(value: impl Into<Value>) -> Operand {
        match value.into() {
            Value::Null => Operand::None,
            value => Operand::Value(value),
        }
    }

    pub fn list<I>(values: I) -> Operand
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Operand::List(values.into_iter().map(Into::into).collect())
    }

    /// The operand's values, flattened. Empty for [`Operand::None`] and
    /// [`Operand::Query`].
    pub fn values(&self) -> &[Value] {
        match self {
            Operand::None | Operand::Query(_) => &[],
            Operand::Value(value) => std::slice::from_ref(value),
            Operand::List(values) => values,
        }
    }
}
