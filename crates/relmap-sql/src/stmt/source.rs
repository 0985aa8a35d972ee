use super::{Select, TableName};

/// What a `FROM` or `JOIN` reads from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Table {
        name: TableName,
        alias: Option<String>,
    },

    /// `(<select>) <alias>`
    Derived { select: Box<Select>, alias: String },
}

impl Source {
    pub fn table(name: TableName, alias: impl Into<String>) -> Source {
        let alias = alias.into();
        Source::Table {
            name,
            alias: (!alias.is_empty()).then_some(alias),
        }
    }

    pub fn derived(select: Select, alias: impl Into<String>) -> Source {
        Source::Derived {
            select: Box::new(select),
            alias: alias.into(),
        }
    }
}
