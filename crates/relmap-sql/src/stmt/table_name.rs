/// A physical table, optionally qualified by a database schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName {
    pub schema: Option<String>,
    pub name: String,
}

impl TableName {
    pub fn new(name: impl Into<String>) -> TableName {
        TableName {
            schema: None,
            name: name.into(),
        }
    }

    pub fn qualified(schema: Option<String>, name: impl Into<String>) -> TableName {
        TableName {
            schema,
            name: name.into(),
        }
    }
}
