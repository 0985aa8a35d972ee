#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Logical member name
    pub name: String,

    /// Physical column name. Defaults to the logical name.
    pub column: String,

    /// Part of the primary key
    pub key: bool,

    /// Has no physical column
    pub ignored: bool,

    /// Name of the constructor parameter this property binds to
    pub constructor: Option<String>,

    /// Generated by the database on insert (auto-increment)
    pub sequence: bool,
}

impl Property {
    pub fn new(name: impl Into<String>) -> Property {
        let name = name.into();
        Property {
            column: name.clone(),
            name,
            key: false,
            ignored: false,
            constructor: None,
            sequence: false,
        }
    }
}
