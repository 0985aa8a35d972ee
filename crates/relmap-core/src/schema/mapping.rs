//! Textual mapping definitions.
//!
//! A mapping document is JSON:
//!
//! ```json
//! {
//!   "entities": [
//!     {
//!       "name": "Order",
//!       "table": "orders",
//!       "keys": [{ "name": "Id", "sequence": true }],
//!       "properties": ["CustomerId", { "name": "Total", "column": "total_amount" }],
//!       "navigations": [
//!         { "name": "Customer", "target": "Customer", "mode": "left",
//!           "keys": [{ "from": "CustomerId", "to": "Id" }] }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Properties may be given as a bare name when they need no options.

use super::JoinKind;
use crate::{Error, Result};

use serde::Deserialize;

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub entities: Vec<EntityDef>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct EntityDef {
    pub name: String,

    /// Defaults to `name`
    #[serde(default)]
    pub table: Option<String>,

    #[serde(default)]
    pub schema: Option<String>,

    /// Name of the base entity
    #[serde(default)]
    pub inherit: Option<String>,

    /// Primary key properties. A subtype declaring none takes its base's.
    #[serde(default)]
    pub keys: Vec<PropertyDef>,

    #[serde(default)]
    pub properties: Vec<PropertyDef>,

    #[serde(default)]
    pub navigations: Vec<NavigationDef>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(from = "PropertyRepr")]
pub struct PropertyDef {
    pub name: String,
    pub column: Option<String>,
    pub ignored: bool,
    pub constructor: Option<String>,
    pub sequence: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PropertyRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        column: Option<String>,
        #[serde(default)]
        ignored: bool,
        #[serde(default)]
        constructor: Option<String>,
        #[serde(default)]
        sequence: bool,
    },
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct NavigationDef {
    pub name: String,
    pub target: String,
    #[serde(default)]
    pub mode: JoinKind,
    #[serde(default)]
    pub keys: Vec<KeyPairDef>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct KeyPairDef {
    pub from: String,
    pub to: String,
}

impl Document {
    pub fn parse(text: &str) -> Result<Document> {
        serde_json::from_str(text).map_err(|err| Error::invalid_mapping(err.to_string()))
    }
}

impl PropertyDef {
    pub fn new(name: impl Into<String>) -> PropertyDef {
        PropertyDef {
            name: name.into(),
            ..PropertyDef::default()
        }
    }
}

impl From<PropertyRepr> for PropertyDef {
    fn from(repr: PropertyRepr) -> PropertyDef {
        match repr {
            PropertyRepr::Name(name) => PropertyDef::new(name),
            PropertyRepr::Full {
                name,
                column,
                ignored,
                constructor,
                sequence,
            } => PropertyDef {
                name,
                column,
                ignored,
                constructor,
                sequence,
            },
        }
    }
}
