use super::Value;

use indexmap::IndexMap;

/// A materialized entity: column values plus nested navigation records.
///
/// Also the generic-map shape of a query result.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Record {
    /// Name of the entity the record was read as
    pub entity: String,

    /// Column name to value. Inherited columns colliding with one of the
    /// entity's own are stored as `<column>(base)`.
    pub values: IndexMap<String, Value>,

    /// Navigation name to nested record. Absent navigations have no entry.
    pub navigations: IndexMap<String, Record>,
}

impl Record {
    pub fn new(entity: impl Into<String>) -> Record {
        Record {
            entity: entity.into(),
            ..Record::default()
        }
    }

    /// Looks up a column value, ignoring case.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column).or_else(|| {
            self.values
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(column))
                .map(|(_, value)| value)
        })
    }

    pub fn navigation(&self, name: &str) -> Option<&Record> {
        self.navigations.get(name).or_else(|| {
            self.navigations
                .iter()
                .find(|(nav, _)| nav.eq_ignore_ascii_case(name))
                .map(|(_, record)| record)
        })
    }

    /// True when every column is null and no navigation produced data.
    pub fn is_absent(&self) -> bool {
        self.values.values().all(Value::is_null) && self.navigations.is_empty()
    }
}
