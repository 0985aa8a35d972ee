mod alias;

mod assemble;
pub(crate) use assemble::{count, exists, select};

mod consistency;
mod filter;

mod materialize;
pub(crate) use materialize::materialize;

mod resolve;

mod write;
pub(crate) use write::{delete, insert, update, WritePlan};


use relmap_core::schema::Entity;
use relmap_sql::stmt::TableName;

pub(crate) fn table_name(entity: &Entity) -> TableName {
    TableName::qualified(entity.schema.clone(), &entity.table)
}

/// Column of the property `name`, or `name` itself when it is not declared.
pub(crate) fn column_name(entity: &Entity, name: &str) -> String {
    entity
        .property(name)
        .map(|property| property.column.clone())
        .unwrap_or_else(|| name.to_string())
}
