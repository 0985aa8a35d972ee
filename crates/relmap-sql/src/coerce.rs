use crate::Flavor;

use relmap_core::stmt::Value;

/// Converts a parameter into a primitive the database accepts.
///
/// Booleans become `0`/`1` where the database has no boolean type, and
/// MySQL stores UUIDs as 16 raw bytes.
pub fn coerce(flavor: Flavor, value: Value) -> Value {
    match (flavor, value) {
        (Flavor::Mysql | Flavor::Sqlite, Value::Bool(v)) => Value::I64(v.into()),
        (Flavor::Mysql, Value::Uuid(v)) => Value::Bytes(v.as_bytes().to_vec()),
        (_, value) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn bool_and_uuid() {
        assert_eq!(coerce(Flavor::Mysql, Value::Bool(true)), Value::I64(1));
        assert_eq!(coerce(Flavor::Sqlite, Value::Bool(false)), Value::I64(0));
        assert_eq!(coerce(Flavor::Postgresql, Value::Bool(true)), Value::Bool(true));

        let id = Uuid::new_v4();
        assert_eq!(
            coerce(Flavor::Mysql, Value::Uuid(id)),
            Value::Bytes(id.as_bytes().to_vec())
        );
        assert_eq!(coerce(Flavor::Postgresql, Value::Uuid(id)), Value::Uuid(id));
        assert_eq!(coerce(Flavor::Mysql, Value::from("x")), Value::from("x"));
    }
}
