mod descriptor;
pub use descriptor::{Args, Descriptor};

use crate::Result;

use relmap_core::{stmt::Record, Schema};

/// A type query results can be loaded into.
pub trait Model: Sized + Send + 'static {
    fn load(record: Record, schema: &Schema) -> Result<Self>;
}

impl Model for Record {
    fn load(record: Record, _schema: &Schema) -> Result<Self> {
        Ok(record)
    }
}
