mod batch;
pub use batch::BatchOutcome;

pub mod db;
pub use db::Db;

mod engine;

pub mod model;
pub use model::{Descriptor, Model};

mod selection;
pub use selection::Selection;

mod session;
pub use session::Session;

pub use relmap_core::{bail, driver, err, schema, stmt, Error, Result, Schema};
pub use relmap_sql::Flavor;
