mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

mod row_stream;
pub use row_stream::RowStream;

use crate::async_trait;

use std::fmt::Debug;

/// Source of connections to the database.
///
/// Implementations own the actual database client. The engine never opens
/// connections except through [`Driver::connect`].
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Opens a connection scope. Every operation issued on the returned
    /// connection shares its transaction state and last generated key.
    async fn connect(&self) -> crate::Result<Box<dyn Connection>>;
}

/// A connection scope: the unit statements of one batch run on.
#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Execute a database operation.
    ///
    /// SQL text carries `{N}` placeholders; placeholder `N` binds to
    /// parameter `N`. Failures should be classified (for example with
    /// [`Error::duplicate_key`](crate::Error::duplicate_key)) and are
    /// propagated to the caller unchanged.
    async fn exec(&mut self, op: Operation) -> crate::Result<Response>;
}
