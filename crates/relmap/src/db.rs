mod builder;
pub use builder::Builder;

use crate::{BatchOutcome, Model, Result, Selection, Session};

use indexmap::IndexMap;
use log::info;
use relmap_core::{
    driver::Driver,
    stmt::{Filter, Query, Value, Write},
    Schema,
};
use relmap_sql::{Flavor, Serializer};
use std::{fmt, sync::Arc};
use tokio::sync::OnceCell;

/// Shared state between all `Db` clones.
struct Shared {
    driver: Box<dyn Driver>,
    flavor: Flavor,

    /// Mapping documents, published into `schema` on first use
    sources: Vec<(String, String)>,
    schema: OnceCell<Arc<Schema>>,
}

/// A database handle. Cheap to clone; every clone shares the driver and the
/// published schema.
#[derive(Clone)]
pub struct Db {
    shared: Arc<Shared>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// The schema built from the registered mapping documents. Built on
    /// first call; a failed build is retried on the next call.
    pub async fn schema(&self) -> Result<&Arc<Schema>> {
        self.shared
            .schema
            .get_or_try_init(|| async {
                let mut builder = Schema::builder();

                for (source, text) in &self.shared.sources {
                    builder.mapping(source.as_str(), text)?;
                }

                let schema = builder.build()?;
                info!(
                    "schema published; entities={} sources={}",
                    schema.entities().count(),
                    self.shared.sources.len()
                );

                Ok::<_, crate::Error>(Arc::new(schema))
            })
            .await
    }

    pub fn flavor(&self) -> Flavor {
        self.shared.flavor
    }

    pub fn driver(&self) -> &dyn Driver {
        &*self.shared.driver
    }

    pub(crate) fn serializer(&self) -> Serializer {
        Serializer::new(self.shared.flavor)
    }

    /// Opens a session on a fresh connection.
    pub async fn session(&self) -> Result<Session> {
        let connection = self.shared.driver.connect().await?;
        Ok(Session::new(self.clone(), connection))
    }

    /// A lazily evaluated query. Nothing runs until the selection is read.
    pub fn select<M: Model>(&self, query: Query) -> Selection<M> {
        Selection::new(self.clone(), query)
    }

    /// Runs `query` on its own session and loads every matching row.
    pub async fn all<M: Model>(&self, query: &Query) -> Result<Vec<M>> {
        self.session().await?.all(query).await
    }

    pub async fn count(&self, entity: &str, filter: &Filter, includes: &[&str]) -> Result<u64> {
        self.session().await?.count(entity, filter, includes).await
    }

    pub async fn exists(&self, entity: &str, filter: &Filter) -> Result<bool> {
        self.session().await?.exists(entity, filter).await
    }

    /// Inserts `rows` outside any transaction, so one failing row does not
    /// stop the others. See [`Session::insert_many`].
    pub async fn insert_many(
        &self,
        entity: &str,
        rows: &mut [IndexMap<String, Value>],
        includes: &[&str],
    ) -> Result<BatchOutcome> {
        self.session()
            .await?
            .insert_many(entity, rows, includes)
            .await
    }

    pub async fn update_many(
        &self,
        entity: &str,
        rows: &[IndexMap<String, Write>],
        filter: &Filter,
        members: &[&str],
    ) -> Result<BatchOutcome> {
        self.session()
            .await?
            .update_many(entity, rows, filter, members)
            .await
    }

    pub async fn delete(&self, entity: &str, filter: &Filter) -> Result<u64> {
        self.session().await?.delete(entity, filter).await
    }
}

impl fmt::Debug for Db {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Db")
            .field("driver", &self.shared.driver)
            .field("flavor", &self.shared.flavor)
            .field("published", &self.shared.schema.initialized())
            .finish()
    }
}
