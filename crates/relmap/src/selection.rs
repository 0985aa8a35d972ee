use crate::{Db, Model, Result};

use relmap_core::stmt::{Paging, Query};
use std::fmt;
use tokio::sync::OnceCell;

/// A query whose rows are fetched on first read and kept afterwards.
///
/// Created by [`Db::select`]. Reading twice runs the query once.
pub struct Selection<M> {
    db: Db,
    query: Query,
    loaded: OnceCell<Loaded<M>>,
}

struct Loaded<M> {
    models: Vec<M>,

    /// Paging with the total filled in and the index clamped
    paging: Option<Paging>,
}

impl<M: Model> Selection<M> {
    pub(crate) fn new(db: Db, query: Query) -> Selection<M> {
        Selection {
            db,
            query,
            loaded: OnceCell::new(),
        }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.initialized()
    }

    /// Fetches the rows if this is the first read.
    pub async fn load(&self) -> Result<&[M]> {
        let loaded = self
            .loaded
            .get_or_try_init(|| async {
                let mut session = self.db.session().await?;
                let (models, paging) = session.fetch(&self.query).await?;
                Ok::<_, crate::Error>(Loaded { models, paging })
            })
            .await?;

        Ok(&loaded.models)
    }

    /// The page actually fetched, with its total. `None` before the first
    /// read or when the query is not paged.
    pub fn paging(&self) -> Option<Paging> {
        self.loaded.get().and_then(|loaded| loaded.paging)
    }

    /// Total matching rows, counting them if no read has happened yet.
    pub async fn total(&self) -> Result<u64> {
        if let Some(total) = self.paging().and_then(|paging| paging.total) {
            return Ok(total);
        }

        match self.query.paging.and_then(|paging| paging.total) {
            Some(total) => Ok(total),
            None if self.query.paging.is_some() => {
                self.load().await?;
                Ok(self.paging().and_then(|paging| paging.total).unwrap_or(0))
            }
            None => Ok(self.load().await?.len() as u64),
        }
    }

    pub async fn into_vec(self) -> Result<Vec<M>> {
        self.load().await?;

        Ok(self
            .loaded
            .into_inner()
            .map(|loaded| loaded.models)
            .unwrap_or_default())
    }
}

impl<M> fmt::Debug for Selection<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selection")
            .field("query", &self.query)
            .field("loaded", &self.loaded.initialized())
            .finish()
    }
}
