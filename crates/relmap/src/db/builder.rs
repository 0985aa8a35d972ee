use super::{Db, Shared};
use crate::{driver::Driver, err, Error, Result};

use relmap_sql::Flavor;
use std::{path::Path, sync::Arc};
use tokio::sync::OnceCell;

#[derive(Debug, Default)]
pub struct Builder {
    /// Mapping documents as `(source name, text)`. Parsed when the schema is
    /// first needed.
    sources: Vec<(String, String)>,

    flavor: Flavor,
}

impl Builder {
    /// Registers a mapping document given as text.
    pub fn mapping(&mut self, text: impl Into<String>) -> &mut Self {
        let source = format!("mapping #{}", self.sources.len() + 1);
        self.sources.push((source, text.into()));
        self
    }

    /// Reads and registers a mapping document from disk.
    pub fn mapping_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::from(e).context(err!("cannot read `{}`", path.display())))?;

        self.sources.push((path.display().to_string(), text));
        Ok(self)
    }

    /// SQL dialect to render statements in. Defaults to MySQL.
    pub fn flavor(&mut self, flavor: Flavor) -> &mut Self {
        self.flavor = flavor;
        self
    }

    pub fn build(&mut self, driver: impl Driver) -> Db {
        Db {
            shared: Arc::new(Shared {
                driver: Box::new(driver),
                flavor: self.flavor,
                sources: std::mem::take(&mut self.sources),
                schema: OnceCell::new(),
            }),
        }
    }
}
