mod builder;
pub use builder::Builder;

mod entity;
pub use entity::{Entity, EntityId};

mod join_kind;
pub use join_kind::JoinKind;

pub mod mapping;

mod navigation;
pub use navigation::{KeyPair, Navigation};

mod property;
pub use property::Property;

use crate::{Error, Result};
use std::collections::HashMap;

/// The mapped entity graph.
///
/// Built once from mapping sources and read-only afterwards, so a single
/// instance can be shared by any number of concurrent compilations.
#[derive(Debug)]
pub struct Schema {
    entities: Vec<Entity>,

    /// Lower-cased entity name to identifier
    by_name: HashMap<String, EntityId>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Builds a schema from a single JSON mapping document.
    pub fn from_mapping(text: &str) -> Result<Schema> {
        let mut builder = Schema::builder();
        builder.mapping("<inline>", text)?;
        builder.build()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Get an entity by ID
    #[track_caller]
    pub fn entity(&self, id: EntityId) -> &Entity {
        self.entities.get(id.0).expect("invalid entity ID")
    }

    /// Looks up an entity by name, ignoring case.
    pub fn entity_by_name(&self, name: &str) -> Option<&Entity> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|id| &self.entities[id.0])
    }

    /// Like [`Schema::entity_by_name`], but an unknown name is an error.
    pub fn resolve_entity(&self, name: &str) -> Result<&Entity> {
        self.entity_by_name(name)
            .ok_or_else(|| Error::invalid_mapping(format!("no mapping for entity `{name}`")))
    }

    pub fn base(&self, entity: &Entity) -> Option<&Entity> {
        entity.base.map(|id| self.entity(id))
    }

    /// Iterates over `entity` and then each of its ancestors, nearest first.
    pub fn lineage<'a>(&'a self, entity: &'a Entity) -> impl Iterator<Item = &'a Entity> + 'a {
        std::iter::successors(Some(entity), move |entity| self.base(entity))
    }

    /// Finds the entity in `entity`'s lineage that declares the property
    /// `name`.
    pub fn find_property<'a>(
        &'a self,
        entity: &'a Entity,
        name: &str,
    ) -> Option<(&'a Entity, &'a Property)> {
        self.lineage(entity)
            .find_map(|owner| owner.property(name).map(|property| (owner, property)))
    }

    /// Finds the entity in `entity`'s lineage that declares the navigation
    /// `name`.
    pub fn find_navigation<'a>(
        &'a self,
        entity: &'a Entity,
        name: &str,
    ) -> Option<(&'a Entity, &'a Navigation)> {
        self.lineage(entity)
            .find_map(|owner| owner.navigation(name).map(|nav| (owner, nav)))
    }
}
