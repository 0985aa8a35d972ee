use super::{Navigation, Property};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub usize);

/// One mapped table/type pair.
#[derive(Debug)]
pub struct Entity {
    pub id: EntityId,

    pub name: String,

    /// Physical table name
    pub table: String,

    /// Optional database schema qualifying the table
    pub schema: Option<String>,

    /// Declared properties, key properties first
    pub properties: Vec<Property>,

    /// Declared navigation edges. When the entity inherits, this includes
    /// the synthetic edge to its base, named after the base entity.
    pub navigations: Vec<Navigation>,

    /// The entity this one inherits from
    pub base: Option<EntityId>,
}

impl Entity {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|property| property.name.eq_ignore_ascii_case(name))
    }

    pub fn navigation(&self, name: &str) -> Option<&Navigation> {
        self.navigations
            .iter()
            .find(|nav| nav.name.eq_ignore_ascii_case(name))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|property| property.key)
    }

    /// Properties backed by a physical column.
    pub fn columns(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|property| !property.ignored)
    }

    /// The sequence-generated property, if any.
    pub fn sequence(&self) -> Option<&Property> {
        self.properties.iter().find(|property| property.sequence)
    }

    /// The synthetic navigation to the base entity.
    pub fn base_navigation(&self) -> Option<&Navigation> {
        self.navigations.iter().find(|nav| nav.inheritance)
    }
}
