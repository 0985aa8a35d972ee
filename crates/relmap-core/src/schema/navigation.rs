use super::{EntityId, JoinKind};

/// A foreign-key-like edge usable as a segment of a dotted member path.
#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    pub name: String,

    pub target: EntityId,

    pub kind: JoinKind,

    /// Source property to target property pairs, in declaration order
    pub keys: Vec<KeyPair>,

    /// True for the synthetic edge from a subtype to its base
    pub inheritance: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyPair {
    /// Property on the entity declaring the navigation
    pub source: String,

    /// Property on the navigation target
    pub target: String,
}
