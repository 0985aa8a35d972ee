use super::mapping::{Document, EntityDef, PropertyDef};
use super::{Entity, EntityId, JoinKind, KeyPair, Navigation, Property, Schema};
use crate::{Error, Result};

use indexmap::IndexMap;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct Builder {
    /// Parsed mapping documents, tagged with the source they came from
    sources: Vec<(String, Document)>,
}

/// Used to track state during the build process
struct BuildSchema<'a> {
    /// Entity definitions in declaration order, with their source names
    defs: Vec<(&'a str, &'a EntityDef)>,

    /// Lower-cased entity name to identifier
    lookup: HashMap<String, EntityId>,

    /// Resolved base entity for each definition
    bases: Vec<Option<EntityId>>,

    /// Key properties, computed on demand so subtypes can take their base's
    keys: Vec<Option<Vec<Property>>>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `text` as a mapping document and adds it. `source` names the
    /// document in error messages.
    pub fn mapping(&mut self, source: impl Into<String>, text: &str) -> Result<&mut Self> {
        let source = source.into();
        let document = Document::parse(text)
            .map_err(|err| err.context(Error::invalid_mapping(format!("cannot parse `{source}`"))))?;
        Ok(self.document(source, document))
    }

    /// Adds an already-parsed mapping document.
    pub fn document(&mut self, source: impl Into<String>, document: Document) -> &mut Self {
        self.sources.push((source.into(), document));
        self
    }

    pub fn build(&self) -> Result<Schema> {
        let mut builder = BuildSchema {
            defs: vec![],
            lookup: HashMap::new(),
            bases: vec![],
            keys: vec![],
        };

        builder.collect_defs(&self.sources)?;
        builder.resolve_bases()?;

        let mut entities = Vec::with_capacity(builder.defs.len());

        for index in 0..builder.defs.len() {
            entities.push(builder.build_entity(EntityId(index))?);
        }

        Ok(Schema {
            entities,
            by_name: builder.lookup,
        })
    }
}

impl<'a> BuildSchema<'a> {
    fn collect_defs(&mut self, sources: &'a [(String, Document)]) -> Result<()> {
        for (source, document) in sources {
            for def in &document.entities {
                let key = def.name.to_lowercase();

                if let Some(existing) = self.lookup.get(&key) {
                    let (existing_source, _) = self.defs[existing.0];
                    return Err(Error::invalid_mapping(format!(
                        "entity `{}` is declared in both `{}` and `{}`",
                        def.name, existing_source, source
                    )));
                }

                self.lookup.insert(key, EntityId(self.defs.len()));
                self.defs.push((source.as_str(), def));
            }
        }

        self.keys = vec![None; self.defs.len()];
        Ok(())
    }

    fn resolve_bases(&mut self) -> Result<()> {
        for (_, def) in &self.defs {
            let base = match &def.inherit {
                Some(name) => Some(self.entity_id(name).ok_or_else(|| {
                    Error::invalid_mapping(format!(
                        "entity `{}` inherits unknown entity `{}`",
                        def.name, name
                    ))
                })?),
                None => None,
            };
            self.bases.push(base);
        }

        // Reject inheritance cycles
        for start in 0..self.defs.len() {
            let mut current = self.bases[start];
            let mut steps = 0;

            while let Some(id) = current {
                steps += 1;
                if id.0 == start || steps > self.defs.len() {
                    return Err(Error::invalid_mapping(format!(
                        "entity `{}` inherits from itself",
                        self.defs[start].1.name
                    )));
                }
                current = self.bases[id.0];
            }
        }

        Ok(())
    }

    fn entity_id(&self, name: &str) -> Option<EntityId> {
        self.lookup.get(&name.to_lowercase()).copied()
    }

    /// The nearest ancestor of `id` declaring a property named `name`.
    fn ancestor_declaring(&self, id: EntityId, name: &str) -> Option<&'a str> {
        let mut current = self.bases[id.0];

        while let Some(base) = current {
            let (_, def) = self.defs[base.0];
            if def
                .keys
                .iter()
                .chain(&def.properties)
                .any(|property| property.name.eq_ignore_ascii_case(name))
            {
                return Some(def.name.as_str());
            }
            current = self.bases[base.0];
        }

        None
    }

    fn key_properties(&mut self, id: EntityId) -> Vec<Property> {
        if let Some(keys) = &self.keys[id.0] {
            return keys.clone();
        }

        let (_, def) = self.defs[id.0];

        let keys: Vec<Property> = match self.bases[id.0] {
            Some(base) if def.keys.is_empty() => self
                .key_properties(base)
                .into_iter()
                .map(|property| Property {
                    sequence: false,
                    ..property
                })
                .collect(),
            _ => def
                .keys
                .iter()
                .map(|def| Property {
                    key: true,
                    ..property_from_def(def)
                })
                .collect(),
        };

        self.keys[id.0] = Some(keys.clone());
        keys
    }

    fn build_entity(&mut self, id: EntityId) -> Result<Entity> {
        let (_, def) = self.defs[id.0];

        let mut properties: IndexMap<String, Property> = IndexMap::new();

        let keys = self.key_properties(id);
        let rest = def.properties.iter().map(property_from_def);

        for property in keys.into_iter().chain(rest) {
            let name = property.name.to_lowercase();
            if properties.contains_key(&name) {
                return Err(Error::invalid_mapping(format!(
                    "property `{}` is declared twice on entity `{}`",
                    property.name, def.name
                )));
            }
            properties.insert(name, property);
        }

        let mut navigations: Vec<Navigation> = vec![];

        for nav in &def.navigations {
            let target = self.entity_id(&nav.target).ok_or_else(|| {
                Error::invalid_mapping(format!(
                    "navigation `{}.{}` targets unknown entity `{}`",
                    def.name, nav.name, nav.target
                ))
            })?;

            if nav.keys.is_empty() {
                return Err(Error::invalid_mapping(format!(
                    "navigation `{}.{}` declares no keys",
                    def.name, nav.name
                )));
            }

            let (_, target_def) = self.defs[target.0];
            let target_keys = self.key_properties(target);

            let mut keys = Vec::with_capacity(nav.keys.len());

            for pair in &nav.keys {
                let Some(source) = properties.get(&pair.from.to_lowercase()) else {
                    if let Some(owner) = self.ancestor_declaring(id, &pair.from) {
                        return Err(Error::invalid_mapping(format!(
                            "navigation `{}.{}` is keyed on `{}`, which is inherited from `{}`; \
                             declare the navigation on `{}`",
                            def.name, nav.name, pair.from, owner, owner
                        )));
                    }

                    return Err(Error::invalid_mapping(format!(
                        "navigation `{}.{}` uses unknown source property `{}`",
                        def.name, nav.name, pair.from
                    )));
                };

                let target_property = target_keys
                    .iter()
                    .map(|property| property.name.as_str())
                    .chain(target_def.properties.iter().map(|def| def.name.as_str()))
                    .find(|name| name.eq_ignore_ascii_case(&pair.to));

                let Some(target_property) = target_property else {
                    return Err(Error::invalid_mapping(format!(
                        "navigation `{}.{}` uses unknown target property `{}.{}`",
                        def.name, nav.name, target_def.name, pair.to
                    )));
                };

                keys.push(KeyPair {
                    source: source.name.clone(),
                    target: target_property.to_string(),
                });
            }

            self.push_navigation(
                def,
                &properties,
                &mut navigations,
                Navigation {
                    name: nav.name.clone(),
                    target,
                    kind: nav.mode,
                    keys,
                    inheritance: false,
                },
            )?;
        }

        if let Some(base) = self.bases[id.0] {
            let (_, base_def) = self.defs[base.0];
            let own_keys: Vec<_> = properties.values().filter(|p| p.key).cloned().collect();
            let base_keys = self.key_properties(base);

            if own_keys.len() != base_keys.len() || own_keys.is_empty() {
                return Err(Error::invalid_mapping(format!(
                    "entity `{}` declares {} key(s) but its base `{}` has {}",
                    def.name,
                    own_keys.len(),
                    base_def.name,
                    base_keys.len()
                )));
            }

            let keys = own_keys
                .iter()
                .zip(&base_keys)
                .map(|(source, target)| KeyPair {
                    source: source.name.clone(),
                    target: target.name.clone(),
                })
                .collect();

            self.push_navigation(
                def,
                &properties,
                &mut navigations,
                Navigation {
                    name: base_def.name.clone(),
                    target: base,
                    kind: JoinKind::Inner,
                    keys,
                    inheritance: true,
                },
            )?;
        }

        Ok(Entity {
            id,
            name: def.name.clone(),
            table: def.table.clone().unwrap_or_else(|| def.name.clone()),
            schema: def.schema.clone(),
            properties: properties.into_values().collect(),
            navigations,
            base: self.bases[id.0],
        })
    }

    fn push_navigation(
        &self,
        def: &EntityDef,
        properties: &IndexMap<String, Property>,
        navigations: &mut Vec<Navigation>,
        nav: Navigation,
    ) -> Result<()> {
        let name = nav.name.to_lowercase();

        if properties.contains_key(&name)
            || navigations
                .iter()
                .any(|existing| existing.name.eq_ignore_ascii_case(&name))
        {
            return Err(Error::invalid_mapping(format!(
                "member `{}` is declared twice on entity `{}`",
                nav.name, def.name
            )));
        }

        navigations.push(nav);
        Ok(())
    }
}

fn property_from_def(def: &PropertyDef) -> Property {
    Property {
        column: def.column.clone().unwrap_or_else(|| def.name.clone()),
        ignored: def.ignored,
        constructor: def.constructor.clone(),
        sequence: def.sequence,
        ..Property::new(def.name.clone())
    }
}
