use super::Model;
use crate::{err, Error, Result};

use indexmap::IndexMap;
use relmap_core::{
    stmt::{Record, Value},
    Schema,
};
use std::fmt;

type Construct<M> = Box<dyn Fn(&mut Args) -> Result<M> + Send + Sync>;
type SetField<M> = Box<dyn Fn(&mut M, Value) -> Result<()> + Send + Sync>;
type SetNavigation<M> = Box<dyn Fn(&mut M, Record, &Schema) -> Result<()> + Send + Sync>;

/// How to build a `M` from a [`Record`].
///
/// Built once per type and reused, typically from a `LazyLock`:
///
/// ```
/// use relmap::{model::Descriptor, stmt::Record, Model, Result, Schema};
/// use std::sync::LazyLock;
///
/// #[derive(Default)]
/// struct Order {
///     id: i64,
///     total: f64,
/// }
///
/// impl Model for Order {
///     fn load(record: Record, schema: &Schema) -> Result<Self> {
///         static DESCRIPTOR: LazyLock<Descriptor<Order>> = LazyLock::new(|| {
///             Descriptor::with_default("Order")
///                 .field("Id", |order: &mut Order, id| order.id = id)
///                 .field("Total", |order: &mut Order, total| order.total = total)
///         });
///
///         DESCRIPTOR.load(record, schema)
///     }
/// }
/// ```
pub struct Descriptor<M> {
    entity: String,
    construct: Construct<M>,
    fields: Vec<(String, SetField<M>)>,
    navigations: Vec<(String, SetNavigation<M>)>,
}

/// Constructor arguments, keyed by the parameter names the mapping declares.
#[derive(Debug, Default)]
pub struct Args {
    values: IndexMap<String, Value>,
}

impl<M: 'static> Descriptor<M> {
    /// `construct` receives the values of the entity's constructor
    /// properties.
    pub fn new(
        entity: impl Into<String>,
        construct: impl Fn(&mut Args) -> Result<M> + Send + Sync + 'static,
    ) -> Descriptor<M> {
        Descriptor {
            entity: entity.into(),
            construct: Box::new(construct),
            fields: vec![],
            navigations: vec![],
        }
    }

    pub fn with_default(entity: impl Into<String>) -> Descriptor<M>
    where
        M: Default,
    {
        Descriptor::new(entity, |_| Ok(M::default()))
    }

    /// Sets a field from the column mapped to `member`. Null columns are
    /// skipped.
    pub fn field<T>(mut self, member: &str, set: impl Fn(&mut M, T) + Send + Sync + 'static) -> Self
    where
        T: TryFrom<Value, Error = Error>,
    {
        self.fields.push((
            member.to_string(),
            Box::new(move |model, value| {
                set(model, T::try_from(value)?);
                Ok(())
            }),
        ));
        self
    }

    /// Sets a field from the nested record of navigation `name`, when the
    /// row carried one.
    pub fn navigation<N: Model>(
        mut self,
        name: &str,
        set: impl Fn(&mut M, N) + Send + Sync + 'static,
    ) -> Self {
        self.navigations.push((
            name.to_string(),
            Box::new(move |model, record, schema| {
                set(model, N::load(record, schema)?);
                Ok(())
            }),
        ));
        self
    }

    pub fn load(&self, mut record: Record, schema: &Schema) -> Result<M> {
        let entity = schema.resolve_entity(&self.entity)?;

        let mut args = Args::default();
        for owner in schema.lineage(entity) {
            for property in owner.columns() {
                let Some(param) = &property.constructor else {
                    continue;
                };

                if let Some(value) = record.get(&property.column) {
                    args.values.insert(param.clone(), value.clone());
                }
            }
        }

        let mut model = (self.construct)(&mut args)
            .map_err(|e| e.context(err!("constructing `{}`", entity.name)))?;

        for (member, set) in &self.fields {
            let column = match schema.find_property(entity, member) {
                Some((_, property)) if property.ignored || property.constructor.is_some() => {
                    continue
                }
                Some((_, property)) => property.column.as_str(),
                None => member.as_str(),
            };

            match record.get(column) {
                Some(value) if !value.is_null() => set(&mut model, value.clone())
                    .map_err(|e| e.context(err!("loading `{}.{member}`", entity.name)))?,
                _ => {}
            }
        }

        for (name, set) in &self.navigations {
            let key = record
                .navigations
                .keys()
                .find(|key| key.eq_ignore_ascii_case(name))
                .cloned();

            if let Some(nested) = key.and_then(|key| record.navigations.shift_remove(&key)) {
                set(&mut model, nested, schema)?;
            }
        }

        Ok(model)
    }
}

impl Args {
    /// Takes the argument `name`. A missing argument converts as null.
    pub fn take<T>(&mut self, name: &str) -> Result<T>
    where
        T: TryFrom<Value, Error = Error>,
    {
        T::try_from(self.remove(name))
            .map_err(|e| e.context(err!("constructor argument `{name}`")))
    }

    pub fn take_option<T>(&mut self, name: &str) -> Result<Option<T>>
    where
        T: TryFrom<Value, Error = Error>,
    {
        self.remove(name).try_into_option()
    }

    fn remove(&mut self, name: &str) -> Value {
        let key = self
            .values
            .keys()
            .find(|key| key.eq_ignore_ascii_case(name))
            .cloned();

        key.and_then(|key| self.values.shift_remove(&key))
            .unwrap_or_default()
    }
}

impl<M> fmt::Debug for Descriptor<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("entity", &self.entity)
            .field(
                "fields",
                &self.fields.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .field(
                "navigations",
                &self.navigations.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .finish()
    }
}
