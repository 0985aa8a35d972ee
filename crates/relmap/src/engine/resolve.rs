use super::alias::{AliasGraph, ScopeId};

use indexmap::IndexSet;
use regex::Regex;
use relmap_core::{
    schema::{Entity, EntityId, Schema},
    stmt, Error, Result,
};
use relmap_sql::stmt::{Expr, SelectItem};
use std::{cell::OnceCell, collections::HashMap, sync::LazyLock};

/// `FUNC(inner.path)`
static AGGREGATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*\((.+)\)\s*$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ColumnId(usize);

/// A member path resolved to a physical column of one scope.
#[derive(Debug)]
pub(crate) struct ColumnRef {
    /// The member path as written
    pub(crate) path: String,

    pub(crate) scope: ScopeId,

    /// The mapped column, or the leaf itself when no property declares it
    pub(crate) column: String,

    /// Upper-cased aggregate function wrapping the column
    pub(crate) aggregate: Option<String>,

    /// The grouped row count marker
    pub(crate) count: bool,

    expr: OnceCell<Expr>,
    alias: OnceCell<String>,
}

/// Resolves member paths against one query root, growing the alias graph
/// as navigations are walked. Each path is resolved once; later lookups of
/// the same path share the reference and its joins.
#[derive(Debug)]
pub(crate) struct Resolver<'a> {
    graph: AliasGraph<'a>,
    columns: Vec<ColumnRef>,
    by_path: HashMap<String, ColumnId>,
}

impl ColumnRef {
    fn new(path: &str, scope: ScopeId, column: String) -> ColumnRef {
        ColumnRef {
            path: path.to_string(),
            scope,
            column,
            aggregate: None,
            count: false,
            expr: OnceCell::new(),
            alias: OnceCell::new(),
        }
    }

    pub(crate) fn is_aggregate(&self) -> bool {
        self.count || self.aggregate.is_some()
    }

    /// The qualified column, aggregate-wrapped when applicable. Aliases must
    /// be assigned first.
    pub(crate) fn to_column(&self, graph: &AliasGraph<'_>) -> Expr {
        self.expr
            .get_or_init(|| {
                if self.count {
                    return Expr::CountAll;
                }

                let column = Expr::column(graph.alias(self.scope), &self.column);

                match &self.aggregate {
                    Some(function) => Expr::func(function, vec![column]),
                    None => column,
                }
            })
            .clone()
    }

    /// The select-list alias the materializer reads the value back from:
    /// `<alias>_<column>`, `<alias>_<AGG>_<column>` or `<alias>_COUNT`.
    pub(crate) fn result_alias(&self, graph: &AliasGraph<'_>) -> &str {
        self.alias.get_or_init(|| {
            let alias = graph.alias(self.scope);

            if self.count {
                format!("{alias}_COUNT")
            } else if let Some(function) = &self.aggregate {
                format!("{alias}_{function}_{}", self.column)
            } else {
                format!("{alias}_{}", self.column)
            }
        })
    }

    pub(crate) fn to_select_item(&self, graph: &AliasGraph<'_>) -> SelectItem {
        SelectItem::aliased(self.to_column(graph), self.result_alias(graph))
    }
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(schema: &'a Schema, root: EntityId) -> Resolver<'a> {
        Resolver {
            graph: AliasGraph::new(schema, root),
            columns: vec![],
            by_path: HashMap::new(),
        }
    }

    pub(crate) fn graph(&self) -> &AliasGraph<'a> {
        &self.graph
    }

    pub(crate) fn graph_mut(&mut self) -> &mut AliasGraph<'a> {
        &mut self.graph
    }

    pub(crate) fn into_graph(self) -> AliasGraph<'a> {
        self.graph
    }

    pub(crate) fn root(&self) -> &'a Entity {
        self.graph.entity(AliasGraph::ROOT)
    }

    pub(crate) fn column(&self, id: ColumnId) -> &ColumnRef {
        &self.columns[id.0]
    }

    pub(crate) fn to_column(&self, id: ColumnId) -> Expr {
        self.column(id).to_column(&self.graph)
    }

    pub(crate) fn result_alias(&self, id: ColumnId) -> &str {
        self.column(id).result_alias(&self.graph)
    }

    pub(crate) fn to_select_item(&self, id: ColumnId) -> SelectItem {
        self.column(id).to_select_item(&self.graph)
    }

    pub(crate) fn resolve(&mut self, path: &str) -> Result<ColumnId> {
        if let Some(id) = self.by_path.get(path) {
            return Ok(*id);
        }

        let column = self.resolve_path(path)?;
        let id = ColumnId(self.columns.len());
        self.columns.push(column);
        self.by_path.insert(path.to_string(), id);
        Ok(id)
    }

    pub(crate) fn resolve_all<'p>(
        &mut self,
        paths: impl IntoIterator<Item = &'p str>,
    ) -> Result<Vec<ColumnId>> {
        paths.into_iter().map(|path| self.resolve(path)).collect()
    }

    fn resolve_path(&mut self, path: &str) -> Result<ColumnRef> {
        if stmt::is_count_marker(path) {
            let mut column = ColumnRef::new(path, AliasGraph::ROOT, "COUNT".to_string());
            column.count = true;
            return Ok(column);
        }

        if let Some(captures) = AGGREGATE.captures(path) {
            let inner = captures[2].trim();

            if inner.contains('(') {
                return Err(self.unresolved(path, "nested aggregates are not supported"));
            }

            let mut column = self.resolve_member(path, inner)?;
            column.aggregate = Some(captures[1].to_uppercase());
            return Ok(column);
        }

        self.resolve_member(path, path)
    }

    fn resolve_member(&mut self, path: &str, member: &str) -> Result<ColumnRef> {
        let segments: Vec<&str> = member.split('.').map(str::trim).collect();

        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(self.unresolved(path, "empty path segment"));
        }

        let Some((leaf, navigations)) = segments.split_last() else {
            return Err(self.unresolved(path, "empty path"));
        };

        let schema = self.graph.schema();
        let mut scope = AliasGraph::ROOT;

        for segment in navigations {
            let entity = self.graph.entity(scope);

            let Some((owner, navigation)) = schema.find_navigation(entity, segment) else {
                let reason = format!("`{segment}` is not a navigation of `{}`", entity.name);
                return Err(self.unresolved(path, reason));
            };

            scope = self.graph.ensure_ancestor(scope, owner.id);
            let join = self.graph.ensure_join(scope, navigation);
            scope = self.graph.join(join).target;
        }

        let entity = self.graph.entity(scope);

        match schema.find_property(entity, leaf) {
            Some((_, property)) if property.ignored => {
                let reason = format!("`{leaf}` is not mapped to a column");
                Err(self.unresolved(path, reason))
            }
            Some((owner, property)) => {
                let scope = self.graph.ensure_ancestor(scope, owner.id);
                Ok(ColumnRef::new(path, scope, property.column.clone()))
            }
            None if schema.find_navigation(entity, leaf).is_some() => {
                let reason = format!("`{leaf}` is a navigation, not a column");
                Err(self.unresolved(path, reason))
            }
            None => Ok(ColumnRef::new(path, scope, leaf.to_string())),
        }
    }

    fn unresolved(&self, path: &str, reason: impl Into<String>) -> Error {
        Error::unresolved_member(&self.root().name, path, reason)
    }
}

/// Expands a projection into column member paths.
///
/// No members selects every column of `entity` and its ancestors. A member
/// naming a navigation selects every column of its target. Duplicates are
/// dropped, keeping the first occurrence.
pub(crate) fn expand_members(schema: &Schema, entity: &Entity, members: &[String]) -> Vec<String> {
    let mut expanded = IndexSet::new();

    if members.is_empty() {
        push_columns(schema, entity, "", &mut expanded);
    }

    for member in members {
        match navigation_target(schema, entity, member) {
            Some(target) => push_columns(schema, target, member, &mut expanded),
            None => {
                expanded.insert(member.clone());
            }
        }
    }

    expanded.into_iter().collect()
}

/// The entity reached when every segment of `member` is a navigation.
fn navigation_target<'a>(schema: &'a Schema, entity: &'a Entity, member: &str) -> Option<&'a Entity> {
    if stmt::is_count_marker(member) || AGGREGATE.is_match(member) {
        return None;
    }

    let mut entity = entity;

    for segment in member.split('.').map(str::trim) {
        if schema.find_property(entity, segment).is_some() {
            return None;
        }

        let (_, navigation) = schema.find_navigation(entity, segment)?;
        entity = schema.entity(navigation.target);
    }

    Some(entity)
}

fn push_columns(schema: &Schema, entity: &Entity, prefix: &str, dst: &mut IndexSet<String>) {
    let mut seen: Vec<&str> = vec![];
    let mut chain = prefix.to_string();

    for (depth, owner) in schema.lineage(entity).enumerate() {
        if depth > 0 {
            chain = join_path(&chain, &owner.name);
        }

        for property in owner.columns() {
            let shadowed = seen.iter().any(|name| name.eq_ignore_ascii_case(&property.name));

            let path = match (shadowed, property.key) {
                // Subtypes carry their base's keys
                (true, true) => continue,
                (true, false) => join_path(&chain, &property.name),
                (false, _) => join_path(prefix, &property.name),
            };

            seen.push(&property.name);
            dst.insert(path);
        }
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
