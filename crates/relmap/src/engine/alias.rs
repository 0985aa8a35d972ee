use relmap_core::schema::{Entity, EntityId, JoinKind, Navigation, Schema};
use relmap_sql::stmt::Expr;

use std::collections::HashMap;

/// One aliased occurrence of an entity's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ScopeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct JoinId(usize);

/// Hands out table and join alias numbers for one statement. Sub-queries
/// compiled as part of the statement draw from the same counter so their
/// aliases never collide with the outer query's.
#[derive(Debug, Default)]
pub(crate) struct AliasCounter {
    tables: usize,
    joins: usize,
}

#[derive(Debug)]
pub(crate) struct Scope {
    pub(crate) entity: EntityId,

    /// The join reaching this scope. `None` for the root.
    pub(crate) join: Option<JoinId>,

    /// Joins hanging off this scope, in creation order
    pub(crate) children: Vec<JoinId>,

    alias: String,
}

#[derive(Debug)]
pub(crate) struct JoinNode {
    pub(crate) parent: ScopeId,
    pub(crate) target: ScopeId,
    pub(crate) navigation: Navigation,

    /// Join kind forced by the consistency pass
    pub(crate) kind: Option<JoinKind>,

    /// Alias the ON clause reads the parent's columns from, when the parent
    /// has been wrapped in a derived table.
    pub(crate) host: Option<String>,

    /// Predicates ANDed into the ON clause
    pub(crate) extra_on: Vec<Expr>,

    /// Depth-first position, assigned with the aliases
    order: usize,
}

/// Per-query overlay over the schema: which tables a statement reads, how
/// they are joined, and what they are called.
#[derive(Debug)]
pub(crate) struct AliasGraph<'a> {
    schema: &'a Schema,
    scopes: Vec<Scope>,
    joins: Vec<JoinNode>,
    edges: HashMap<(ScopeId, String), JoinId>,
}

impl AliasCounter {
    pub(crate) fn next_table(&mut self) -> String {
        let index = self.tables;
        self.tables += 1;

        if index == 0 {
            "T".to_string()
        } else {
            format!("T{index}")
        }
    }

    fn next_join(&mut self) -> String {
        let index = self.joins;
        self.joins += 1;
        format!("J{index}")
    }
}

impl JoinNode {
    /// The kind the join is rendered with.
    pub(crate) fn kind(&self) -> JoinKind {
        self.kind.unwrap_or(self.navigation.kind)
    }
}

impl<'a> AliasGraph<'a> {
    pub(crate) const ROOT: ScopeId = ScopeId(0);

    pub(crate) fn new(schema: &'a Schema, root: EntityId) -> AliasGraph<'a> {
        AliasGraph {
            schema,
            scopes: vec![Scope {
                entity: root,
                join: None,
                children: vec![],
                alias: String::new(),
            }],
            joins: vec![],
            edges: HashMap::new(),
        }
    }

    pub(crate) fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub(crate) fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub(crate) fn entity(&self, id: ScopeId) -> &'a Entity {
        self.schema.entity(self.scope(id).entity)
    }

    pub(crate) fn alias(&self, id: ScopeId) -> &str {
        &self.scope(id).alias
    }

    pub(crate) fn join(&self, id: JoinId) -> &JoinNode {
        &self.joins[id.0]
    }

    pub(crate) fn join_mut(&mut self, id: JoinId) -> &mut JoinNode {
        &mut self.joins[id.0]
    }

    /// Returns the join traversing `navigation` from `parent`, creating it
    /// and its target scope on first use.
    pub(crate) fn ensure_join(&mut self, parent: ScopeId, navigation: &Navigation) -> JoinId {
        let key = (parent, navigation.name.to_lowercase());

        if let Some(id) = self.edges.get(&key) {
            return *id;
        }

        let id = JoinId(self.joins.len());
        let target = ScopeId(self.scopes.len());

        self.scopes.push(Scope {
            entity: navigation.target,
            join: Some(id),
            children: vec![],
            alias: String::new(),
        });

        self.joins.push(JoinNode {
            parent,
            target,
            navigation: navigation.clone(),
            kind: None,
            host: None,
            extra_on: vec![],
            order: 0,
        });

        self.scopes[parent.0].children.push(id);
        self.edges.insert(key, id);
        id
    }

    /// Follows inheritance edges from `scope` until reaching the scope of
    /// `owner`, which must be `scope`'s entity or one of its ancestors.
    pub(crate) fn ensure_ancestor(&mut self, mut scope: ScopeId, owner: EntityId) -> ScopeId {
        while self.scope(scope).entity != owner {
            let Some(base) = self.entity(scope).base_navigation() else {
                break;
            };
            let join = self.ensure_join(scope, base);
            scope = self.join(join).target;
        }
        scope
    }

    /// Names every scope: the root takes the next table alias and joins are
    /// numbered depth-first.
    pub(crate) fn assign_aliases(&mut self, counter: &mut AliasCounter) {
        self.scopes[0].alias = counter.next_table();

        let mut order = 0;
        let mut stack: Vec<JoinId> = self.scopes[0].children.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            let target = self.joins[id.0].target;
            self.joins[id.0].order = order;
            order += 1;

            self.scopes[target.0].alias = counter.next_join();
            stack.extend(self.scopes[target.0].children.iter().rev());
        }
    }

    /// Leaves the root unaliased, for statements that name a single table.
    pub(crate) fn assign_unaliased(&mut self) {
        self.scopes[0].alias = String::new();
    }

    /// Joins walked from the root to reach `scope`, root side first.
    pub(crate) fn path_to(&self, mut scope: ScopeId) -> Vec<JoinId> {
        let mut path = vec![];
        while let Some(join) = self.scope(scope).join {
            path.push(join);
            scope = self.join(join).parent;
        }
        path.reverse();
        path
    }

    /// Every join needed to reach the given scopes, in depth-first order.
    pub(crate) fn required(&self, scopes: impl IntoIterator<Item = ScopeId>) -> Vec<JoinId> {
        let mut required: Vec<JoinId> = vec![];

        for scope in scopes {
            for join in self.path_to(scope) {
                if !required.contains(&join) {
                    required.push(join);
                }
            }
        }

        required.sort_by_key(|join| self.join(*join).order);
        required
    }

    /// Points the joins hanging off the root at `alias`, the derived table
    /// wrapping a grouped query.
    pub(crate) fn reparent_for_grouping(&mut self, joins: &[JoinId], alias: &str) {
        for join in joins {
            if self.joins[join.0].parent == Self::ROOT {
                self.joins[join.0].host = Some(alias.to_string());
            }
        }
    }
}
