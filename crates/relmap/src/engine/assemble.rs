use super::{
    alias::{AliasCounter, AliasGraph, JoinId, ScopeId},
    column_name, consistency, filter,
    resolve::{expand_members, ColumnId, Resolver},
    table_name,
};

use relmap_core::{
    schema::Schema,
    stmt::{self, Filter, Grouping, Paging, Query, Sorting, Value},
    Error, Result,
};
use relmap_sql::stmt::{Expr, Join, Limit, OrderBy, Select, SelectItem, Source};

/// State shared by every query compiled into one statement: the alias
/// counter and the parameter list, both threaded through sub-queries.
#[derive(Debug)]
pub(crate) struct Compiler<'a> {
    schema: &'a Schema,
    counter: AliasCounter,
    params: Vec<Value>,
}

/// A compiled query and what is needed to read its rows back.
#[derive(Debug)]
pub(crate) struct SelectPlan<'a> {
    pub(crate) select: Select,

    /// Counts the rows `select` returns before paging. Shares its
    /// parameters.
    pub(crate) count: Select,

    pub(crate) params: Vec<Value>,

    pub(crate) graph: AliasGraph<'a>,
}

impl<'a> Compiler<'a> {
    pub(crate) fn new(schema: &'a Schema) -> Compiler<'a> {
        Compiler {
            schema,
            counter: AliasCounter::default(),
            params: vec![],
        }
    }

    /// Pushes a parameter and returns its placeholder.
    pub(crate) fn param(&mut self, value: Value) -> Expr {
        let index = self.params.len();
        self.params.push(value);
        Expr::Placeholder(index)
    }

    pub(crate) fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub(crate) fn into_params(self) -> Vec<Value> {
        self.params
    }

    /// Compiles the query on the right of an `IN`. Paging is honoured by
    /// wrapping the limited query in a derived table, since some databases
    /// reject `LIMIT` directly inside `IN (...)`.
    pub(crate) fn subquery(&mut self, query: &Query) -> Result<Select> {
        let entity = self.schema.resolve_entity(&query.entity)?;

        let [member] = query.members.as_slice() else {
            return Err(Error::unsupported_feature(format!(
                "a sub-query on `{}` must project exactly one member, got {}",
                entity.name,
                query.members.len()
            )));
        };

        if query.grouping.is_some() {
            return Err(Error::unsupported_feature(format!(
                "grouped sub-query on `{}`",
                entity.name
            )));
        }

        let mut resolver = Resolver::new(self.schema, entity.id);
        let id = resolver.resolve(member)?;
        let mut projected = vec![id];
        projected.extend(resolver.resolve_all(sort_members(&query.sorting))?);

        let mut select = self.filtered_select(&mut resolver, &query.filter, &projected)?;

        let Some(paging) = query.paging.filter(|paging| paging.size > 0) else {
            select.items = vec![resolver.to_column(id).into()];
            return Ok(select);
        };

        select.items = vec![resolver.to_select_item(id)];
        select.order_by = filter::compile_sorting(&mut resolver, &query.sorting)?;
        select.limit = limit(&paging);

        let alias = self.counter.next_table();
        let column = Expr::column(&alias, resolver.result_alias(id));

        let mut outer = Select::new(Source::derived(select, alias));
        outer.items = vec![column.into()];
        Ok(outer)
    }

    /// Names the scopes, then builds `SELECT ... FROM <root> <joins> WHERE
    /// ...` with an empty select list. `members` are the resolved columns
    /// the caller will project or sort by; the filter's columns are added
    /// here.
    fn filtered_select(
        &mut self,
        resolver: &mut Resolver<'a>,
        filter: &Filter,
        members: &[ColumnId],
    ) -> Result<Select> {
        let filtered = resolve_filter(resolver, filter)?;
        resolver.graph_mut().assign_aliases(&mut self.counter);

        let required = {
            let scopes = scopes(resolver, members.iter().chain(&filtered));
            resolver.graph().required(scopes)
        };
        consistency::apply(resolver.graph_mut(), &required);

        let mut select = Select::new(root_source(resolver));
        select.joins = render_joins(resolver.graph(), &required);
        select.filter = filter::compile(self, resolver, filter)?;
        Ok(select)
    }
}

impl SelectPlan<'_> {
    pub(crate) fn apply_paging(&mut self, paging: &Paging) {
        self.select.limit = limit(paging);
    }
}

/// Compiles a query into its SELECT and companion COUNT.
pub(crate) fn select<'a>(schema: &'a Schema, query: &Query) -> Result<SelectPlan<'a>> {
    let entity = schema.resolve_entity(&query.entity)?;

    let mut cx = Compiler::new(schema);
    let mut resolver = Resolver::new(schema, entity.id);

    let members = expand_members(schema, entity, &query.members);
    let display = resolver.resolve_all(members.iter().map(String::as_str))?;
    let sorted = resolver.resolve_all(sort_members(&query.sorting))?;

    let (select, count) = match &query.grouping {
        None => {
            let projected = [display.as_slice(), sorted.as_slice()].concat();
            let mut select = cx.filtered_select(&mut resolver, &query.filter, &projected)?;

            let mut count = select.clone();
            count.items = vec![Expr::CountAll.into()];

            select.items = display
                .iter()
                .map(|id| resolver.to_select_item(*id))
                .collect();
            select.order_by = filter::compile_sorting(&mut resolver, &query.sorting)?;

            (select, count)
        }
        Some(grouping) => grouped(&mut cx, &mut resolver, query, grouping, &display, &sorted)?,
    };

    Ok(SelectPlan {
        select,
        count,
        params: cx.into_params(),
        graph: resolver.into_graph(),
    })
}

/// Compiles a grouped query, wrapped in a derived table so that columns
/// which are neither grouped nor aggregated can be joined on afterwards:
///
/// ```sql
/// SELECT J0.`Name` AS `J0_Name`, T1.* FROM (
///     SELECT T.`CategoryId` AS `T_CategoryId`, COUNT(0) AS `T_COUNT`
///     FROM `product` T GROUP BY T.`CategoryId`
/// ) T1 INNER JOIN `category` J0 ON T1.`T_CategoryId` = J0.`Id`
/// ```
fn grouped<'a>(
    cx: &mut Compiler<'a>,
    resolver: &mut Resolver<'a>,
    query: &Query,
    grouping: &Grouping,
    display: &[ColumnId],
    sorted: &[ColumnId],
) -> Result<(Select, Select)> {
    let keys = resolver.resolve_all(grouping.members.iter().map(String::as_str))?;
    let filtered = resolve_filter(resolver, &query.filter)?;
    let having = resolve_filter(resolver, &grouping.having)?;

    // Aggregates sorted on but not displayed are still computed inside, so
    // the outer query can order by their result alias.
    let mut inner_items = keys.clone();
    for id in display.iter().chain(sorted) {
        if resolver.column(*id).is_aggregate() && !inner_items.contains(id) {
            inner_items.push(*id);
        }
    }

    if !inner_items.iter().any(|id| resolver.column(*id).count) {
        inner_items.push(resolver.resolve(stmt::COUNT_MARKER)?);
    }

    let outer_items: Vec<_> = display
        .iter()
        .copied()
        .filter(|id| !inner_items.contains(id))
        .collect();
    let outer_sorted: Vec<_> = sorted
        .iter()
        .copied()
        .filter(|id| !inner_items.contains(id))
        .collect();

    for id in outer_items.iter().chain(&outer_sorted) {
        check_grouped_join(resolver, &keys, *id)?;
    }

    resolver.graph_mut().assign_aliases(&mut cx.counter);

    let inner_scopes = scopes(resolver, inner_items.iter().chain(&filtered).chain(&having));
    let outer_scopes = scopes(resolver, outer_items.iter().chain(&outer_sorted));

    let graph = resolver.graph();
    let inner_required = graph.required(inner_scopes.iter().copied());
    let outer_required = graph.required(outer_scopes.iter().copied());
    let required = graph.required(inner_scopes.into_iter().chain(outer_scopes));

    consistency::apply(resolver.graph_mut(), &required);

    let mut inner = Select::new(root_source(resolver));
    inner.items = inner_items
        .iter()
        .map(|id| resolver.to_select_item(*id))
        .collect();
    inner.joins = render_joins(resolver.graph(), &inner_required);
    inner.filter = filter::compile(cx, resolver, &query.filter)?;

    let (group_by, having) = filter::compile_grouping(cx, resolver, grouping)?;
    inner.group_by = group_by;
    inner.having = having;

    let derived = cx.counter.next_table();
    resolver
        .graph_mut()
        .reparent_for_grouping(&outer_required, &derived);

    let mut outer = Select::new(Source::derived(inner.clone(), &derived));
    outer.items = outer_items
        .iter()
        .map(|id| resolver.to_select_item(*id))
        .chain([SelectItem::Wildcard(derived.clone())])
        .collect();
    outer.joins = render_joins(resolver.graph(), &outer_required);

    for sort in &query.sorting {
        for member in &sort.members {
            let id = resolver.resolve(member)?;

            let expr = if inner_items.contains(&id) {
                Expr::column(&derived, resolver.result_alias(id))
            } else {
                resolver.to_column(id)
            };

            outer.order_by.push(OrderBy {
                expr,
                direction: sort.direction,
            });
        }
    }

    let mut count = Select::new(Source::derived(inner, derived));
    count.items = vec![Expr::CountAll.into()];

    Ok((outer, count))
}

/// A column shown next to grouped results must be reached through a join
/// whose keys on the root are all grouped, so the join can read them from
/// the derived table.
fn check_grouped_join(resolver: &Resolver<'_>, keys: &[ColumnId], id: ColumnId) -> Result<()> {
    let column = resolver.column(id);
    let graph = resolver.graph();
    let root = resolver.root();

    let Some(first) = graph.path_to(column.scope).first().copied() else {
        return Err(Error::unresolved_member(
            &root.name,
            &column.path,
            "neither grouped nor aggregated",
        ));
    };

    for pair in &graph.join(first).navigation.keys {
        let source = column_name(root, &pair.source);

        let grouped = keys.iter().any(|key| {
            let key = resolver.column(*key);
            key.scope == AliasGraph::ROOT
                && !key.is_aggregate()
                && key.column.eq_ignore_ascii_case(&source)
        });

        if !grouped {
            return Err(Error::unresolved_member(
                &root.name,
                &column.path,
                format!("neither grouped nor aggregated, and join key `{}` is not grouped", pair.source),
            ));
        }
    }

    Ok(())
}

/// `SELECT COUNT(...)` over the rows matching `filter`. Several included
/// members are counted as one concatenated value.
pub(crate) fn count(
    schema: &Schema,
    entity: &str,
    filter: &Filter,
    includes: &[&str],
) -> Result<(Select, Vec<Value>)> {
    let entity = schema.resolve_entity(entity)?;

    let mut cx = Compiler::new(schema);
    let mut resolver = Resolver::new(schema, entity.id);

    let included = resolver.resolve_all(includes.iter().copied())?;
    let mut select = cx.filtered_select(&mut resolver, filter, &included)?;

    let mut columns: Vec<_> = included.iter().map(|id| resolver.to_column(*id)).collect();

    let counted = match columns.len() {
        0 => Expr::CountAll,
        1 => Expr::func("COUNT", vec![columns.remove(0)]),
        _ => Expr::func("COUNT", vec![Expr::func("CONCAT", columns)]),
    };

    select.items = vec![counted.into()];
    Ok((select, cx.into_params()))
}

/// `SELECT 0 ... LIMIT 1`; a returned row means a match exists.
pub(crate) fn exists(
    schema: &Schema,
    entity: &str,
    filter: &Filter,
) -> Result<(Select, Vec<Value>)> {
    let entity = schema.resolve_entity(entity)?;

    let mut cx = Compiler::new(schema);
    let mut resolver = Resolver::new(schema, entity.id);

    let mut select = cx.filtered_select(&mut resolver, filter, &[])?;
    select.items = vec![Expr::Literal(0).into()];
    select.limit = Some(Limit {
        offset: 0,
        count: 1,
    });

    Ok((select, cx.into_params()))
}

/// Renders `required` as joins. A join whose parent was wrapped in a
/// derived table reads the parent's key through the derived table's result
/// alias.
fn render_joins(graph: &AliasGraph<'_>, required: &[JoinId]) -> Vec<Join> {
    required
        .iter()
        .map(|id| {
            let join = graph.join(*id);
            let parent_alias = graph.alias(join.parent);
            let target_alias = graph.alias(join.target);

            let source = graph.entity(join.parent);
            let target = graph.entity(join.target);

            let mut on: Vec<_> = join
                .navigation
                .keys
                .iter()
                .map(|pair| {
                    let source_column = column_name(source, &pair.source);

                    let lhs = match &join.host {
                        Some(host) => Expr::column(host, format!("{parent_alias}_{source_column}")),
                        None => Expr::column(parent_alias, source_column),
                    };

                    Expr::eq(lhs, Expr::column(target_alias, column_name(target, &pair.target)))
                })
                .collect();

            on.extend(join.extra_on.iter().cloned());

            Join {
                kind: join.kind(),
                source: Source::table(table_name(target), target_alias),
                on: Expr::and_from_vec(on).unwrap_or_else(Expr::always_false),
            }
        })
        .collect()
}

fn root_source(resolver: &Resolver<'_>) -> Source {
    Source::table(
        table_name(resolver.root()),
        resolver.graph().alias(AliasGraph::ROOT),
    )
}

fn resolve_filter(resolver: &mut Resolver<'_>, filter: &Filter) -> Result<Vec<ColumnId>> {
    filter
        .conditions()
        .into_iter()
        .map(|condition| resolver.resolve(&condition.member))
        .collect()
}

fn sort_members(sorting: &[Sorting]) -> impl Iterator<Item = &str> {
    sorting
        .iter()
        .flat_map(|sort| sort.members.iter().map(String::as_str))
}

fn scopes<'r>(
    resolver: &Resolver<'_>,
    ids: impl IntoIterator<Item = &'r ColumnId>,
) -> Vec<ScopeId> {
    ids.into_iter().map(|id| resolver.column(*id).scope).collect()
}

fn limit(paging: &Paging) -> Option<Limit> {
    (paging.size > 0).then(|| Limit {
        offset: paging.offset(),
        count: paging.size,
    })
}
