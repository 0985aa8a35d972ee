//! Keeps INNER joins nested under a LEFT join from filtering out the rows the
//! LEFT join preserves.
//!
//! Given `A LEFT JOIN B INNER JOIN C`, an `A` row with no matching `B` would
//! be dropped by the inner join to `C`. Instead, `C` is joined LEFT and the
//! requirement that a `B` match has a `C` moves into `B`'s ON clause as
//! `EXISTS (SELECT 0 FROM c CX WHERE ...)`.

use super::{
    alias::{AliasGraph, JoinId},
    column_name, table_name,
};

use relmap_core::schema::JoinKind;
use relmap_sql::stmt::{Expr, Limit, Select, Source};

/// Applies the rewrite to `required`, which must be in depth-first order so
/// that a join is settled before any join below it is looked at. Running the
/// pass twice changes nothing.
pub(crate) fn apply(graph: &mut AliasGraph<'_>, required: &[JoinId]) {
    for &id in required {
        let join = graph.join(id);

        if !join.kind().is_inner() {
            continue;
        }

        let Some(parent) = graph.scope(join.parent).join else {
            continue;
        };

        let under_left = graph
            .path_to(join.parent)
            .into_iter()
            .any(|ancestor| graph.join(ancestor).kind().is_left());

        if !under_left {
            continue;
        }

        let exists = exists_predicate(graph, id);

        let parent = graph.join_mut(parent);
        if !parent.extra_on.contains(&exists) {
            parent.extra_on.push(exists);
        }

        graph.join_mut(id).kind = Some(JoinKind::Left);
    }
}

/// `EXISTS (SELECT 0 FROM <target> <alias>X WHERE <keys> LIMIT 1)`,
/// correlated to the join's parent scope.
fn exists_predicate(graph: &AliasGraph<'_>, id: JoinId) -> Expr {
    let join = graph.join(id);
    let alias = format!("{}X", graph.alias(join.target));
    let parent_alias = graph.alias(join.parent);

    let source = graph.entity(join.parent);
    let target = graph.entity(join.target);

    let correlation = join
        .navigation
        .keys
        .iter()
        .map(|pair| {
            Expr::eq(
                Expr::column(&alias, column_name(target, &pair.target)),
                Expr::column(parent_alias, column_name(source, &pair.source)),
            )
        })
        .collect();

    let mut select = Select::new(Source::table(table_name(target), &alias));
    select.items = vec![Expr::Literal(0).into()];
    select.filter = Expr::and_from_vec(correlation);
    select.limit = Some(Limit {
        offset: 0,
        count: 1,
    });

    Expr::Exists(Box::new(select))
}
