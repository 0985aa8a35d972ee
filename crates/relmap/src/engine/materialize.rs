use super::alias::{AliasGraph, ScopeId};

use relmap_core::stmt::{Record, Row};

/// Rebuilds nested records from flat rows. Each scope reads the columns
/// prefixed with its alias; inherited columns merge into the subtype's
/// record and navigations nest. Rows whose root is entirely null are
/// skipped.
pub(crate) fn materialize(graph: &AliasGraph<'_>, rows: &[Row]) -> Vec<Record> {
    rows.iter()
        .map(|row| scope_record(graph, AliasGraph::ROOT, row))
        .filter(|record| !record.is_absent())
        .collect()
}

fn scope_record(graph: &AliasGraph<'_>, scope: ScopeId, row: &Row) -> Record {
    let prefix = format!("{}_", graph.alias(scope));
    let mut record = Record::new(&graph.entity(scope).name);

    for (name, value) in row.iter() {
        if let Some(column) = name.strip_prefix(&prefix) {
            record.values.insert(column.to_string(), value.clone());
        }
    }

    for id in &graph.scope(scope).children {
        let join = graph.join(*id);
        let nested = scope_record(graph, join.target, row);

        if join.navigation.inheritance {
            merge_base(&mut record, nested);
        } else if !nested.is_absent() {
            record
                .navigations
                .insert(join.navigation.name.clone(), nested);
        }
    }

    record
}

/// Moves a base record's columns into its subtype's. A column the subtype
/// already has is kept as `<column>(base)`.
fn merge_base(record: &mut Record, base: Record) {
    for (column, value) in base.values {
        let collides = record
            .values
            .keys()
            .any(|name| name.eq_ignore_ascii_case(&column));

        let key = if collides {
            format!("{column}(base)")
        } else {
            column
        };

        record.values.insert(key, value);
    }

    for (name, nested) in base.navigations {
        record.navigations.entry(name).or_insert(nested);
    }
}
