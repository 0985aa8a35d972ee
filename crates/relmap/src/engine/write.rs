use super::{alias::AliasGraph, assemble::Compiler, filter, resolve::Resolver, table_name};

use indexmap::IndexMap;
use relmap_core::{
    bail,
    schema::{Entity, Schema},
    stmt::{ArithOp, Filter, Value, Write},
    Error, Result,
};
use relmap_sql::{
    stmt::{Assignment, BinaryOp, Delete, Expr, Insert, Update},
    Statement,
};

/// A compiled INSERT, UPDATE or DELETE.
#[derive(Debug)]
pub(crate) struct WritePlan {
    pub(crate) statement: Statement,
    pub(crate) params: Vec<Value>,
}

/// `INSERT INTO t (cols) VALUES ({0}, ...)` for the row's non-null members,
/// restricted to `includes` unless it is empty.
pub(crate) fn insert(
    entity: &Entity,
    row: &IndexMap<String, Value>,
    includes: &[&str],
) -> Result<WritePlan> {
    let mut insert = Insert {
        table: table_name(entity),
        columns: vec![],
        values: vec![],
    };
    let mut params = vec![];

    for (member, value) in row {
        if value.is_null() {
            continue;
        }

        if !includes.is_empty()
            && !includes
                .iter()
                .any(|include| include.eq_ignore_ascii_case(member))
        {
            continue;
        }

        let Some(property) = entity.property(member) else {
            return Err(Error::unresolved_member(
                &entity.name,
                member,
                format!("not a column of `{}`", entity.table),
            ));
        };

        if property.ignored {
            continue;
        }

        insert.columns.push(property.column.clone());
        insert.values.push(Expr::Placeholder(params.len()));
        params.push(value.clone());
    }

    if insert.columns.is_empty() {
        bail!("nothing to insert into `{}`", entity.name);
    }

    Ok(WritePlan {
        statement: insert.into(),
        params,
    })
}

/// `UPDATE t SET ... WHERE ...` for one row. Without a filter the row is
/// matched by its key members, which are then not assigned. Returns `None`
/// when the row assigns nothing.
pub(crate) fn update(
    schema: &Schema,
    entity: &Entity,
    row: &IndexMap<String, Write>,
    filter: &Filter,
    members: &[&str],
) -> Result<Option<WritePlan>> {
    let mut cx = Compiler::new(schema);

    let mut update = Update {
        table: table_name(entity),
        assignments: vec![],
        filter: None,
    };

    let by_key = filter.is_empty();

    if by_key {
        let mut keys = vec![];

        for key in entity.keys() {
            let value = match lookup(row, &key.name) {
                Some(Write::Set(value)) if !value.is_null() => value.clone(),
                _ => bail!("row has no value for key `{}` of `{}`", key.name, entity.name),
            };

            keys.push(Expr::eq(Expr::column("", &key.column), cx.param(value)));
        }

        update.filter = Expr::and_from_vec(keys);

        if update.filter.is_none() {
            bail!("`{}` has no key to match rows by", entity.name);
        }
    } else {
        update.filter = dml_filter(&mut cx, entity, filter)?;
    }

    for member in members {
        let Some(write) = lookup(row, member) else {
            continue;
        };

        let Some(property) = entity.property(member) else {
            return Err(Error::unresolved_member(
                &entity.name,
                *member,
                format!("not a column of `{}`", entity.table),
            ));
        };

        if property.ignored || (by_key && property.key) {
            continue;
        }

        let value = match write {
            Write::Set(Value::Null) => Expr::Null,
            Write::Set(value) => cx.param(value.clone()),
            Write::Expr { member, op, value } => {
                let column = entity
                    .property(member)
                    .map(|property| property.column.as_str())
                    .unwrap_or(member);

                Expr::binary_op(
                    Expr::column("", column),
                    arith_op(*op),
                    cx.param(value.clone()),
                )
            }
        };

        update.assignments.push(Assignment {
            column: property.column.clone(),
            value,
        });
    }

    if update.assignments.is_empty() {
        return Ok(None);
    }

    Ok(Some(WritePlan {
        statement: update.into(),
        params: cx.into_params(),
    }))
}

/// `DELETE FROM t WHERE ...`. An empty filter deletes every row.
pub(crate) fn delete(schema: &Schema, entity: &Entity, filter: &Filter) -> Result<WritePlan> {
    let mut cx = Compiler::new(schema);

    let delete = Delete {
        table: table_name(entity),
        filter: dml_filter(&mut cx, entity, filter)?,
    };

    Ok(WritePlan {
        statement: delete.into(),
        params: cx.into_params(),
    })
}

/// Compiles a filter over the single, unaliased table a write targets.
fn dml_filter(
    cx: &mut Compiler<'_>,
    entity: &Entity,
    filter: &Filter,
) -> Result<Option<Expr>> {
    let mut resolver = Resolver::new(cx.schema(), entity.id);
    resolver.graph_mut().assign_unaliased();

    for condition in filter.conditions() {
        let id = resolver.resolve(&condition.member)?;

        if resolver.column(id).scope != AliasGraph::ROOT {
            return Err(Error::unsupported_feature(format!(
                "filter member `{}` reaches beyond table `{}`",
                condition.member, entity.table
            )));
        }
    }

    filter::compile(cx, &mut resolver, filter)
}

fn lookup<'r>(row: &'r IndexMap<String, Write>, member: &str) -> Option<&'r Write> {
    row.get(member).or_else(|| {
        row.iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(member))
            .map(|(_, write)| write)
    })
}

fn arith_op(op: ArithOp) -> BinaryOp {
    match op {
        ArithOp::Add => BinaryOp::Add,
        ArithOp::Sub => BinaryOp::Sub,
        ArithOp::Mul => BinaryOp::Mul,
        ArithOp::Div => BinaryOp::Div,
    }
}
