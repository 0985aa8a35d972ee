use super::{assemble::Compiler, resolve::Resolver};

use relmap_core::{
    stmt::{Combinator, Condition, Filter, Grouping, Op, Operand, Sorting},
    Error, Result,
};
use relmap_sql::stmt::{BinaryOp, Expr, OrderBy};

/// Lowers a filter tree into a boolean expression, pushing one parameter per
/// placeholder in left-to-right order. Returns `None` when nothing in the
/// tree restricts the result.
pub(crate) fn compile<'a>(
    cx: &mut Compiler<'a>,
    resolver: &mut Resolver<'a>,
    filter: &Filter,
) -> Result<Option<Expr>> {
    match filter {
        Filter::Condition(condition) => compile_condition(cx, resolver, condition),
        Filter::Composite(combinator, children) => {
            let mut operands = vec![];

            for child in children {
                if let Some(expr) = compile(cx, resolver, child)? {
                    operands.push(expr);
                }
            }

            Ok(match combinator {
                Combinator::And => Expr::and_from_vec(operands),
                Combinator::Or => Expr::or_from_vec(operands),
            })
        }
    }
}

fn compile_condition<'a>(
    cx: &mut Compiler<'a>,
    resolver: &mut Resolver<'a>,
    condition: &Condition,
) -> Result<Option<Expr>> {
    let id = resolver.resolve(&condition.member)?;
    let column = resolver.to_column(id);

    let values = condition.operand.values();
    let first = values.first().filter(|value| !value.is_null());

    let expr = match condition.op {
        Op::Equal | Op::Like => match first {
            None => is_null(column, false),
            Some(value) => {
                let op = if value.has_wildcard() {
                    BinaryOp::Like
                } else {
                    BinaryOp::Eq
                };
                Expr::binary_op(column, op, cx.param(value.clone()))
            }
        },
        Op::NotEqual => match first {
            None => is_null(column, true),
            Some(value) => Expr::binary_op(column, BinaryOp::Ne, cx.param(value.clone())),
        },
        Op::GreaterThan | Op::GreaterThanOrEqual | Op::LessThan | Op::LessThanOrEqual => {
            let Some(value) = first else {
                return Err(Error::unsupported_operator(format!(
                    "{:?} on `{}` requires a value",
                    condition.op, condition.member
                )));
            };

            let op = match condition.op {
                Op::GreaterThan => BinaryOp::Gt,
                Op::GreaterThanOrEqual => BinaryOp::Ge,
                Op::LessThan => BinaryOp::Lt,
                _ => BinaryOp::Le,
            };

            Expr::binary_op(column, op, cx.param(value.clone()))
        }
        Op::Between => {
            let [low, high] = values else {
                return Err(Error::unsupported_operator(format!(
                    "Between on `{}` takes exactly two values, got {}",
                    condition.member,
                    values.len()
                )));
            };

            Expr::Between {
                expr: Box::new(column),
                low: Box::new(cx.param(low.clone())),
                high: Box::new(cx.param(high.clone())),
            }
        }
        Op::In | Op::NotIn => {
            let negate = condition.op == Op::NotIn;

            if let Operand::Query(query) = &condition.operand {
                let select = cx.subquery(query)?;

                return Ok(Some(Expr::InSubquery {
                    expr: Box::new(column),
                    query: Box::new(select),
                    negate,
                }));
            }

            match values {
                // Nothing is in the empty set
                [] if negate => return Ok(None),
                [] => Expr::always_false(),
                [value] => {
                    let op = if negate { BinaryOp::Ne } else { BinaryOp::Eq };
                    Expr::binary_op(column, op, cx.param(value.clone()))
                }
                values => Expr::InList {
                    expr: Box::new(column),
                    list: values.iter().map(|value| cx.param(value.clone())).collect(),
                    negate,
                },
            }
        }
    };

    Ok(Some(expr))
}

fn is_null(column: Expr, negate: bool) -> Expr {
    Expr::IsNull {
        expr: Box::new(column),
        negate,
    }
}

/// `GROUP BY` expressions and the compiled `HAVING` filter. Call after the
/// `WHERE` filter so having parameters follow where parameters.
pub(crate) fn compile_grouping<'a>(
    cx: &mut Compiler<'a>,
    resolver: &mut Resolver<'a>,
    grouping: &Grouping,
) -> Result<(Vec<Expr>, Option<Expr>)> {
    let mut group_by = vec![];

    for member in &grouping.members {
        let id = resolver.resolve(member)?;
        group_by.push(resolver.to_column(id));
    }

    let having = compile(cx, resolver, &grouping.having)?;
    Ok((group_by, having))
}

pub(crate) fn compile_sorting(
    resolver: &mut Resolver<'_>,
    sorting: &[Sorting],
) -> Result<Vec<OrderBy>> {
    let mut order_by = vec![];

    for sort in sorting {
        for member in &sort.members {
            let id = resolver.resolve(member)?;
            order_by.push(OrderBy {
                expr: resolver.to_column(id),
                direction: sort.direction,
            });
        }
    }

    Ok(order_by)
}
