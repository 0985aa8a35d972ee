use super::{Comma, Delimited, Formatter, Ident, ToSql};

use crate::stmt;

impl ToSql for &stmt::Expr {
    fn to_sql(self, f: &mut Formatter<'_>) {
        use stmt::Expr::*;

        match self {
            And(operands) => {
                fmt!(f, Delimited(operands.iter().map(Nested), " AND "));
            }
            BinaryOp { lhs, op, rhs } => {
                fmt!(f, lhs " " op " " rhs);
            }
            Between { expr, low, high } => {
                fmt!(f, expr " BETWEEN " low " AND " high);
            }
            Column(column) => column.to_sql(f),
            CountAll => fmt!(f, "COUNT(0)"),
            Exists(select) => {
                fmt!(f, "EXISTS (" select ")");
            }
            Func { name, args } => {
                fmt!(f, name "(" Comma(args) ")");
            }
            InList { expr, list, negate } => {
                let op = if *negate { " NOT IN (" } else { " IN (" };
                fmt!(f, expr op Comma(list) ")");
            }
            InSubquery {
                expr,
                query,
                negate,
            } => {
                let op = if *negate { " NOT IN (" } else { " IN (" };
                fmt!(f, expr op query ")");
            }
            IsNull { expr, negate } => {
                if *negate {
                    fmt!(f, expr " IS NOT NULL");
                } else {
                    fmt!(f, expr " IS NULL");
                }
            }
            Literal(value) => value.to_sql(f),
            Null => fmt!(f, "NULL"),
            Or(operands) => {
                fmt!(f, Delimited(operands.iter().map(Nested), " OR "));
            }
            Placeholder(index) => {
                let index = *index;
                fmt!(f, "{" index "}");
            }
        }
    }
}

/// An operand of `AND`/`OR`; nested junctions get parentheses.
struct Nested<'a>(&'a stmt::Expr);

impl ToSql for Nested<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let expr = self.0;

        if expr.is_junction() {
            fmt!(f, "(" expr ")");
        } else {
            expr.to_sql(f);
        }
    }
}

impl ToSql for &stmt::ExprColumn {
    fn to_sql(self, f: &mut Formatter<'_>) {
        if let Some(table) = &self.table {
            fmt!(f, table ".");
        }
        fmt!(f, Ident(&self.name));
    }
}

impl ToSql for &stmt::BinaryOp {
    fn to_sql(self, f: &mut Formatter<'_>) {
        f.dst.push_str(match self {
            stmt::BinaryOp::Eq => "=",
            stmt::BinaryOp::Ne => "!=",
            stmt::BinaryOp::Gt => ">",
            stmt::BinaryOp::Ge => ">=",
            stmt::BinaryOp::Lt => "<",
            stmt::BinaryOp::Le => "<=",
            stmt::BinaryOp::Like => "LIKE",
            stmt::BinaryOp::Add => "+",
            stmt::BinaryOp::Sub => "-",
            stmt::BinaryOp::Mul => "*",
            stmt::BinaryOp::Div => "/",
        })
    }
}
