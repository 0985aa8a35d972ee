use super::{Comma, Formatter, Ident, ToSql};

use crate::stmt::{self, Direction, JoinKind};

impl ToSql for &stmt::Statement {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            stmt::Statement::Delete(stmt) => stmt.to_sql(f),
            stmt::Statement::Insert(stmt) => stmt.to_sql(f),
            stmt::Statement::Select(stmt) => stmt.to_sql(f),
            stmt::Statement::Update(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::Select {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, "SELECT " Comma(&self.items) " FROM " self.source);

        for join in &self.joins {
            fmt!(f, " " join);
        }

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE " filter);
        }

        if !self.group_by.is_empty() {
            fmt!(f, " GROUP BY " Comma(&self.group_by));
        }

        if let Some(having) = &self.having {
            fmt!(f, " HAVING " having);
        }

        if !self.order_by.is_empty() {
            fmt!(f, " ORDER BY " Comma(&self.order_by));
        }

        if let Some(limit) = &self.limit {
            fmt!(f, " " limit);
        }
    }
}

impl ToSql for &stmt::SelectItem {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            stmt::SelectItem::Expr { expr, alias } => {
                fmt!(f, expr);
                if let Some(alias) = alias {
                    fmt!(f, " AS " Ident(alias));
                }
            }
            stmt::SelectItem::Wildcard(table) => fmt!(f, table ".*"),
        }
    }
}

impl ToSql for &stmt::Source {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            stmt::Source::Table { name, alias } => {
                fmt!(f, name);
                if let Some(alias) = alias {
                    fmt!(f, " " alias);
                }
            }
            stmt::Source::Derived { select, alias } => {
                fmt!(f, "(" select ") " alias);
            }
        }
    }
}

impl ToSql for &stmt::TableName {
    fn to_sql(self, f: &mut Formatter<'_>) {
        if let Some(schema) = &self.schema {
            fmt!(f, Ident(schema) ".");
        }
        fmt!(f, Ident(&self.name));
    }
}

impl ToSql for &stmt::Join {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let kind = match self.kind {
            JoinKind::Inner => "INNER JOIN ",
            JoinKind::Left => "LEFT JOIN ",
        };
        fmt!(f, kind self.source " ON " self.on);
    }
}

impl ToSql for &stmt::OrderBy {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let direction = match self.direction {
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        };
        fmt!(f, self.expr direction);
    }
}

impl ToSql for &stmt::Limit {
    fn to_sql(self, f: &mut Formatter<'_>) {
        if f.serializer.is_mysql() {
            fmt!(f, "LIMIT " self.offset ", " self.count);
        } else {
            fmt!(f, "LIMIT " self.count " OFFSET " self.offset);
        }
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let columns = Comma(self.columns.iter().map(Ident));
        fmt!(f, "INSERT INTO " self.table " (" columns ") VALUES (" Comma(&self.values) ")");
    }
}

impl ToSql for &stmt::Update {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, "UPDATE " self.table " SET " Comma(&self.assignments));

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE " filter);
        }
    }
}

impl ToSql for &stmt::Assignment {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, Ident(&self.column) " = " self.value);
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, "DELETE FROM " self.table);

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE " filter);
        }
    }
}
