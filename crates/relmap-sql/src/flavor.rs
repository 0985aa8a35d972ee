use crate::coerce;

use regex::Regex;
use relmap_core::stmt::Value;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{(\d+)\}").unwrap());

/// SQL dialect. Selects identifier quoting, the paging clause, native
/// placeholder syntax and parameter coercion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    #[default]
    Mysql,
    Postgresql,
    Sqlite,
}

impl Flavor {
    pub fn is_mysql(self) -> bool {
        matches!(self, Flavor::Mysql)
    }

    /// Character used to quote identifiers.
    pub fn quote(self) -> char {
        match self {
            Flavor::Mysql => '`',
            Flavor::Postgresql | Flavor::Sqlite => '"',
        }
    }

    /// Rewrites `{N}` placeholders into the dialect's native form and
    /// coerces the parameters to what the database accepts.
    ///
    /// MySQL placeholders are positional `?`, so the returned parameters
    /// follow the order placeholders appear in the text, repeating a
    /// parameter referenced twice. The other dialects keep the parameter
    /// order and number placeholders from 1.
    pub fn bind(self, sql: &str, params: &[Value]) -> relmap_core::Result<(String, Vec<Value>)> {
        let mut bound = Vec::with_capacity(params.len());
        let mut err = None;

        let text = PLACEHOLDER.replace_all(sql, |caps: &regex::Captures<'_>| {
            let Some(index) = caps[1].parse::<usize>().ok().filter(|i| *i < params.len()) else {
                err.get_or_insert_with(|| {
                    relmap_core::Error::invalid_result(format!(
                        "placeholder {} has no parameter ({} supplied)",
                        &caps[0],
                        params.len()
                    ))
                });
                return String::new();
            };

            match self {
                Flavor::Mysql => {
                    bound.push(coerce(self, params[index].clone()));
                    "?".to_string()
                }
                Flavor::Postgresql => format!("${}", index + 1),
                Flavor::Sqlite => format!("?{}", index + 1),
            }
        });

        if let Some(err) = err {
            return Err(err);
        }

        if !self.is_mysql() {
            bound = params.iter().cloned().map(|v| coerce(self, v)).collect();
        }

        Ok((text.into_owned(), bound))
    }
}
