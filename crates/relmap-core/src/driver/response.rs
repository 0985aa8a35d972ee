use super::RowStream;
use crate::{stmt::Value, Error, Result};

#[derive(Debug)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Operation result, as a stream of rows
    Values(RowStream),

    /// A single value
    Scalar(Value),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn row_stream(rows: impl Into<RowStream>) -> Self {
        Self {
            rows: Rows::Values(rows.into()),
        }
    }

    pub fn scalar(value: impl Into<Value>) -> Self {
        Self {
            rows: Rows::Scalar(value.into()),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Self::Values(_))
    }

    pub fn into_count(self) -> Result<u64> {
        match self {
            Rows::Count(count) => Ok(count),
            _ => Err(Error::invalid_result(format!(
                "expected an affected row count, got {}",
                self.describe()
            ))),
        }
    }

    pub fn into_values(self) -> Result<RowStream> {
        match self {
            Rows::Values(values) => Ok(values),
            _ => Err(Error::invalid_result(format!(
                "expected rows, got {}",
                self.describe()
            ))),
        }
    }

    pub fn into_scalar(self) -> Result<Value> {
        match self {
            Rows::Scalar(value) => Ok(value),
            _ => Err(Error::invalid_result(format!(
                "expected a scalar, got {}",
                self.describe()
            ))),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Rows::Count(_) => "a row count",
            Rows::Values(_) => "rows",
            Rows::Scalar(_) => "a scalar",
        }
    }
}
