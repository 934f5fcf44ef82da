use crate::{Result, Statement, Value, stream::Stream};
use std::{future::Future, sync::Arc};

/// Shared reference-counted column label list.
pub type RowNames = Arc<[String]>;
/// Owned row value slice matching `RowNames` length.
pub type Row = Box<[Value]>;

/// A result row with its corresponding column labels. Labels carry the
/// logical field names (the `AS` aliases of the select list), so entities
/// decode by field name regardless of column overrides.
#[derive(Debug, Clone)]
pub struct RowLabeled {
    pub labels: RowNames,
    pub values: Row,
}

impl RowLabeled {
    pub fn new(labels: RowNames, values: Row) -> Self {
        Self { labels, values }
    }

    pub fn names(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v == name)
            .map(|i| &self.values[i])
    }
}

/// Outcome of a modify statement (INSERT/UPDATE/DELETE).
#[derive(Default, Debug, Clone, Copy)]
pub struct RowsAffected {
    /// Total number of rows impacted.
    pub rows_affected: u64,
    /// First generated key of the statement, when the backend reports one.
    pub last_insert_id: Option<i64>,
}

/// One live database connection, owned by exactly one session at a time.
///
/// Every method completes asynchronously and never blocks; failures surface
/// as [`Error::Execution`](crate::Error::Execution) from the driver.
pub trait Connection: Send {
    /// Run a row-returning statement.
    fn query(&mut self, statement: Statement) -> impl Stream<Item = Result<RowLabeled>> + Send;

    /// Run a modify statement.
    fn execute(&mut self, statement: Statement)
    -> impl Future<Output = Result<RowsAffected>> + Send;

    fn set_auto_commit(&mut self, auto_commit: bool)
    -> impl Future<Output = Result<()>> + Send;

    fn commit(&mut self) -> impl Future<Output = Result<()>> + Send;

    fn rollback(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Release the connection back to its provider. Called at most once per
    /// acquisition by this crate.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;
}

/// External source of connections. Pooling, URLs and credentials live behind
/// this seam; the data layer only pairs one `acquire` with one `close`.
pub trait ConnectionProvider: Send + Sync {
    type Conn: Connection;

    fn acquire(&self) -> impl Future<Output = Result<Self::Conn>> + Send;
}
