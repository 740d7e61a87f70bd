//! Database connection traits.
//!
//! - [`Connection`] - executes statements and opens transactions
//! - [`TransactionOps`] - statements inside an open transaction, finished by
//!   `commit` or `rollback`
//! - [`IsolationLevel`] - requested isolation, mapped by each driver onto what
//!   its engine offers
//!
//! Calls are synchronous and block the calling thread for one round trip.

use crate::error::Result;
use crate::row::Row;
use crate::value::Value;

/// Transaction isolation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsolationLevel {
    /// Read uncommitted: dirty reads possible.
    ReadUncommitted,

    /// Read committed: only committed changes from others are visible.
    #[default]
    ReadCommitted,

    /// Repeatable read: a consistent snapshot for the whole transaction.
    RepeatableRead,

    /// Serializable: transactions appear to execute one after another.
    Serializable,
}

/// A database connection capable of executing statements.
///
/// Parameters are positional and bound to `?` placeholders in order.
///
/// # Transaction Support
///
/// [`begin`](Connection::begin) returns a transaction guard borrowing the
/// connection. The guard must be finished with
/// [`commit`](TransactionOps::commit) or [`rollback`](TransactionOps::rollback);
/// dropping it unfinished rolls back.
///
/// ```rust,ignore
/// let tx = conn.begin()?;
/// tx.execute("INSERT INTO logs (msg) VALUES (?)", &[Value::Text("action".into())])?;
/// tx.commit()?;
/// ```
pub trait Connection {
    /// The transaction type returned by this connection.
    type Tx<'conn>: TransactionOps
    where
        Self: 'conn;

    /// Execute a query and return all rows.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>>;

    /// Execute a statement (INSERT, UPDATE, DELETE) and return rows affected.
    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64>;

    /// Begin a transaction with the default isolation level.
    fn begin(&self) -> Result<Self::Tx<'_>> {
        self.begin_with(IsolationLevel::default())
    }

    /// Begin a transaction with a specific isolation level.
    fn begin_with(&self, isolation: IsolationLevel) -> Result<Self::Tx<'_>>;
}

/// Operations available inside an open transaction.
pub trait TransactionOps {
    /// Execute a query within this transaction.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>>;

    /// Execute a statement within this transaction and return rows affected.
    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64>;

    /// Commit the transaction.
    fn commit(self) -> Result<()>;

    /// Roll back the transaction.
    fn rollback(self) -> Result<()>;
}
