//! Transactional executor.
//!
//! A batch runs inside exactly one transaction: every statement is applied in
//! order and committed together, or the first failure rolls the whole batch
//! back and is returned to the caller unchanged.

use crate::change::PendingChange;
use crate::compile::try_compile;
use crate::statement::CompiledStatement;
use rowedit_core::{Connection, Result, TransactionOps};

/// Summary of a committed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Number of statements executed.
    pub statements: usize,
    /// Sum of rows affected as reported by the driver.
    pub rows_affected: u64,
}

/// Run `statements` in order inside a single transaction.
///
/// On the first failing statement the transaction is rolled back and that
/// statement's error is returned as-is. A failed rollback is logged and does
/// not replace the original error. An empty list still opens and commits a
/// transaction.
#[tracing::instrument(level = "debug", skip_all, fields(statements = statements.len()))]
pub fn execute<C: Connection>(conn: &C, statements: &[CompiledStatement]) -> Result<ApplyReport> {
    tracing::info!(count = statements.len(), "Applying statement batch");

    let tx = conn.begin()?;
    let mut rows_affected = 0u64;

    for (index, stmt) in statements.iter().enumerate() {
        tracing::trace!(index, sql = stmt.sql(), args = stmt.args().len(), "Executing");

        match tx.execute(stmt.sql(), stmt.args()) {
            Ok(rows) => rows_affected += rows,
            Err(err) => {
                tracing::debug!(index, error = %err, "Statement failed, rolling back batch");
                if let Err(rollback_err) = tx.rollback() {
                    tracing::warn!(
                        error = %rollback_err,
                        "Rollback after failed statement also failed"
                    );
                }
                return Err(err);
            }
        }
    }

    tx.commit()?;

    tracing::debug!(rows_affected, "Batch committed");
    Ok(ApplyReport {
        statements: statements.len(),
        rows_affected,
    })
}

/// Compile `batch` and [`execute`] it.
///
/// A malformed change is reported as [`rowedit_core::Error::Validation`]
/// before any transaction is opened.
pub fn apply<C: Connection>(conn: &C, batch: &[PendingChange]) -> Result<ApplyReport> {
    let statements = try_compile(batch)?;
    execute(conn, &statements)
}
