//! SQLite connection implementation.
//!
//! Safe wrappers around SQLite's C API implementing the `Connection` and
//! `TransactionOps` traits from rowedit-core.

// FFI code needs casts that match C types exactly
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::borrow_as_ptr)]
#![allow(clippy::if_not_else)]

use crate::ffi;
use crate::types;
use rowedit_core::{
    Connection, Error, IsolationLevel, Row, TransactionOps, Value,
    error::{
        ConnectionError, ConnectionErrorKind, QueryError, QueryErrorKind, TransactionError,
        TransactionErrorKind,
    },
    row::ColumnInfo,
};
use std::ffi::{CStr, CString, c_int};
use std::ptr;
use std::sync::{Arc, Mutex, MutexGuard};

/// Configuration for opening SQLite connections.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path to the database file, or ":memory:" for an in-memory database.
    pub path: String,
    /// Open flags (read-only, read-write, create, etc.)
    pub flags: OpenFlags,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: u32,
}

/// Flags controlling how the database is opened.
#[derive(Debug, Clone, Copy, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct OpenFlags {
    /// Open for reading only.
    pub read_only: bool,
    /// Open for reading and writing.
    pub read_write: bool,
    /// Create the database if it doesn't exist.
    pub create: bool,
    /// Enable URI filename interpretation.
    pub uri: bool,
}

impl OpenFlags {
    /// Create flags for read-only access.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Default::default()
        }
    }

    /// Create flags for read-write access (database must exist).
    pub fn read_write() -> Self {
        Self {
            read_write: true,
            ..Default::default()
        }
    }

    /// Create flags for read-write access with creation if needed.
    pub fn create_read_write() -> Self {
        Self {
            read_write: true,
            create: true,
            ..Default::default()
        }
    }

    fn to_sqlite_flags(self) -> c_int {
        let mut flags = 0;

        if self.read_only {
            flags |= ffi::SQLITE_OPEN_READONLY;
        }
        if self.read_write {
            flags |= ffi::SQLITE_OPEN_READWRITE;
        }
        if self.create {
            flags |= ffi::SQLITE_OPEN_CREATE;
        }
        if self.uri {
            flags |= ffi::SQLITE_OPEN_URI;
        }

        // Default to read-write if no mode specified
        if flags & (ffi::SQLITE_OPEN_READONLY | ffi::SQLITE_OPEN_READWRITE) == 0 {
            flags |= ffi::SQLITE_OPEN_READWRITE | ffi::SQLITE_OPEN_CREATE;
        }

        flags
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: ":memory:".to_string(),
            flags: OpenFlags::create_read_write(),
            busy_timeout_ms: 5000,
        }
    }
}

impl SqliteConfig {
    /// Create a new config for a file-based database.
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Create a new config for an in-memory database.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Set open flags.
    pub fn flags(mut self, flags: OpenFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set busy timeout.
    pub fn busy_timeout(mut self, ms: u32) -> Self {
        self.busy_timeout_ms = ms;
        self
    }
}

struct SqliteInner {
    db: *mut ffi::sqlite3,
    in_transaction: bool,
}

// SAFETY: the handle is only touched while holding the Mutex.
unsafe impl Send for SqliteInner {}

/// A connection to a SQLite database.
///
/// The raw handle lives behind a mutex; every call holds it for the duration
/// of one statement.
pub struct SqliteConnection {
    inner: Mutex<SqliteInner>,
    path: String,
}

// SAFETY: all access to the handle goes through the Mutex
unsafe impl Send for SqliteConnection {}
unsafe impl Sync for SqliteConnection {}

impl SqliteConnection {
    /// Open a new SQLite connection with the given configuration.
    pub fn open(config: &SqliteConfig) -> Result<Self, Error> {
        let c_path = CString::new(config.path.as_str()).map_err(|_| {
            Error::Connection(ConnectionError {
                kind: ConnectionErrorKind::Connect,
                message: "Invalid path: contains null byte".to_string(),
                source: None,
            })
        })?;

        let mut db: *mut ffi::sqlite3 = ptr::null_mut();
        let flags = config.flags.to_sqlite_flags();

        // SAFETY: We pass valid pointers and check the return value
        let rc = unsafe { ffi::sqlite3_open_v2(c_path.as_ptr(), &mut db, flags, ptr::null()) };

        if rc != ffi::SQLITE_OK {
            let msg = if !db.is_null() {
                // SAFETY: db is a valid (failed) handle that must still be closed
                unsafe {
                    let msg = ffi::last_error_message(db);
                    ffi::sqlite3_close(db);
                    msg
                }
            } else {
                ffi::error_string(rc).to_string()
            };

            return Err(Error::Connection(ConnectionError {
                kind: ConnectionErrorKind::Connect,
                message: format!("Failed to open database: {}", msg),
                source: None,
            }));
        }

        if config.busy_timeout_ms > 0 {
            // SAFETY: db is valid
            unsafe {
                ffi::sqlite3_busy_timeout(
                    db,
                    c_int::try_from(config.busy_timeout_ms).unwrap_or(c_int::MAX),
                );
            }
        }

        tracing::debug!(path = %config.path, "Opened SQLite database");

        Ok(Self {
            inner: Mutex::new(SqliteInner {
                db,
                in_transaction: false,
            }),
            path: config.path.clone(),
        })
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, Error> {
        Self::open(&SqliteConfig::memory())
    }

    /// Open a file-based database.
    pub fn open_file(path: impl Into<String>) -> Result<Self, Error> {
        Self::open(&SqliteConfig::file(path))
    }

    /// Get the database path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether a transaction opened through this connection is active.
    pub fn in_transaction(&self) -> bool {
        self.lock().map(|inner| inner.in_transaction).unwrap_or(false)
    }

    fn lock(&self) -> Result<MutexGuard<'_, SqliteInner>, Error> {
        self.inner.lock().map_err(|_| {
            Error::Connection(ConnectionError {
                kind: ConnectionErrorKind::Disconnected,
                message: "SQLite handle mutex poisoned".to_string(),
                source: None,
            })
        })
    }

    /// Execute SQL directly without preparing (for DDL, etc.)
    pub fn execute_raw(&self, sql: &str) -> Result<(), Error> {
        let inner = self.lock()?;
        exec_raw(inner.db, sql)
    }

    /// Get the last insert rowid.
    pub fn last_insert_rowid(&self) -> Result<i64, Error> {
        let inner = self.lock()?;
        // SAFETY: db is valid
        Ok(unsafe { ffi::sqlite3_last_insert_rowid(inner.db) })
    }

    /// Get the number of rows changed by the last statement.
    pub fn changes(&self) -> Result<u64, Error> {
        let inner = self.lock()?;
        // SAFETY: db is valid
        Ok(unsafe { ffi::sqlite3_changes(inner.db) } as u64)
    }

    /// Names of the primary key columns of `table`, in key order.
    ///
    /// Returns an empty list for tables without a declared primary key
    /// (rowid tables) and for tables that do not exist.
    pub fn primary_key_columns(&self, table: &str) -> Result<Vec<String>, Error> {
        let rows = self.query_sync(
            "SELECT name FROM pragma_table_info(?) WHERE pk > 0 ORDER BY pk",
            &[Value::Text(table.to_string())],
        )?;
        rows.iter().map(|row| row.get_as::<String>(0)).collect()
    }

    /// Prepare and execute a query, returning all rows.
    fn query_sync(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, Error> {
        let inner = self.lock()?;
        let stmt = prepare_stmt(inner.db, sql)?;

        if let Err(e) = bind_params(inner.db, stmt, sql, params) {
            // SAFETY: stmt is valid
            unsafe { ffi::sqlite3_finalize(stmt) };
            return Err(e);
        }

        // SAFETY: stmt is valid
        let col_count = unsafe { ffi::sqlite3_column_count(stmt) };
        let mut col_names = Vec::with_capacity(col_count as usize);
        for i in 0..col_count {
            // SAFETY: stmt is valid, i is in range
            let name =
                unsafe { types::column_name(stmt, i) }.unwrap_or_else(|| format!("col{}", i));
            col_names.push(name);
        }
        let columns = Arc::new(ColumnInfo::new(col_names));

        let mut rows = Vec::new();
        loop {
            // SAFETY: stmt is valid
            let rc = unsafe { ffi::sqlite3_step(stmt) };
            match rc {
                ffi::SQLITE_ROW => {
                    let mut values = Vec::with_capacity(col_count as usize);
                    for i in 0..col_count {
                        // SAFETY: stmt is valid, we just got SQLITE_ROW
                        values.push(unsafe { types::read_column(stmt, i) });
                    }
                    rows.push(Row::with_columns(Arc::clone(&columns), values));
                }
                ffi::SQLITE_DONE => break,
                _ => {
                    let err = step_error(inner.db, sql);
                    // SAFETY: stmt is valid
                    unsafe { ffi::sqlite3_finalize(stmt) };
                    return Err(err);
                }
            }
        }

        // SAFETY: stmt is valid
        unsafe { ffi::sqlite3_finalize(stmt) };

        tracing::trace!(sql = %sql, rows = rows.len(), "Query complete");
        Ok(rows)
    }

    /// Prepare and execute a statement, returning rows affected.
    fn execute_sync(&self, sql: &str, params: &[Value]) -> Result<u64, Error> {
        let inner = self.lock()?;
        let stmt = prepare_stmt(inner.db, sql)?;

        if let Err(e) = bind_params(inner.db, stmt, sql, params) {
            // SAFETY: stmt is valid
            unsafe { ffi::sqlite3_finalize(stmt) };
            return Err(e);
        }

        // SAFETY: stmt is valid
        let rc = unsafe { ffi::sqlite3_step(stmt) };

        // The error message must be read before finalize resets it.
        let result = match rc {
            ffi::SQLITE_DONE | ffi::SQLITE_ROW => {
                // SAFETY: db is valid
                let changes = unsafe { ffi::sqlite3_changes(inner.db) };
                Ok(changes as u64)
            }
            _ => Err(step_error(inner.db, sql)),
        };

        // SAFETY: stmt is valid
        unsafe { ffi::sqlite3_finalize(stmt) };

        if let Ok(changes) = &result {
            tracing::trace!(sql = %sql, rows_affected = changes, "Statement executed");
        }
        result
    }

    fn begin_sync(&self, isolation: IsolationLevel) -> Result<(), Error> {
        let mut inner = self.lock()?;
        if inner.in_transaction {
            return Err(Error::Transaction(TransactionError {
                kind: TransactionErrorKind::AlreadyActive,
                message: "Already in a transaction".to_string(),
            }));
        }

        // SQLite has no isolation levels; approximate with lock acquisition modes
        let begin_sql = match isolation {
            IsolationLevel::Serializable => "BEGIN EXCLUSIVE",
            IsolationLevel::RepeatableRead | IsolationLevel::ReadCommitted => "BEGIN IMMEDIATE",
            IsolationLevel::ReadUncommitted => "BEGIN DEFERRED",
        };

        exec_raw(inner.db, begin_sql)?;
        inner.in_transaction = true;
        tracing::debug!(statement = begin_sql, "Transaction: BEGIN");
        Ok(())
    }

    fn finish_sync(&self, statement: &'static str) -> Result<(), Error> {
        let mut inner = self.lock()?;
        if !inner.in_transaction {
            return Err(Error::Transaction(TransactionError {
                kind: TransactionErrorKind::NotActive,
                message: "Not in a transaction".to_string(),
            }));
        }

        let result = exec_raw(inner.db, statement);
        // SAFETY: db is valid. A failed COMMIT may leave the transaction open
        // (e.g. SQLITE_BUSY); autocommit tells us the real state.
        inner.in_transaction = unsafe { ffi::sqlite3_get_autocommit(inner.db) } == 0;
        tracing::debug!(statement, ok = result.is_ok(), "Transaction: {}", statement);
        result
    }

    fn commit_sync(&self) -> Result<(), Error> {
        self.finish_sync("COMMIT")
    }

    fn rollback_sync(&self) -> Result<(), Error> {
        self.finish_sync("ROLLBACK")
    }
}

impl Drop for SqliteConnection {
    fn drop(&mut self) {
        if let Ok(inner) = self.inner.lock() {
            if !inner.db.is_null() {
                // SAFETY: db is valid and no statements outlive a call
                unsafe {
                    ffi::sqlite3_close_v2(inner.db);
                }
            }
        }
    }
}

/// A SQLite transaction.
///
/// Finish it with `commit` or `rollback`; dropping it unfinished rolls back.
pub struct SqliteTransaction<'conn> {
    conn: &'conn SqliteConnection,
    finished: bool,
}

impl<'conn> SqliteTransaction<'conn> {
    fn new(conn: &'conn SqliteConnection) -> Self {
        Self {
            conn,
            finished: false,
        }
    }
}

impl Drop for SqliteTransaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(e) = self.conn.rollback_sync() {
                tracing::warn!(error = %e, "Rollback of abandoned transaction failed");
            }
        }
    }
}

impl Connection for SqliteConnection {
    type Tx<'conn>
        = SqliteTransaction<'conn>
    where
        Self: 'conn;

    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, Error> {
        self.query_sync(sql, params)
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64, Error> {
        self.execute_sync(sql, params)
    }

    fn begin_with(&self, isolation: IsolationLevel) -> Result<Self::Tx<'_>, Error> {
        self.begin_sync(isolation)?;
        Ok(SqliteTransaction::new(self))
    }
}

impl TransactionOps for SqliteTransaction<'_> {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, Error> {
        self.conn.query_sync(sql, params)
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64, Error> {
        self.conn.execute_sync(sql, params)
    }

    fn commit(mut self) -> Result<(), Error> {
        self.finished = true;
        let result = self.conn.commit_sync();
        if result.is_err() && self.conn.in_transaction() {
            // Let drop roll back whatever COMMIT left open.
            self.finished = false;
        }
        result
    }

    fn rollback(mut self) -> Result<(), Error> {
        self.finished = true;
        self.conn.rollback_sync()
    }
}

// Helper functions

fn exec_raw(db: *mut ffi::sqlite3, sql: &str) -> Result<(), Error> {
    let c_sql = CString::new(sql).map_err(|_| null_byte_error(sql))?;

    let mut errmsg: *mut std::ffi::c_char = ptr::null_mut();

    // SAFETY: All pointers are valid
    let rc = unsafe { ffi::sqlite3_exec(db, c_sql.as_ptr(), None, ptr::null_mut(), &mut errmsg) };

    if rc != ffi::SQLITE_OK {
        let msg = if !errmsg.is_null() {
            // SAFETY: errmsg is a valid C string allocated by sqlite
            unsafe {
                let msg = CStr::from_ptr(errmsg).to_string_lossy().into_owned();
                ffi::sqlite3_free(errmsg.cast());
                msg
            }
        } else {
            ffi::error_string(rc).to_string()
        };

        return Err(Error::Query(QueryError::new(
            error_code_to_kind(rc),
            Some(sql),
            msg,
        )));
    }

    Ok(())
}

fn prepare_stmt(db: *mut ffi::sqlite3, sql: &str) -> Result<*mut ffi::sqlite3_stmt, Error> {
    let c_sql = CString::new(sql).map_err(|_| null_byte_error(sql))?;

    let mut stmt: *mut ffi::sqlite3_stmt = ptr::null_mut();

    // SAFETY: All pointers are valid
    let rc = unsafe {
        ffi::sqlite3_prepare_v2(
            db,
            c_sql.as_ptr(),
            c_sql.as_bytes().len() as c_int,
            &mut stmt,
            ptr::null_mut(),
        )
    };

    if rc != ffi::SQLITE_OK {
        return Err(step_error(db, sql));
    }

    Ok(stmt)
}

fn bind_params(
    db: *mut ffi::sqlite3,
    stmt: *mut ffi::sqlite3_stmt,
    sql: &str,
    params: &[Value],
) -> Result<(), Error> {
    for (i, param) in params.iter().enumerate() {
        // SAFETY: stmt is valid, index is 1-based
        let rc = unsafe { types::bind_value(stmt, (i + 1) as c_int, param) };
        if rc != ffi::SQLITE_OK {
            return Err(bind_error(db, sql, i + 1, rc));
        }
    }
    Ok(())
}

fn bind_error(db: *mut ffi::sqlite3, sql: &str, index: usize, rc: c_int) -> Error {
    let msg = if rc == ffi::SQLITE_TOOBIG {
        ffi::error_string(rc).to_string()
    } else {
        // SAFETY: db is valid
        unsafe { ffi::last_error_message(db) }
    };
    Error::Query(QueryError::new(
        error_code_to_kind(rc),
        Some(sql),
        format!("Failed to bind parameter {}: {}", index, msg),
    ))
}

fn step_error(db: *mut ffi::sqlite3, sql: &str) -> Error {
    // SAFETY: db is valid
    let (msg, code) = unsafe { (ffi::last_error_message(db), ffi::sqlite3_errcode(db)) };

    let kind = match error_code_to_kind(code) {
        QueryErrorKind::Database if msg.starts_with("no such table") => QueryErrorKind::NotFound,
        QueryErrorKind::Database if msg.starts_with("no such column") => QueryErrorKind::NotFound,
        QueryErrorKind::Database if msg.contains("syntax error") => QueryErrorKind::Syntax,
        kind => kind,
    };

    Error::Query(QueryError::new(kind, Some(sql), msg))
}

fn null_byte_error(sql: &str) -> Error {
    Error::Query(QueryError::new(
        QueryErrorKind::Syntax,
        Some(sql),
        "SQL contains null byte",
    ))
}

fn error_code_to_kind(code: c_int) -> QueryErrorKind {
    // Extended codes carry the primary code in the low byte.
    match code & 0xff {
        ffi::SQLITE_CONSTRAINT => QueryErrorKind::Constraint,
        ffi::SQLITE_BUSY | ffi::SQLITE_LOCKED => QueryErrorKind::Busy,
        ffi::SQLITE_PERM | ffi::SQLITE_AUTH => QueryErrorKind::Permission,
        ffi::SQLITE_NOTFOUND => QueryErrorKind::NotFound,
        ffi::SQLITE_TOOBIG => QueryErrorKind::DataTruncation,
        ffi::SQLITE_INTERRUPT => QueryErrorKind::Cancelled,
        _ => QueryErrorKind::Database,
    }
}
