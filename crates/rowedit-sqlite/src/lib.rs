//! SQLite driver for rowedit.
//!
// FFI bindings require unsafe code
#![allow(unsafe_code)]
//!
//! Implements the `Connection` and `TransactionOps` traits from rowedit-core
//! on top of libsqlite3 (bundled through `libsqlite3-sys`).
//!
//! # Example
//!
//! ```rust,ignore
//! use rowedit_sqlite::SqliteConnection;
//! use rowedit_core::{Connection, Value};
//!
//! let conn = SqliteConnection::open_memory()?;
//! conn.execute_raw("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)")?;
//! conn.execute("INSERT INTO users (name) VALUES (?)", &[Value::Text("Alice".into())])?;
//! ```
//!
//! # Type Mapping
//!
//! | Value | SQLite Type |
//! |-------|-------------|
//! | `Bool` | INTEGER (0/1) |
//! | `Int`, `BigInt` | INTEGER |
//! | `Double` | REAL |
//! | `Text` | TEXT |
//! | `Bytes` | BLOB |
//! | `Null` | NULL |

pub mod connection;
pub mod ffi;
pub mod types;

pub use connection::{OpenFlags, SqliteConfig, SqliteConnection, SqliteTransaction};

/// The linked SQLite library version.
pub fn sqlite_version() -> &'static str {
    ffi::version()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_version() {
        let version = sqlite_version();
        assert!(
            version.starts_with('3'),
            "Expected SQLite 3.x, got {}",
            version
        );
    }
}
