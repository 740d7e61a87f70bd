//! Pending-change compiler and transactional executor.
//!
//! Row edits queued by a caller ([`PendingChange`]) are compiled into
//! parameterized statements ([`CompiledStatement`]) and applied to a
//! [`Connection`](rowedit_core::Connection) as one atomic unit.
//!
//! ```rust,ignore
//! use rowedit_changes::{CellValue, PendingChange, PrimaryKey, apply};
//!
//! let batch = vec![
//!     PendingChange::insert("users", vec![
//!         CellValue::string("name", "Ann"),
//!         CellValue::null("age"),
//!     ]),
//!     PendingChange::delete("users", vec![PrimaryKey::new("id", "9")]),
//! ];
//! let report = apply(&conn, &batch)?;
//! ```
//!
//! Column values distinguish SQL NULL (inlined as `NULL`, never bound) from
//! the empty string (bound as `""`). The "engine default" kind is recognised
//! but rejected.

pub mod change;
pub mod compile;
pub mod executor;
pub mod statement;

pub use change::{CellKind, CellValue, ChangeError, PendingChange, PrimaryKey};
pub use compile::{Compiler, compile, try_compile};
pub use executor::{ApplyReport, apply, execute};
pub use statement::{CompiledStatement, StatementBuilder};
