//! Core types and traits for rowedit.
//!
//! This crate provides the driver-independent foundation:
//!
//! - `Value` and `Row` for parameters and result sets
//! - `Connection` / `TransactionOps` traits implemented by drivers
//! - `Error` taxonomy shared by every crate in the workspace
//! - identifier quoting helpers used when generating statements

pub mod connection;
pub mod error;
pub mod identifiers;
pub mod row;
pub mod value;

pub use connection::{Connection, IsolationLevel, TransactionOps};
pub use error::{Error, Result, ValidationError};
pub use identifiers::{QuoteStyle, quote_ident, quote_ident_backtick};
pub use row::{ColumnInfo, FromValue, Row};
pub use value::Value;
