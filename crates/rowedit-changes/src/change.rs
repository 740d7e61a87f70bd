//! Pending row edits.
//!
//! A [`PendingChange`] describes one queued insert, update or delete against a
//! single table. Column values are carried as [`CellValue`]s whose
//! [`CellKind`] keeps three "no value" states apart: SQL NULL, the empty
//! string, and "restore the engine default".

use rowedit_core::{ValidationError, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// What a column of a pending change should be set to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    /// The engine's NULL.
    Null,
    /// An explicit empty string.
    Empty,
    /// The literal value carried in [`CellValue::value`].
    String,
    /// The column's declared default. Not supported by the SQLite engine,
    /// so changes carrying it are rejected.
    Default,
}

/// The pending value of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellValue {
    pub column: String,
    #[serde(rename = "type")]
    pub kind: CellKind,
    /// Payload, meaningful only for [`CellKind::String`].
    #[serde(default)]
    pub value: String,
}

impl CellValue {
    pub fn null(column: impl Into<String>) -> Self {
        Self::with_kind(column, CellKind::Null)
    }

    pub fn empty(column: impl Into<String>) -> Self {
        Self::with_kind(column, CellKind::Empty)
    }

    pub fn string(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            kind: CellKind::String,
            value: value.into(),
        }
    }

    pub fn default(column: impl Into<String>) -> Self {
        Self::with_kind(column, CellKind::Default)
    }

    fn with_kind(column: impl Into<String>, kind: CellKind) -> Self {
        Self {
            column: column.into(),
            kind,
            value: String::new(),
        }
    }

    /// Classify a value read back from the store.
    ///
    /// SQL NULL becomes [`CellKind::Null`], empty text becomes
    /// [`CellKind::Empty`], and everything else becomes [`CellKind::String`]
    /// holding its text rendering.
    pub fn from_value(column: impl Into<String>, value: &Value) -> Self {
        match value.to_text() {
            None => Self::null(column),
            Some(text) if text.is_empty() => Self::empty(column),
            Some(text) => Self::string(column, text),
        }
    }
}

/// One column of a row's primary key, with the value it had before the edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKey {
    pub name: String,
    pub value: String,
}

impl PrimaryKey {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A queued row-level edit not yet applied to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PendingChange {
    /// Insert a new row.
    Insert {
        table: String,
        values: Vec<CellValue>,
    },
    /// Update the row identified by `primary_key`.
    Update {
        table: String,
        values: Vec<CellValue>,
        primary_key: Vec<PrimaryKey>,
    },
    /// Delete the row identified by `primary_key`.
    Delete {
        table: String,
        primary_key: Vec<PrimaryKey>,
    },
}

impl PendingChange {
    pub fn insert(table: impl Into<String>, values: Vec<CellValue>) -> Self {
        PendingChange::Insert {
            table: table.into(),
            values,
        }
    }

    pub fn update(
        table: impl Into<String>,
        values: Vec<CellValue>,
        primary_key: Vec<PrimaryKey>,
    ) -> Self {
        PendingChange::Update {
            table: table.into(),
            values,
            primary_key,
        }
    }

    pub fn delete(table: impl Into<String>, primary_key: Vec<PrimaryKey>) -> Self {
        PendingChange::Delete {
            table: table.into(),
            primary_key,
        }
    }

    /// Get the table name for this change.
    pub fn table(&self) -> &str {
        match self {
            PendingChange::Insert { table, .. }
            | PendingChange::Update { table, .. }
            | PendingChange::Delete { table, .. } => table,
        }
    }

    /// Column values carried by this change (empty for deletes).
    pub fn values(&self) -> &[CellValue] {
        match self {
            PendingChange::Insert { values, .. } | PendingChange::Update { values, .. } => values,
            PendingChange::Delete { .. } => &[],
        }
    }

    /// Primary key descriptors (empty for inserts).
    pub fn primary_key(&self) -> &[PrimaryKey] {
        match self {
            PendingChange::Update { primary_key, .. }
            | PendingChange::Delete { primary_key, .. } => primary_key,
            PendingChange::Insert { .. } => &[],
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, PendingChange::Insert { .. })
    }

    pub fn is_update(&self) -> bool {
        matches!(self, PendingChange::Update { .. })
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, PendingChange::Delete { .. })
    }

    /// Check the caller contract of this change.
    pub fn validate(&self) -> Result<(), ChangeError> {
        if self.table().is_empty() {
            return Err(ChangeError::EmptyTable);
        }

        match self {
            PendingChange::Insert { values, .. } if values.is_empty() => {
                return Err(ChangeError::EmptyInsert {
                    table: self.table().to_string(),
                });
            }
            PendingChange::Update { values, .. } if values.is_empty() => {
                return Err(ChangeError::NoAssignments {
                    table: self.table().to_string(),
                });
            }
            _ => {}
        }

        if !self.is_insert() && self.primary_key().is_empty() {
            return Err(ChangeError::MissingPrimaryKey {
                table: self.table().to_string(),
            });
        }

        let mut seen = HashSet::new();
        for cell in self.values() {
            if !seen.insert(cell.column.as_str()) {
                return Err(ChangeError::DuplicateColumn {
                    table: self.table().to_string(),
                    column: cell.column.clone(),
                });
            }
            if cell.kind == CellKind::Default {
                return Err(ChangeError::UnsupportedDefault {
                    table: self.table().to_string(),
                    column: cell.column.clone(),
                });
            }
        }

        Ok(())
    }
}

/// A pending change that breaks its caller contract.
///
/// These are programming errors upstream, not conditions to retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeError {
    /// The change names no table.
    EmptyTable,
    /// An insert with no column values.
    EmptyInsert { table: String },
    /// An update with no column values to assign.
    NoAssignments { table: String },
    /// An update or delete without a primary key to identify its row.
    MissingPrimaryKey { table: String },
    /// The same column appears twice in one change.
    DuplicateColumn { table: String, column: String },
    /// A column asks for its engine default, which this engine cannot express.
    UnsupportedDefault { table: String, column: String },
}

impl fmt::Display for ChangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeError::EmptyTable => write!(f, "pending change has no table name"),
            ChangeError::EmptyInsert { table } => {
                write!(f, "insert into '{}' has no column values", table)
            }
            ChangeError::NoAssignments { table } => {
                write!(f, "update of '{}' assigns no columns", table)
            }
            ChangeError::MissingPrimaryKey { table } => {
                write!(f, "change to '{}' has no primary key", table)
            }
            ChangeError::DuplicateColumn { table, column } => {
                write!(f, "column '{}' appears twice in change to '{}'", column, table)
            }
            ChangeError::UnsupportedDefault { table, column } => write!(
                f,
                "column '{}' of '{}' requests its default value, which is not supported",
                column, table
            ),
        }
    }
}

impl std::error::Error for ChangeError {}

impl From<ChangeError> for ValidationError {
    fn from(err: ChangeError) -> Self {
        let subject = match &err {
            ChangeError::EmptyTable => String::new(),
            ChangeError::EmptyInsert { table }
            | ChangeError::NoAssignments { table }
            | ChangeError::MissingPrimaryKey { table }
            | ChangeError::DuplicateColumn { table, .. }
            | ChangeError::UnsupportedDefault { table, .. } => table.clone(),
        };
        ValidationError::new(subject, err.to_string())
    }
}

impl From<ChangeError> for rowedit_core::Error {
    fn from(err: ChangeError) -> Self {
        rowedit_core::Error::Validation(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str, value: &str) -> PrimaryKey {
        PrimaryKey::new(name, value)
    }

    #[test]
    fn test_accessors() {
        let insert = PendingChange::insert("users", vec![CellValue::string("name", "Ann")]);
        assert_eq!(insert.table(), "users");
        assert!(insert.is_insert());
        assert!(insert.primary_key().is_empty());
        assert_eq!(insert.values().len(), 1);

        let delete = PendingChange::delete("users", vec![key("id", "1")]);
        assert!(delete.is_delete());
        assert!(!delete.is_update());
        assert!(delete.values().is_empty());
        assert_eq!(delete.primary_key(), &[key("id", "1")]);
    }

    #[test]
    fn test_valid_changes() {
        let changes = [
            PendingChange::insert("t", vec![CellValue::null("a")]),
            PendingChange::update("t", vec![CellValue::empty("a")], vec![key("id", "1")]),
            PendingChange::delete("t", vec![key("a", "1"), key("b", "2")]),
        ];
        for change in &changes {
            assert_eq!(change.validate(), Ok(()));
        }
    }

    #[test]
    fn test_missing_primary_key() {
        let update = PendingChange::update("t", vec![CellValue::string("x", "1")], vec![]);
        assert_eq!(
            update.validate(),
            Err(ChangeError::MissingPrimaryKey {
                table: "t".to_string()
            })
        );
        let delete = PendingChange::delete("t", vec![]);
        assert!(matches!(
            delete.validate(),
            Err(ChangeError::MissingPrimaryKey { .. })
        ));
    }

    #[test]
    fn test_no_assignments_and_empty_insert() {
        let update = PendingChange::update("t", vec![], vec![key("id", "1")]);
        assert!(matches!(
            update.validate(),
            Err(ChangeError::NoAssignments { .. })
        ));
        let insert = PendingChange::insert("t", vec![]);
        assert!(matches!(
            insert.validate(),
            Err(ChangeError::EmptyInsert { .. })
        ));
        let nameless = PendingChange::insert("", vec![CellValue::null("a")]);
        assert_eq!(nameless.validate(), Err(ChangeError::EmptyTable));
    }

    #[test]
    fn test_duplicate_column() {
        let insert = PendingChange::insert(
            "t",
            vec![CellValue::string("a", "1"), CellValue::null("a")],
        );
        assert_eq!(
            insert.validate(),
            Err(ChangeError::DuplicateColumn {
                table: "t".to_string(),
                column: "a".to_string()
            })
        );
    }

    #[test]
    fn test_default_kind_is_rejected() {
        let insert = PendingChange::insert("t", vec![CellValue::default("created_at")]);
        let err = insert.validate().unwrap_err();
        assert!(matches!(err, ChangeError::UnsupportedDefault { .. }));

        let core: rowedit_core::Error = err.into();
        assert!(core.to_string().contains("created_at"));
    }

    #[test]
    fn test_from_value_classification() {
        assert_eq!(CellValue::from_value("a", &Value::Null).kind, CellKind::Null);
        assert_eq!(
            CellValue::from_value("a", &Value::Text(String::new())).kind,
            CellKind::Empty
        );
        assert_eq!(
            CellValue::from_value("a", &Value::BigInt(7)),
            CellValue::string("a", "7")
        );
    }

    #[test]
    fn test_json_shape() {
        let json = r#"[
            {"op": "insert", "table": "users",
             "values": [{"column": "name", "type": "string", "value": "Ann"},
                        {"column": "age", "type": "null"}]},
            {"op": "update", "table": "t",
             "values": [{"column": "x", "type": "empty"}],
             "primary_key": [{"name": "a", "value": "1"}]},
            {"op": "delete", "table": "t",
             "primary_key": [{"name": "id", "value": "9"}]}
        ]"#;

        let batch: Vec<PendingChange> = serde_json::from_str(json).unwrap();
        assert_eq!(
            batch[0],
            PendingChange::insert(
                "users",
                vec![CellValue::string("name", "Ann"), CellValue::null("age")]
            )
        );
        assert_eq!(
            batch[1],
            PendingChange::update("t", vec![CellValue::empty("x")], vec![key("a", "1")])
        );
        assert_eq!(batch[2], PendingChange::delete("t", vec![key("id", "9")]));
    }
}
