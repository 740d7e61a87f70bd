//! Compiled statements and the builder that produces them.
//!
//! [`StatementBuilder`] keeps the clause fragments and the bound arguments in
//! step: a `?` can only be emitted by a call that pushes its argument at the
//! same time, so placeholder *i* always binds argument *i*.

use crate::change::{CellKind, CellValue, ChangeError, PrimaryKey};
use rowedit_core::{QuoteStyle, Value};
use std::fmt;

/// A ready-to-execute statement: SQL text plus positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStatement {
    sql: String,
    args: Vec<Value>,
}

impl CompiledStatement {
    pub fn new(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.args)
    }
}

impl fmt::Display for CompiledStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// What a column is bound to in the generated SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Literal `NULL` inlined in the text; consumes no argument.
    Null,
    /// A `?` placeholder with an argument.
    Bound,
}

impl Slot {
    fn as_sql(self) -> &'static str {
        match self {
            Slot::Null => "NULL",
            Slot::Bound => "?",
        }
    }
}

/// Accumulates one INSERT/UPDATE/DELETE statement.
#[derive(Debug)]
pub struct StatementBuilder {
    quote: QuoteStyle,
    table: String,
    columns: Vec<(String, Slot)>,
    column_args: Vec<Value>,
    predicates: Vec<String>,
    predicate_args: Vec<Value>,
}

impl StatementBuilder {
    /// Start a statement against `table`.
    pub fn new(quote: QuoteStyle, table: &str) -> Self {
        Self {
            quote,
            table: table.to_string(),
            columns: Vec::new(),
            column_args: Vec::new(),
            predicates: Vec::new(),
            predicate_args: Vec::new(),
        }
    }

    /// Add a column value (an INSERT column or an UPDATE assignment).
    pub fn assignment(&mut self, cell: &CellValue) -> Result<&mut Self, ChangeError> {
        let column = self.quote.quote(&cell.column);
        match cell.kind {
            CellKind::Null => self.columns.push((column, Slot::Null)),
            CellKind::Empty => {
                self.columns.push((column, Slot::Bound));
                self.column_args.push(Value::Text(String::new()));
            }
            CellKind::String => {
                self.columns.push((column, Slot::Bound));
                self.column_args.push(Value::Text(cell.value.clone()));
            }
            CellKind::Default => {
                return Err(ChangeError::UnsupportedDefault {
                    table: self.table.clone(),
                    column: cell.column.clone(),
                });
            }
        }
        Ok(self)
    }

    /// Add a `column = ?` key predicate, joined to the others with AND.
    pub fn predicate(&mut self, key: &PrimaryKey) -> &mut Self {
        self.predicates
            .push(format!("{} = ?", self.quote.quote(&key.name)));
        self.predicate_args.push(Value::Text(key.value.clone()));
        self
    }

    /// `INSERT INTO t (cols) VALUES (slots)`
    ///
    /// Fails with [`ChangeError::EmptyInsert`] when no column was added.
    pub fn build_insert(self) -> Result<CompiledStatement, ChangeError> {
        if self.columns.is_empty() {
            return Err(ChangeError::EmptyInsert { table: self.table });
        }

        let columns = self
            .columns
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let slots = self
            .columns
            .iter()
            .map(|(_, slot)| slot.as_sql())
            .collect::<Vec<_>>()
            .join(", ");

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.quote.quote(&self.table),
            columns,
            slots
        );
        Ok(CompiledStatement::new(sql, self.column_args))
    }

    /// `UPDATE t SET a = ?, b = NULL WHERE k1 = ? AND k2 = ?`
    ///
    /// Arguments are the SET values followed by the key values. Fails with
    /// [`ChangeError::NoAssignments`] or [`ChangeError::MissingPrimaryKey`]
    /// rather than render a statement without SET or WHERE.
    pub fn build_update(self) -> Result<CompiledStatement, ChangeError> {
        if self.columns.is_empty() {
            return Err(ChangeError::NoAssignments { table: self.table });
        }
        self.require_predicates()?;

        let mut sql = format!("UPDATE {}", self.quote.quote(&self.table));
        for (i, (name, slot)) in self.columns.iter().enumerate() {
            let keyword = if i == 0 { " SET " } else { ", " };
            sql.push_str(keyword);
            sql.push_str(name);
            sql.push_str(" = ");
            sql.push_str(slot.as_sql());
        }
        Self::push_where(&mut sql, &self.predicates);

        let mut args = self.column_args;
        args.extend(self.predicate_args);
        Ok(CompiledStatement::new(sql, args))
    }

    /// `DELETE FROM t WHERE k1 = ? AND k2 = ?`
    ///
    /// A delete without key predicates is refused with
    /// [`ChangeError::MissingPrimaryKey`].
    pub fn build_delete(self) -> Result<CompiledStatement, ChangeError> {
        self.require_predicates()?;

        let mut sql = format!("DELETE FROM {}", self.quote.quote(&self.table));
        Self::push_where(&mut sql, &self.predicates);
        Ok(CompiledStatement::new(sql, self.predicate_args))
    }

    fn require_predicates(&self) -> Result<(), ChangeError> {
        if self.predicates.is_empty() {
            return Err(ChangeError::MissingPrimaryKey {
                table: self.table.clone(),
            });
        }
        Ok(())
    }

    fn push_where(sql: &mut String, predicates: &[String]) {
        for (i, predicate) in predicates.iter().enumerate() {
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            sql.push_str(predicate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn test_insert_inlines_null() {
        let mut b = StatementBuilder::new(QuoteStyle::Backtick, "users");
        b.assignment(&CellValue::string("name", "Ann")).unwrap();
        b.assignment(&CellValue::null("age")).unwrap();
        b.assignment(&CellValue::empty("note")).unwrap();

        let stmt = b.build_insert().unwrap();
        assert_eq!(
            stmt.sql(),
            "INSERT INTO `users` (`name`, `age`, `note`) VALUES (?, NULL, ?)"
        );
        assert_eq!(stmt.args(), &[text("Ann"), text("")]);
    }

    #[test]
    fn test_update_orders_set_args_before_keys() {
        let mut b = StatementBuilder::new(QuoteStyle::Backtick, "t");
        b.assignment(&CellValue::null("a")).unwrap();
        b.assignment(&CellValue::string("b", "x")).unwrap();
        b.predicate(&PrimaryKey::new("k1", "1"))
            .predicate(&PrimaryKey::new("k2", "2"));

        let stmt = b.build_update().unwrap();
        assert_eq!(
            stmt.sql(),
            "UPDATE `t` SET `a` = NULL, `b` = ? WHERE `k1` = ? AND `k2` = ?"
        );
        assert_eq!(stmt.args(), &[text("x"), text("1"), text("2")]);
    }

    #[test]
    fn test_delete_with_double_quotes() {
        let mut b = StatementBuilder::new(QuoteStyle::DoubleQuote, "order");
        b.predicate(&PrimaryKey::new("group", "7"));

        let stmt = b.build_delete().unwrap();
        assert_eq!(stmt.sql(), "DELETE FROM \"order\" WHERE \"group\" = ?");
        assert_eq!(stmt.args(), &[text("7")]);
    }

    #[test]
    fn test_default_cell_is_refused() {
        let mut b = StatementBuilder::new(QuoteStyle::Backtick, "t");
        let err = b.assignment(&CellValue::default("c")).unwrap_err();
        assert!(matches!(err, ChangeError::UnsupportedDefault { .. }));
    }

    #[test]
    fn test_delete_without_predicates_is_refused() {
        let b = StatementBuilder::new(QuoteStyle::Backtick, "users");
        let err = b.build_delete().unwrap_err();
        assert_eq!(
            err,
            ChangeError::MissingPrimaryKey {
                table: "users".to_string()
            }
        );
    }

    #[test]
    fn test_update_without_assignments_is_refused() {
        let mut b = StatementBuilder::new(QuoteStyle::Backtick, "users");
        b.predicate(&PrimaryKey::new("id", "1"));
        let err = b.build_update().unwrap_err();
        assert_eq!(
            err,
            ChangeError::NoAssignments {
                table: "users".to_string()
            }
        );
    }

    #[test]
    fn test_update_without_predicates_is_refused() {
        let mut b = StatementBuilder::new(QuoteStyle::Backtick, "users");
        b.assignment(&CellValue::string("name", "Ann")).unwrap();
        let err = b.build_update().unwrap_err();
        assert!(matches!(err, ChangeError::MissingPrimaryKey { .. }));
    }

    #[test]
    fn test_insert_without_columns_is_refused() {
        let b = StatementBuilder::new(QuoteStyle::Backtick, "users");
        let err = b.build_insert().unwrap_err();
        assert!(matches!(err, ChangeError::EmptyInsert { .. }));
    }

    #[test]
    fn test_statement_parts() {
        let stmt = CompiledStatement::new("DELETE FROM `t`", vec![]);
        assert_eq!(stmt.to_string(), "DELETE FROM `t`");
        let (sql, args) = stmt.into_parts();
        assert_eq!(sql, "DELETE FROM `t`");
        assert!(args.is_empty());
    }
}
