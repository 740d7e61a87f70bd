//! Change compiler: pending changes in, parameterized statements out.

use crate::change::{ChangeError, PendingChange};
use crate::statement::{CompiledStatement, StatementBuilder};
use rowedit_core::QuoteStyle;

/// Compiles batches of [`PendingChange`]s.
///
/// Pure and deterministic: batch item *i* becomes statement *i*.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compiler {
    quote: QuoteStyle,
}

impl Compiler {
    pub fn new(quote: QuoteStyle) -> Self {
        Self { quote }
    }

    pub fn quote_style(&self) -> QuoteStyle {
        self.quote
    }

    /// Compile one change after checking it is well formed.
    pub fn compile_change(&self, change: &PendingChange) -> Result<CompiledStatement, ChangeError> {
        change.validate()?;

        let mut builder = StatementBuilder::new(self.quote, change.table());
        for cell in change.values() {
            builder.assignment(cell)?;
        }
        for key in change.primary_key() {
            builder.predicate(key);
        }

        match change {
            PendingChange::Insert { .. } => builder.build_insert(),
            PendingChange::Update { .. } => builder.build_update(),
            PendingChange::Delete { .. } => builder.build_delete(),
        }
    }

    /// Compile a batch, stopping at the first malformed change.
    pub fn try_compile(&self, batch: &[PendingChange]) -> Result<Vec<CompiledStatement>, ChangeError> {
        batch
            .iter()
            .map(|change| self.compile_change(change))
            .collect()
    }

    /// Compile a batch.
    ///
    /// # Panics
    ///
    /// Panics if any change is malformed (see [`PendingChange::validate`]).
    /// Use [`Compiler::try_compile`] for input that has not been checked.
    pub fn compile(&self, batch: &[PendingChange]) -> Vec<CompiledStatement> {
        match self.try_compile(batch) {
            Ok(statements) => statements,
            Err(err) => panic!("invalid pending change: {}", err),
        }
    }
}

/// Compile a batch with the default quoting style. Panics on malformed input.
pub fn compile(batch: &[PendingChange]) -> Vec<CompiledStatement> {
    Compiler::default().compile(batch)
}

/// Compile a batch with the default quoting style.
pub fn try_compile(batch: &[PendingChange]) -> Result<Vec<CompiledStatement>, ChangeError> {
    Compiler::default().try_compile(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::{CellValue, PrimaryKey};
    use rowedit_core::Value;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn test_single_insert() {
        let batch = vec![PendingChange::insert(
            "users",
            vec![CellValue::string("name", "Ann"), CellValue::null("age")],
        )];

        let stmts = compile(&batch);
        assert_eq!(stmts.len(), 1);
        assert_eq!(
            stmts[0].sql(),
            "INSERT INTO `users` (`name`, `age`) VALUES (?, NULL)"
        );
        assert_eq!(stmts[0].args(), &[text("Ann")]);
    }

    #[test]
    fn test_update_with_composite_key() {
        let batch = vec![PendingChange::update(
            "t",
            vec![CellValue::string("x", "5")],
            vec![PrimaryKey::new("a", "1"), PrimaryKey::new("b", "2")],
        )];

        let stmts = compile(&batch);
        assert_eq!(stmts[0].sql(), "UPDATE `t` SET `x` = ? WHERE `a` = ? AND `b` = ?");
        assert_eq!(stmts[0].args(), &[text("5"), text("1"), text("2")]);
    }

    #[test]
    fn test_delete() {
        let batch = vec![PendingChange::delete("t", vec![PrimaryKey::new("id", "9")])];

        let stmts = compile(&batch);
        assert_eq!(stmts[0].sql(), "DELETE FROM `t` WHERE `id` = ?");
        assert_eq!(stmts[0].args(), &[text("9")]);
    }

    #[test]
    fn test_null_cells_bind_nothing() {
        let values = vec![
            CellValue::null("a"),
            CellValue::string("b", "x"),
            CellValue::null("c"),
            CellValue::empty("d"),
            CellValue::string("e", "y"),
        ];
        let batch = vec![
            PendingChange::insert("t", values.clone()),
            PendingChange::update("t", values, vec![PrimaryKey::new("id", "1")]),
        ];

        let stmts = compile(&batch);
        assert_eq!(stmts[0].args(), &[text("x"), text(""), text("y")]);
        assert_eq!(stmts[0].sql().matches("NULL").count(), 2);
        assert_eq!(stmts[0].sql().matches('?').count(), 3);

        assert_eq!(stmts[1].args(), &[text("x"), text(""), text("y"), text("1")]);
        assert_eq!(stmts[1].sql().matches("NULL").count(), 2);
        assert_eq!(stmts[1].sql().matches('?').count(), 4);
    }

    #[test]
    fn test_empty_binds_empty_string() {
        let batch = vec![PendingChange::insert("t", vec![CellValue::empty("note")])];

        let stmts = compile(&batch);
        assert_eq!(stmts[0].sql(), "INSERT INTO `t` (`note`) VALUES (?)");
        assert_eq!(stmts[0].args(), &[text("")]);
        assert!(!stmts[0].args().iter().any(Value::is_null));
    }

    #[test]
    fn test_batch_order_preserved() {
        let batch = vec![
            PendingChange::delete("a", vec![PrimaryKey::new("id", "1")]),
            PendingChange::insert("b", vec![CellValue::string("id", "1")]),
            PendingChange::update(
                "c",
                vec![CellValue::string("v", "2")],
                vec![PrimaryKey::new("id", "3")],
            ),
        ];

        let stmts = compile(&batch);
        assert_eq!(stmts.len(), 3);
        assert!(stmts[0].sql().starts_with("DELETE FROM `a`"));
        assert!(stmts[1].sql().starts_with("INSERT INTO `b`"));
        assert!(stmts[2].sql().starts_with("UPDATE `c`"));
    }

    #[test]
    fn test_where_keyword_counts() {
        let keys: Vec<_> = (0..4)
            .map(|i| PrimaryKey::new(format!("k{}", i), i.to_string()))
            .collect();
        let batch = vec![PendingChange::delete("t", keys)];

        let stmts = compile(&batch);
        let sql = stmts[0].sql();
        assert_eq!(sql.matches(" WHERE ").count(), 1);
        assert_eq!(sql.matches(" AND ").count(), 3);
        assert_eq!(stmts[0].args(), &[text("0"), text("1"), text("2"), text("3")]);
    }

    #[test]
    fn test_double_quote_style() {
        let compiler = Compiler::new(QuoteStyle::DoubleQuote);
        let batch = vec![PendingChange::update(
            "order",
            vec![CellValue::string("select", "v")],
            vec![PrimaryKey::new("id", "1")],
        )];

        let stmts = compiler.compile(&batch);
        assert_eq!(
            stmts[0].sql(),
            "UPDATE \"order\" SET \"select\" = ? WHERE \"id\" = ?"
        );
    }

    #[test]
    fn test_empty_batch() {
        assert!(compile(&[]).is_empty());
    }

    #[test]
    fn test_try_compile_reports_first_error() {
        let batch = vec![
            PendingChange::insert("t", vec![CellValue::string("a", "1")]),
            PendingChange::delete("t", vec![]),
            PendingChange::insert("t", vec![CellValue::default("a")]),
        ];

        let err = try_compile(&batch).unwrap_err();
        assert_eq!(err, ChangeError::MissingPrimaryKey { table: "t".to_string() });
    }

    #[test]
    fn test_try_compile_rejects_default() {
        let batch = vec![PendingChange::insert("t", vec![CellValue::default("created")])];

        let err = try_compile(&batch).unwrap_err();
        assert!(matches!(err, ChangeError::UnsupportedDefault { .. }));
    }

    #[test]
    #[should_panic(expected = "has no primary key")]
    fn test_compile_panics_without_key() {
        let batch = vec![PendingChange::update("t", vec![CellValue::string("x", "1")], vec![])];
        let _ = compile(&batch);
    }

    #[test]
    #[should_panic(expected = "assigns no columns")]
    fn test_compile_panics_on_empty_update() {
        let batch = vec![PendingChange::update("t", vec![], vec![PrimaryKey::new("id", "1")])];
        let _ = compile(&batch);
    }
}
