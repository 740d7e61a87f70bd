//! SQL identifier quoting utilities.
//!
//! Quoting lets generated statements refer to tables and columns whose names
//! collide with reserved words (`order`, `group`, `select`, ...). Names come
//! from schema introspection, so this is not an injection boundary, but an
//! embedded quote character is still doubled so the result is always a single
//! identifier token.

use serde::{Deserialize, Serialize};

/// Identifier quoting convention of a target engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QuoteStyle {
    /// `` `name` `` (SQLite, MySQL)
    #[default]
    Backtick,
    /// `"name"` (ANSI, PostgreSQL)
    DoubleQuote,
}

impl QuoteStyle {
    /// Quote `name` using this style.
    #[inline]
    pub fn quote(self, name: &str) -> String {
        match self {
            QuoteStyle::Backtick => quote_ident_backtick(name),
            QuoteStyle::DoubleQuote => quote_ident(name),
        }
    }
}

/// Quote a SQL identifier using ANSI double-quoting.
///
/// Embedded double-quotes are escaped by doubling them (`"` → `""`).
///
/// # Examples
///
/// ```
/// use rowedit_core::quote_ident;
///
/// assert_eq!(quote_ident("users"), "\"users\"");
/// assert_eq!(quote_ident("user\"name"), "\"user\"\"name\"");
/// ```
#[inline]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a SQL identifier using backticks.
///
/// Embedded backticks are escaped by doubling them.
///
/// # Examples
///
/// ```
/// use rowedit_core::quote_ident_backtick;
///
/// assert_eq!(quote_ident_backtick("users"), "`users`");
/// assert_eq!(quote_ident_backtick("user`name"), "`user``name`");
/// ```
#[inline]
pub fn quote_ident_backtick(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backtick_simple() {
        assert_eq!(quote_ident_backtick("users"), "`users`");
    }

    #[test]
    fn test_backtick_reserved_word() {
        assert_eq!(quote_ident_backtick("order"), "`order`");
        assert_eq!(quote_ident_backtick("group"), "`group`");
    }

    #[test]
    fn test_backtick_empty() {
        assert_eq!(quote_ident_backtick(""), "``");
    }

    #[test]
    fn test_backtick_embedded() {
        assert_eq!(quote_ident_backtick("a`b`c"), "`a``b``c`");
    }

    #[test]
    fn test_backtick_keeps_other_quotes() {
        assert_eq!(quote_ident_backtick("it's \"x\""), "`it's \"x\"`");
    }

    #[test]
    fn test_double_quote() {
        assert_eq!(quote_ident("select"), "\"select\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
        assert_eq!(quote_ident("first name"), "\"first name\"");
    }

    #[test]
    fn test_style_dispatch() {
        assert_eq!(QuoteStyle::default(), QuoteStyle::Backtick);
        assert_eq!(QuoteStyle::Backtick.quote("t"), "`t`");
        assert_eq!(QuoteStyle::DoubleQuote.quote("t"), "\"t\"");
    }
}
