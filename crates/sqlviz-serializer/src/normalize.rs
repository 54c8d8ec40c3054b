// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Formatting-independent SQL text comparison.
//!
//! Grounded on `deepdive.sql.parser.util.normalize_query`/`is_sql_str_equal`:
//! strip the backticks `sanitize_query` introduced, drop the `asc` the
//! statement parser treats as implicit so `order by x` and `order by x asc`
//! compare equal, reformat with a deterministic SQL formatter so whitespace
//! differences wash out, then lower-case only the five aggregate function
//! names the original singles out (`util.py`'s `sqlparse` keyword-casing
//! pass does not touch function call names, so the original lower-cases
//! them in a second, separate pass).

use sqlformat::{FormatOptions, QueryParams};
use sqlviz_lexer::sanitize_query;

/// Exact substrings the original replaces, case-sensitively, with their
/// lower-case form. Matches `util.py::AGGREGATE_FUNCTIONS_UPPER`.
const AGGREGATE_FUNCTIONS_UPPER: &[&str] = &["COUNT(", "AVG(", "MAX(", "MIN(", "SUM("];

fn lower_aggregate_functions(query: &str) -> String {
    let mut out = query.to_string();
    for func in AGGREGATE_FUNCTIONS_UPPER {
        if out.contains(func) {
            out = out.replace(func, &func.to_ascii_lowercase());
        }
    }
    out
}

fn format_query(query: &str) -> String {
    let formatted = sqlformat::format(
        query,
        &QueryParams::default(),
        FormatOptions {
            uppercase: Some(false),
            ..FormatOptions::default()
        },
    );
    // Collapse the formatter's own reindentation so only content, not line
    // breaks, participates in equality comparison.
    formatted.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes a SQL string so two queries that only differ in identifier
/// quoting, an implicit `ASC`, keyword case, or incidental whitespace
/// compare equal.
pub fn normalize_query(query: &str) -> String {
    let unquoted = sanitize_query(query).replace('`', "");
    let without_asc = unquoted.replace(" asc ", " ").replace(" ASC ", " ");
    let formatted = format_query(&without_asc);
    lower_aggregate_functions(&formatted)
}

/// Whether two SQL strings are equal once [`normalize_query`] is applied to
/// both sides. Matches `is_sql_str_equal`.
pub fn sql_equals(original: &str, converted: &str) -> bool {
    normalize_query(original) == normalize_query(converted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_whitespace_differences() {
        assert!(sql_equals(
            "SELECT a FROM t",
            "select   a\nfrom   t"
        ));
    }

    #[test]
    fn ignores_implicit_asc() {
        assert!(sql_equals(
            "SELECT a FROM t ORDER BY a",
            "SELECT a FROM t ORDER BY a ASC"
        ));
    }

    #[test]
    fn lowers_aggregate_function_names_only() {
        assert!(sql_equals(
            "SELECT COUNT(*) FROM t",
            "SELECT count(*) FROM t"
        ));
    }

    #[test]
    fn detects_real_differences() {
        assert!(!sql_equals("SELECT a FROM t", "SELECT b FROM t"));
    }

    #[test]
    fn ignores_backtick_quoting_differences() {
        assert!(sql_equals("SELECT `a` FROM `t`", "SELECT a FROM t"));
    }
}
