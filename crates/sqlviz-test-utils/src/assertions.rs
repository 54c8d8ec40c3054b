// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Loose SQL-string comparison for tests that only care about a query's
//! shape, not its exact formatting. Grounded on `sql_test_case.py`'s
//! `assert_sql_str_equal`, which normalizes both sides before comparing so
//! whitespace and quoting differences don't fail a test.
//!
//! This is deliberately coarser than `sqlviz_serializer::sql_equals` (no
//! keyword/aggregate-name lowering table): it exists for crates below
//! `sqlviz-serializer` in the dependency graph (the parser, generator, and
//! compiler) whose tests compare fixture strings, not rendered SQL.

use sqlviz_lexer::sanitize_query;

/// Compares two SQL strings after sanitizing and lowercasing both, so
/// `SELECT a FROM t` and `select   a   from   t` are considered equal.
pub fn assert_sql_str_eq(expected: &str, actual: &str) {
    let normalize = |s: &str| sanitize_query(s).to_ascii_lowercase();
    let expected_norm = normalize(expected);
    let actual_norm = normalize(actual);
    assert_eq!(
        expected_norm, actual_norm,
        "SQL strings differ after normalization:\n  expected: {expected}\n  actual:   {actual}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_whitespace_and_case_differences() {
        assert_sql_str_eq("SELECT a FROM t", "select   a\nfrom   t");
    }

    #[test]
    #[should_panic(expected = "SQL strings differ")]
    fn still_catches_real_differences() {
        assert_sql_str_eq("SELECT a FROM t", "SELECT b FROM t");
    }
}
