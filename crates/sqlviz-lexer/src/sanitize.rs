// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Sanitization
//!
//! Text-level normalization that runs *before* tokenization, grounded on
//! `deepdive/sql/util.py`'s `sanitize_query`. The original swaps double
//! quotes for backticks so that a query written against Snowflake/GoogleSQL
//! quoting conventions can still be split and parsed by the SQLite-flavored
//! grammar, and collapses incidental whitespace so two queries that differ
//! only in formatting compare equal. Both rewrites must leave string
//! literals untouched, so the quote swap only looks at quotes it sees
//! outside of a `'...'` literal (equivalent to the original's
//! placeholder-and-restore approach, without needing a temporary marker
//! string that could itself collide with user input).

/// Replaces double quotes with backticks outside of string literals, and
/// collapses runs of whitespace to a single space.
pub fn sanitize_query(query: &str) -> String {
    collapse_whitespace(&swap_double_quotes(query))
}

fn swap_double_quotes(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    let mut chars = query.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                out.push(c);
                if in_string && chars.peek() == Some(&'\'') {
                    out.push(chars.next().unwrap());
                } else {
                    in_string = !in_string;
                }
            }
            '"' if !in_string => out.push('`'),
            other => out.push(other),
        }
    }
    out
}

fn collapse_whitespace(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    let mut last_was_space = false;
    for c in query.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swaps_double_quotes_for_backticks() {
        assert_eq!(
            sanitize_query(r#"select "Total Sales" from t"#),
            "select `Total Sales` from t"
        );
    }

    #[test]
    fn leaves_double_quotes_inside_string_literals_alone() {
        assert_eq!(
            sanitize_query(r#"select * from t where name = 'say "hi"'"#),
            r#"select * from t where name = 'say "hi"'"#
        );
    }

    #[test]
    fn collapses_internal_whitespace() {
        assert_eq!(
            sanitize_query("select   a,\n\tb\nfrom   t"),
            "select a, b from t"
        );
    }

    #[test]
    fn trims_leading_and_trailing_whitespace() {
        assert_eq!(sanitize_query("  select a  "), "select a");
    }

    #[test]
    fn handles_escaped_quotes_inside_string_literals() {
        assert_eq!(
            sanitize_query("select 'it''s \"quoted\"' from t"),
            "select 'it''s \"quoted\"' from t"
        );
    }
}
