// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Term parser
//!
//! The public, infallible entry point for turning one raw expression
//! fragment into a [`Term`], grounded on `term_parser.py`'s `parse_term`.
//! A fragment wholly wrapped in quotes is treated as a bare identifier; an
//! `AS alias` suffix is split off before the remainder is handed to the
//! grammar; anything the grammar can't make sense of degrades to
//! `Term::Unparsed` rather than failing the caller.

use sqlviz_ir::Term;
use sqlviz_lexer::tokenize;

use crate::error::{ExprResult, ExprSyntaxError};
use crate::expr_parser;

/// Parses a single expression fragment. Never fails: an unparseable
/// fragment is carried as `Term::Unparsed` so callers (the statement
/// parser, the generator) can keep going.
pub fn parse_term(expr_str: &str) -> Term {
    let trimmed = expr_str.trim();

    if has_quotes(trimmed) {
        return Term::Field {
            table: None,
            name: strip_quotes(trimmed).to_string(),
            alias: None,
        };
    }

    if let Some(split_at) = find_top_level_as(trimmed) {
        let term_part = trimmed[..split_at].trim();
        let alias_part = strip_quotes(trimmed[split_at + 4..].trim());
        return match try_parse(term_part) {
            Ok(term) => term.with_alias(alias_part),
            Err(err) => {
                tracing::warn!(expr = term_part, %err, "failed to parse term, treating as literal");
                Term::Unparsed {
                    raw: term_part.to_string(),
                    alias: Some(alias_part.to_string()),
                }
            }
        };
    }

    match try_parse(trimmed) {
        Ok(term) => term,
        Err(err) => {
            tracing::warn!(expr = trimmed, %err, "failed to parse term, treating as literal");
            Term::Unparsed {
                raw: trimmed.to_string(),
                alias: None,
            }
        }
    }
}

fn try_parse(s: &str) -> ExprResult<Term> {
    let tokens = tokenize(s).map_err(|e| ExprSyntaxError(e.to_string()))?;
    expr_parser::parse(tokens)
}

pub(crate) fn has_quotes(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2
        && ((bytes[0] == b'\'' && bytes[bytes.len() - 1] == b'\'')
            || (bytes[0] == b'"' && bytes[bytes.len() - 1] == b'"')
            || (bytes[0] == b'`' && bytes[bytes.len() - 1] == b'`'))
}

pub(crate) fn strip_quotes(s: &str) -> &str {
    if has_quotes(s) {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Finds the last top-level (paren-depth 0, outside any quoted text)
/// occurrence of the literal substring `" as "` in `s`, returning the byte
/// offset of its leading space. Scanning for the *last* occurrence means a
/// nested alias inside a function call (`CAST(a AS INT) as total`) never
/// gets mistaken for the fragment's own alias.
fn find_top_level_as(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut depth: i32 = 0;
    let mut quote: Option<u8> = None;
    let mut last_match = None;
    let mut i = 0;

    while i < len {
        let c = bytes[i];
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match c {
            b'\'' | b'"' | b'`' => {
                quote = Some(c);
                i += 1;
            }
            b'(' => {
                depth += 1;
                i += 1;
            }
            b')' => {
                depth -= 1;
                i += 1;
            }
            b' ' if depth == 0
                && i + 3 < len
                && bytes[i + 1].to_ascii_lowercase() == b'a'
                && bytes[i + 2].to_ascii_lowercase() == b's'
                && bytes[i + 3] == b' ' =>
            {
                last_match = Some(i);
                i += 1;
            }
            _ => i += 1,
        }
    }

    last_match
}
