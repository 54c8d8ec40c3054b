// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Error taxonomy for this crate. Expression-level failures never reach a
//! caller — [`crate::term_parser::parse_term`] always returns a `Term`,
//! degrading to `Term::Unparsed` on failure, the same as the original
//! `parse_term`'s broad `except Exception` fallback. Only statement-level
//! structural problems (not a `SELECT`, a `JOIN` missing its `ON`) are real
//! errors, matching spec's "parse-fatal" classification.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("cannot parse non-SELECT statement")]
    NotASelectStatement,

    #[error("cannot parse 2 or more SQL statements")]
    MultipleStatements,

    #[error("SELECT statement is missing a FROM clause")]
    MissingFromClause,

    #[error("invalid FROM clause: {0}")]
    InvalidFromClause(String),

    #[error("JOIN clause is missing its ON condition: {0}")]
    MalformedJoin(String),

    #[error("invalid LIMIT value: {0}")]
    InvalidLimit(String),

    #[error("SELECT list is empty")]
    EmptySelectList,
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Internal signal used by [`crate::expr_parser`] to abort a parse attempt;
/// never surfaces outside this crate. `term_parser` catches it and degrades
/// to `Term::Unparsed`, mirroring `TermParser.parse`'s bare `raise Exception`
/// on an incomplete grammar match.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ExprSyntaxError(pub String);

impl std::fmt::Display for ExprSyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "expression syntax error: {}", self.0)
    }
}

pub(crate) type ExprResult<T> = Result<T, ExprSyntaxError>;
