// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Term
//!
//! `Term` is the tagged-variant expression tree every SQL fragment this
//! crate touches is eventually parsed into: a single column reference, a
//! literal, a function call, a `CASE`, a boolean predicate, or an analytic
//! window call. Every SELECT/WHERE/HAVING/GROUP BY/ORDER BY fragment is one
//! `Term`.
//!
//! Any input that does not fit the grammar parses to `Term::Unparsed`
//! instead of failing: the expression parser never rejects a fragment
//! outright, it degrades to carrying the original source text.

use serde::{Deserialize, Serialize};

/// A single literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// Binary comparison and arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Concat,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    Like,
    NotLike,
    ILike,
    NotILike,
    Is,
    IsNot,
}

/// A window (analytic) function's `OVER (...)` clause.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowSpec {
    pub partition_by: Vec<Term>,
    pub order_by: Vec<(Term, bool)>,
    pub ignore_nulls: bool,
}

/// A single node of a parsed SQL expression.
///
/// Every variant carries its own `alias`, set when the fragment was
/// followed by `AS <name>` (case-insensitively matched, per the original
/// grammar). `alias` is `None` unless the fragment is itself an aliased
/// select item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Term {
    /// A bare `*`, or `table.*`.
    Star { table: Option<String> },

    /// A column reference, optionally table-qualified: `col`, `t.col`.
    Field {
        table: Option<String>,
        name: String,
        alias: Option<String>,
    },

    Literal { value: Literal, alias: Option<String> },

    BinaryOp {
        left: Box<Term>,
        op: BinaryOp,
        right: Box<Term>,
        alias: Option<String>,
    },

    Not { term: Box<Term>, alias: Option<String> },

    /// `expr IN (a, b, c)` / `expr NOT IN (...)`.
    In {
        term: Box<Term>,
        list: Vec<Term>,
        negate: bool,
        alias: Option<String>,
    },

    /// `expr BETWEEN lo AND hi` / `expr NOT BETWEEN lo AND hi`.
    Between {
        term: Box<Term>,
        low: Box<Term>,
        high: Box<Term>,
        negate: bool,
        alias: Option<String>,
    },

    /// `expr IS NULL` / `expr IS NOT NULL`.
    IsNull {
        term: Box<Term>,
        negate: bool,
        alias: Option<String>,
    },

    /// A plain (non-aggregate) function call: `UPPER(name)`.
    Function {
        name: String,
        args: Vec<Term>,
        distinct: bool,
        alias: Option<String>,
    },

    /// One of the aggregate function names (`COUNT`, `SUM`, `SUM_FLOAT`,
    /// `MIN`, `MAX`, `AVG`, `STD`, `STDDEV`, `APPROXIMATE_PERCENTILE`).
    Aggregate {
        name: String,
        args: Vec<Term>,
        distinct: bool,
        /// The `PERCENTILE = <n>` parameter for `APPROXIMATE_PERCENTILE`.
        percentile: Option<f64>,
        alias: Option<String>,
    },

    Cast {
        term: Box<Term>,
        type_name: String,
        alias: Option<String>,
    },

    /// `EXTRACT(<date_part> FROM expr)`.
    Extract {
        date_part: String,
        term: Box<Term>,
        alias: Option<String>,
    },

    Case {
        conditions: Vec<Term>,
        results: Vec<Term>,
        else_result: Option<Box<Term>>,
        alias: Option<String>,
    },

    /// `fn(args) OVER (PARTITION BY ... ORDER BY ...) [IGNORE NULLS]`,
    /// or the no-OVER `IGNORE NULLS` shorthand (`window` is `None` in that
    /// case; `ignore_nulls` is tracked on the inner function call too).
    Analytic {
        function: Box<Term>,
        window: Option<WindowSpec>,
        alias: Option<String>,
    },

    Paren { term: Box<Term>, alias: Option<String> },

    /// A fragment the parser could not make sense of. Carries the raw
    /// source text so round-tripping and serialization still work.
    Unparsed { raw: String, alias: Option<String> },
}

impl Term {
    pub fn field(name: impl Into<String>) -> Self {
        Term::Field {
            table: None,
            name: name.into(),
            alias: None,
        }
    }

    pub fn star() -> Self {
        Term::Star { table: None }
    }

    pub fn alias(&self) -> Option<&str> {
        match self {
            Term::Star { .. } => None,
            Term::Field { alias, .. }
            | Term::Literal { alias, .. }
            | Term::BinaryOp { alias, .. }
            | Term::Not { alias, .. }
            | Term::In { alias, .. }
            | Term::Between { alias, .. }
            | Term::IsNull { alias, .. }
            | Term::Function { alias, .. }
            | Term::Aggregate { alias, .. }
            | Term::Cast { alias, .. }
            | Term::Extract { alias, .. }
            | Term::Case { alias, .. }
            | Term::Analytic { alias, .. }
            | Term::Paren { alias, .. }
            | Term::Unparsed { alias, .. } => alias.as_deref(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        let alias = Some(alias.into());
        match &mut self {
            Term::Star { .. } => {}
            Term::Field { alias: a, .. }
            | Term::Literal { alias: a, .. }
            | Term::BinaryOp { alias: a, .. }
            | Term::Not { alias: a, .. }
            | Term::In { alias: a, .. }
            | Term::Between { alias: a, .. }
            | Term::IsNull { alias: a, .. }
            | Term::Function { alias: a, .. }
            | Term::Aggregate { alias: a, .. }
            | Term::Cast { alias: a, .. }
            | Term::Extract { alias: a, .. }
            | Term::Case { alias: a, .. }
            | Term::Analytic { alias: a, .. }
            | Term::Paren { alias: a, .. }
            | Term::Unparsed { alias: a, .. } => *a = alias,
        }
        self
    }

    /// Clears whatever alias this term carries, leaving everything else
    /// untouched.
    pub fn with_alias_cleared(mut self) -> Self {
        match &mut self {
            Term::Star { .. } => {}
            Term::Field { alias: a, .. }
            | Term::Literal { alias: a, .. }
            | Term::BinaryOp { alias: a, .. }
            | Term::Not { alias: a, .. }
            | Term::In { alias: a, .. }
            | Term::Between { alias: a, .. }
            | Term::IsNull { alias: a, .. }
            | Term::Function { alias: a, .. }
            | Term::Aggregate { alias: a, .. }
            | Term::Cast { alias: a, .. }
            | Term::Extract { alias: a, .. }
            | Term::Case { alias: a, .. }
            | Term::Analytic { alias: a, .. }
            | Term::Paren { alias: a, .. }
            | Term::Unparsed { alias: a, .. } => *a = None,
        }
        self
    }

    /// `true` for a bare `*` (optionally table-qualified).
    pub fn is_star(&self) -> bool {
        matches!(self, Term::Star { .. })
    }

    /// The inner column path (`table.col` or `col`), for `Field` terms.
    pub fn field_path(&self) -> Option<String> {
        match self {
            Term::Field {
                table: Some(table),
                name,
                ..
            } => Some(format!("{table}.{name}")),
            Term::Field { table: None, name, .. } => Some(name.clone()),
            _ => None,
        }
    }

    /// Strips a `Paren` wrapper, if present, otherwise returns self.
    pub fn unwrap_paren(&self) -> &Term {
        match self {
            Term::Paren { term, .. } => term.unwrap_paren(),
            other => other,
        }
    }

    /// True for the names in `deepdive`'s `AGGREGATE_FUNCTION_NAMES`.
    pub fn is_aggregate_name(name: &str) -> bool {
        matches!(
            name.to_ascii_uppercase().as_str(),
            "COUNT" | "SUM" | "SUM_FLOAT" | "MIN" | "MAX" | "AVG" | "STD" | "STDDEV" | "APPROXIMATE_PERCENTILE"
        )
    }

    /// Whether this term is a function call (plain or aggregate), looking
    /// through a trailing `Paren`.
    pub fn is_function(&self) -> bool {
        match self {
            Term::Function { .. } | Term::Aggregate { .. } | Term::Analytic { .. } => true,
            Term::Paren { term, .. } => term.is_function(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_has_no_alias_by_default() {
        let t = Term::field("revenue");
        assert_eq!(t.alias(), None);
    }

    #[test]
    fn with_alias_sets_alias_through_any_variant() {
        let t = Term::field("revenue").with_alias("rev");
        assert_eq!(t.alias(), Some("rev"));
    }

    #[test]
    fn star_alias_is_always_none() {
        let t = Term::star().with_alias("x");
        assert_eq!(t.alias(), None);
    }

    #[test]
    fn aggregate_name_matching_is_case_insensitive() {
        assert!(Term::is_aggregate_name("count"));
        assert!(Term::is_aggregate_name("SUM"));
        assert!(!Term::is_aggregate_name("UPPER"));
    }

    #[test]
    fn is_function_looks_through_paren() {
        let f = Term::Function {
            name: "UPPER".into(),
            args: vec![Term::field("name")],
            distinct: false,
            alias: None,
        };
        let wrapped = Term::Paren {
            term: Box::new(f),
            alias: None,
        };
        assert!(wrapped.is_function());
    }
}
