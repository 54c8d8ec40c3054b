// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SqlTree
//!
//! The structured intermediate representation of a single SELECT statement.
//! Grounded on `deepdive.sql.parser.sql_tree.SqlTree`'s field layout, built
//! in the `crates/ir/src/query.rs`-style builder convention (plain structs
//! with small `with_*`/`add_*` constructors rather than a pydantic model).

use serde::{Deserialize, Serialize};

use crate::dialect::SqlDialect;
use crate::term::Term;

/// A table reference appearing in `FROM`/`JOIN`: `orders`, `orders AS o`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub name: String,
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        TableRef {
            name: name.into(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// The name a generator/processor should use when resolving columns:
    /// table aliases are stripped on round-trip (spec.md §9).
    pub fn resolved_name(&self) -> &str {
        &self.name
    }
}

/// A single `JOIN <table> ON <criterion>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub table: TableRef,
    pub on: Term,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub term: Term,
    pub direction: SortDirection,
}

/// The structured form of a parsed (or about-to-be-compiled) SELECT.
///
/// Invariant (spec.md §3): if any `select_terms` entry is `Term::Star`, the
/// serializer collapses the whole select list down to a bare `*` — this
/// tree itself does not enforce that, `sqlviz-serializer` applies the
/// collapse rule at render time (and the compiler applies it when building
/// the tree, matching `BaseCompiler._sanitize_tree`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SqlTree {
    pub dialect: SqlDialect,
    pub select_terms: Vec<Term>,
    pub from_term: Option<TableRef>,
    pub joins: Vec<Join>,
    pub where_term: Option<Term>,
    pub having_term: Option<Term>,
    pub groupby_terms: Vec<Term>,
    pub orderby: Option<OrderBy>,
    pub limit: Option<i64>,
}

impl SqlTree {
    pub fn new(dialect: SqlDialect) -> Self {
        SqlTree {
            dialect,
            ..Default::default()
        }
    }

    pub fn add_select_term(&mut self, term: Term) {
        self.select_terms.push(term);
    }

    pub fn add_groupby_term(&mut self, term: Term) {
        self.groupby_terms.push(term);
    }

    /// Every table this tree touches, FROM first, then each JOIN in order.
    pub fn tables(&self) -> Vec<&str> {
        let mut tables = Vec::new();
        if let Some(from) = &self.from_term {
            tables.push(from.resolved_name());
        }
        tables.extend(self.joins.iter().map(|j| j.table.resolved_name()));
        tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_lists_from_then_joins_in_order() {
        let mut tree = SqlTree::new(SqlDialect::Sqlite);
        tree.from_term = Some(TableRef::new("customer"));
        tree.joins.push(Join {
            table: TableRef::new("orders"),
            on: Term::field("x"),
        });
        assert_eq!(tree.tables(), vec!["customer", "orders"]);
    }

    #[test]
    fn default_dialect_is_sqlite() {
        let tree = SqlTree::default();
        assert_eq!(tree.dialect, SqlDialect::Sqlite);
        assert!(tree.select_terms.is_empty());
    }
}
