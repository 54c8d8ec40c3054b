// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Per-dialect `x_axis`/binner emission, the inverse of
//! `sqlviz-generator::dialect`. Grounded on
//! `deepdive/viz/compiler/{sqlite,bigquery,snowflake}_compiler.py`.

pub mod bigquery;
pub mod snowflake;
pub mod sqlite;

use sqlviz_ir::{DomainLimit, SqlDialect, Term, XAxis};

use crate::error::CompileResult;

/// Turns an [`XAxis`] back into a [`Term`], expanding its binner (if any)
/// into the dialect's bucketing function call.
///
/// `x_axis_to_where` is the one other per-dialect override point, needed
/// only by BigQuery: its `WHERE` clause cannot reference a `SELECT`-list
/// alias, so it must recompute the x-axis term with the alias suppressed
/// rather than reuse the alias every other dialect prefers.
pub trait DialectCompiler {
    fn x_axis_to_term(&self, x_axis: &XAxis) -> CompileResult<Term>;

    fn x_axis_to_where(&self, x_axis: &XAxis, term_or_alias: &Term) -> CompileResult<Option<Term>> {
        Ok(domain_to_where(&x_axis.domain, term_or_alias))
    }
}

/// Picks the dialect compiler matching a [`SqlDialect`]. `MySql` has no
/// dedicated compiler in the original either — `compiler_helper.py`'s
/// `get_compiler` falls back to `SqliteCompiler` for anything it doesn't
/// explicitly recognize, so this does the same.
pub fn for_dialect(dialect: SqlDialect) -> Box<dyn DialectCompiler> {
    match dialect {
        SqlDialect::Sqlite | SqlDialect::MySql => Box::new(sqlite::SqliteCompiler),
        SqlDialect::GoogleSql => Box::new(bigquery::BigQueryCompiler),
        SqlDialect::Snowflake => Box::new(snowflake::SnowflakeCompiler),
    }
}

/// Shared `BaseCompiler.x_axis_to_where`/`filter_to_where`-style domain
/// lowering: `BETWEEN` when both bounds are set, `>`/`<` when only one is.
pub(crate) fn domain_to_where(
    domain: &Option<sqlviz_ir::Domain>,
    term: &Term,
) -> Option<Term> {
    let (low, high) = domain.as_ref()?;
    match (low, high) {
        (Some(low), Some(high)) => Some(Term::Between {
            term: Box::new(term.clone()),
            low: Box::new(domain_limit_term(low)),
            high: Box::new(domain_limit_term(high)),
            negate: false,
            alias: None,
        }),
        (Some(low), None) => Some(Term::BinaryOp {
            left: Box::new(term.clone()),
            op: sqlviz_ir::BinaryOp::GtEq,
            right: Box::new(domain_limit_term(low)),
            alias: None,
        }),
        (None, Some(high)) => Some(Term::BinaryOp {
            left: Box::new(term.clone()),
            op: sqlviz_ir::BinaryOp::LtEq,
            right: Box::new(domain_limit_term(high)),
            alias: None,
        }),
        (None, None) => None,
    }
}

pub(crate) fn domain_limit_term(limit: &DomainLimit) -> Term {
    let value = match limit {
        DomainLimit::Int(i) => sqlviz_ir::Literal::Integer(*i),
        DomainLimit::Float(f) => sqlviz_ir::Literal::Float(*f),
        DomainLimit::Text(s) => sqlviz_ir::Literal::String(s.clone()),
    };
    Term::Literal { value, alias: None }
}
