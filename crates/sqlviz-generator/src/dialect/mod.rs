// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Per-dialect `x_axis`/binner inference, the one piece of the generator
//! that genuinely diverges by target dialect. Grounded on
//! `deepdive/viz/generator/{sqlite,bigquery,snowflake}_generator.py`,
//! module-per-dialect layout styled after
//! `crates/lowering/src/dialect/{mysql,postgresql}.rs`.

pub mod bigquery;
pub mod snowflake;
pub mod sqlite;

use sqlviz_ir::{SqlDialect, Term, XAxis};

/// Turns a `GROUP BY` term into an `XAxis`, inferring a [`sqlviz_ir::Binner`]
/// from dialect-specific date/time function calls where recognized.
///
/// Never fails: an unrecognized function call degrades to an unparsed
/// x-axis carrying the term's literal SQL text, the same fallback every
/// dialect generator's `else` branch reaches for in the original.
pub trait DialectGenerator {
    fn term_to_x_axis(&self, term: &Term) -> XAxis;
}

/// Picks the dialect generator matching a [`SqlDialect`]. `MySql` has no
/// dedicated viz generator in the original either — `compiler_helper.py`'s
/// `get_compiler` falls back to `SqliteCompiler` for anything it doesn't
/// explicitly recognize, so this does the same for the generator side.
pub fn for_dialect(dialect: SqlDialect) -> Box<dyn DialectGenerator> {
    match dialect {
        SqlDialect::Sqlite | SqlDialect::MySql => Box::new(sqlite::SqliteGenerator),
        SqlDialect::GoogleSql => Box::new(bigquery::BigQueryGenerator),
        SqlDialect::Snowflake => Box::new(snowflake::SnowflakeGenerator),
    }
}

/// Copies a term's alias (if any) onto an inferred x-axis. Every dialect
/// generator repeats this one assignment after its own dispatch in the
/// original; factored here since it is identical in each.
pub(crate) fn finish_x_axis(mut x_axis: XAxis, term: &Term) -> XAxis {
    if let Some(alias) = term.alias() {
        x_axis.alias = Some(alias.to_string());
    }
    x_axis
}

pub(crate) fn literal_str(term: &Term) -> Option<&str> {
    match term {
        Term::Literal {
            value: sqlviz_ir::Literal::String(s),
            ..
        } => Some(s),
        _ => None,
    }
}

pub(crate) fn field_name(term: &Term) -> Option<&str> {
    match term {
        Term::Field { name, .. } => Some(name),
        _ => None,
    }
}
