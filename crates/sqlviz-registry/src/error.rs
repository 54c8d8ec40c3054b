// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Error taxonomy for the composition root. Wraps each stage's own error
//! type (parse-fatal, generator-mismatch, compile-time per spec.md §7) and
//! adds the two outcomes that only exist once stages are wired together:
//! a tree the `SqlTree`-side pipeline dropped, and a query with no select
//! list to chart at all.

use thiserror::Error;

use sqlviz_compiler::CompileError;
use sqlviz_generator::GeneratorError;
use sqlviz_parser::ParseError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InterpretError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Generate(#[from] GeneratorError),

    /// `generate` returned `Ok(None)` — the query had no select list, so
    /// there is no chart to describe (spec.md §4.6 step "Input … Output …
    /// or none if no select terms").
    #[error("query has no select terms, nothing to chart")]
    NothingToChart,
}

pub type InterpretResult<T> = Result<T, InterpretError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// The `SqlTree`-side pipeline (`FilterBadQueriesProcessor`) dropped the
    /// compiled tree — e.g. the spec names a table the schema doesn't have.
    #[error("compiled query was dropped by the SQL-tree processor pipeline")]
    DroppedBySqlProcessors,
}

pub type RenderResult<T> = Result<T, RenderError>;
