// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Error taxonomy for this crate.
//!
//! Only [`GeneratorError::MultipleFunctionGroupbys`] ever escapes
//! [`crate::generate::generate`] — it is the one shape `base_generator.py`
//! itself treats as fatal (`raise ValueError("Multiple function terms...")`).
//! [`GeneratorError::UnknownBinnerFunction`] is raised internally by a
//! dialect's binner-inference helpers but never surfaces: the caller in
//! [`crate::dialect`] catches it, logs a `tracing::warn!`, and degrades to
//! an unparsed x-axis, the same fallback `sqlite_generator.py`/
//! `bigquery_generator.py`/`snowflake_generator.py` each reach for in their
//! `else` branch.

use thiserror::Error;

use sqlviz_ir::VizSpecError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeneratorError {
    #[error("multiple function-typed group-by terms, cannot pick an x-axis: {0:?}")]
    MultipleFunctionGroupbys(Vec<String>),

    #[error("could not infer a binner from function call: {0}")]
    UnknownBinnerFunction(String),

    /// The builder assembled a structurally invalid `VizSpec` — the one way
    /// `crate::generate::generate` itself can fail beyond the multi-function
    /// group-by case, surfacing `base_generator.py`'s implicit pydantic
    /// validation failures as a concrete error.
    #[error(transparent)]
    InvalidVizSpec(#[from] VizSpecError),
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;
