// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Error taxonomy for this crate. Grounded on `base_compiler.py`'s
//! `raise ValueError(...)` call sites — the one place the original treats
//! compilation as genuinely fatal rather than degrading.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompileError {
    /// `sqlite_compiler.py`/`snowflake_compiler.py`/`bigquery_complier.py`
    /// each raise `ValueError("Numeric binner currently unsupported!")` —
    /// no dialect emits a numeric bucketing function today.
    #[error("numeric binner currently unsupported for x-axis {0:?}")]
    NumericBinnerUnsupported(String),

    #[error("unsupported filter type: {0}")]
    UnsupportedFilterType(String),
}

pub type CompileResult<T> = Result<T, CompileError>;
