// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Raises a [`sqlviz_ir::VizSpec`] back into a
//! [`sqlviz_ir::SqlTree`], resolving joins from the schema's foreign keys
//! and emitting dialect-appropriate binner function calls. Grounded on
//! `deepdive/viz/compiler/base_compiler.py` and its per-dialect
//! subclasses.

pub mod binner_format;
pub mod compile;
pub mod dialect;
pub mod error;
pub mod helper;

pub use compile::{compile, construct_join_clauses, tables_to_joins, JoinClauses};
pub use error::{CompileError, CompileResult};
