// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlviz-serializer
//!
//! Turns a [`sqlviz_ir::SqlTree`] back into dialect SQL text, and compares
//! SQL text for equality independent of formatting. Grounded on
//! `deepdive.sql.parser.sql_tree.SqlTree.build_str` (which delegates to a
//! `pypika` `QueryBuilder` per dialect) and `deepdive.sql.parser.util`
//! (`sanitize_query`/`normalize_query`/`is_sql_str_equal`).
//!
//! `build_str` is `Optional[str]` in the original only because pydantic
//! types every method loosely; a `QueryBuilder` always produces a string
//! once a `from_term` is set, so [`render::serialize`] returns a plain
//! `String`.

pub mod normalize;
pub mod render;

pub use normalize::{normalize_query, sql_equals};
pub use render::{render_expr, serialize};
