// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlviz-processors
//!
//! The post-processing passes that run after the Generator and before the
//! Compiler, and the one pass that runs on a `SqlTree` before it is handed
//! to the database layer. Grounded on `deepdive/viz/processor/*.py`
//! (`AliasProcessor`, `TablesProcessor`, `VizTypeProcessor`,
//! `MultiVizSpecProcessor`) and `deepdive/sql/processor/*.py`
//! (`LimitProcessor`, `FilterBadQueriesProcessor`, `MultiSqlProcessor`).
//!
//! Each pass takes its value by ownership and returns it, or `None` to drop
//! it from the pipeline — matching the original's `Optional[VizSpec]`/
//! `Optional[SqlTree]` return types on every processor's `process` method.

pub mod alias;
pub mod filter_bad_queries;
pub mod limit;
pub mod pipeline;
pub mod repair;
pub mod tables;
pub mod viz_type;

pub use alias::AliasProcessor;
pub use filter_bad_queries::FilterBadQueriesProcessor;
pub use limit::LimitProcessor;
pub use pipeline::{MultiSqlProcessor, MultiVizSpecProcessor, SqlProcessor, VizSpecProcessor};
pub use repair::VizSpecRepair;
pub use tables::TablesProcessor;
pub use viz_type::VizTypeProcessor;
