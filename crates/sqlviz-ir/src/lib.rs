// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlviz-ir
//!
//! The data model shared by every other crate in this workspace: the
//! expression tree (`Term`), the structured SELECT representation
//! (`SqlTree`), the declarative chart description (`VizSpec`), and the
//! in-memory database schema the generator/compiler/processors consult.
//!
//! This crate holds no parsing or rendering logic — see `sqlviz-lexer`,
//! `sqlviz-parser`, and `sqlviz-serializer` for that. It is pure data: every
//! type here is `Clone`, structurally comparable, and `serde`-round-trippable,
//! since `VizSpec` is the wire format between the core and a UI (spec.md §6).

pub mod dialect;
pub mod schema;
pub mod sql_tree;
pub mod term;
pub mod vizspec;

pub use dialect::SqlDialect;
pub use schema::{ColumnSchema, ColumnType, DatabaseSchema, ForeignKey, TableSchema};
pub use sql_tree::{Join, OrderBy, SortDirection, SqlTree, TableRef};
pub use term::{BinaryOp, Literal, Term, WindowSpec};
pub use vizspec::{
    Aggregation, Binner, BinnerType, Breakdown, Domain, DomainLimit, Filter, SortBy, TimeUnit,
    VizSpec, VizSpecError, VizSpecErrorKind, VizSpecParams, VizType, XAxis, YAxis,
};
