// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities shared across this workspace's crates.
//!
//! This crate provides common testing components, grounded on
//! `crates/test-utils`:
//! - Sample SQL queries and a sample [`sqlviz_ir::DatabaseSchema`]
//! - Loose SQL-string comparison for round-trip tests
//!
//! There is no mock CST builder here (this system has no CST) and no mock
//! catalog trait (database drivers are a Non-goal; `DatabaseSchema` is a
//! plain value, not a live connection).

pub mod assertions;
pub mod fixtures;

pub use assertions::assert_sql_str_eq;
pub use fixtures::{SchemaFixtures, SqlFixtures};
