// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Database schema
//!
//! A plain in-memory description of the tables, columns, and foreign keys
//! the generator/compiler/processors consult. Grounded on `deepdive.schema`
//! (`DatabaseSchema`, `TableSchema`, `ColumnSchema`, `ForeignKey`), styled
//! after `crates/catalog/src/metadata.rs`'s struct conventions.
//!
//! There is no live-database `Catalog` trait here: database drivers are an
//! explicit Non-goal (spec.md §1), so this is a value, not an interface.

use serde::{Deserialize, Serialize};

use crate::dialect::SqlDialect;

/// Column data types the interpreter understands (§3's `ColumnSchema.type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Id,
    Text,
    Int,
    Float,
    Boolean,
    Date,
    Time,
    Record,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub column_type: ColumnType,
    pub comment: Option<String>,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        ColumnSchema {
            name: name.into(),
            column_type,
            comment: None,
        }
    }
}

/// A `primary_table.column` ↔ `reference_table.column` pair. Foreign keys
/// are bidirectional for join resolution (§4.7 / C7 step 7).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub primary: String,
    pub reference: String,
}

impl ForeignKey {
    pub fn new(primary: impl Into<String>, reference: impl Into<String>) -> Self {
        ForeignKey {
            primary: primary.into(),
            reference: reference.into(),
        }
    }

    /// The `table` half of a `table.column` path.
    pub fn table_of(path: &str) -> &str {
        path.split('.').next().unwrap_or(path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnSchema>) -> Self {
        TableSchema {
            name: name.into(),
            columns,
        }
    }

    pub fn get_column(&self, column_name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == column_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DatabaseSchema {
    pub tables: Vec<TableSchema>,
    pub primary_keys: Vec<String>,
    pub foreign_keys: Vec<ForeignKey>,
    pub dialect: SqlDialect,
}

impl DatabaseSchema {
    pub fn new(dialect: SqlDialect) -> Self {
        DatabaseSchema {
            tables: Vec::new(),
            primary_keys: Vec::new(),
            foreign_keys: Vec::new(),
            dialect,
        }
    }

    pub fn get_table(&self, table_name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name == table_name)
    }

    pub fn with_table(mut self, table: TableSchema) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }
}
