// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL dialects
//!
//! The four targets the interpreter core round-trips between. Unlike the
//! teacher's family/extension model, these dialects have no shared grammar
//! beyond what `sqlviz-parser` already treats as universal — each one
//! diverges individually in its generator, compiler, and serializer, so
//! there is no `DialectFamily`/`supports()` concept here.

use serde::{Deserialize, Serialize};

/// A target SQL dialect: drives generator/compiler/serializer dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlDialect {
    Sqlite,
    Snowflake,
    MySql,
    GoogleSql,
}

impl Default for SqlDialect {
    /// Matches `deepdive.sql.parser.sql_tree.SqlTree.sql_dialect`'s default.
    fn default() -> Self {
        SqlDialect::Sqlite
    }
}

impl SqlDialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlDialect::Sqlite => "Sqlite",
            SqlDialect::Snowflake => "Snowflake",
            SqlDialect::MySql => "MySQL",
            SqlDialect::GoogleSql => "GoogleSQL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dialect_is_sqlite() {
        assert_eq!(SqlDialect::default(), SqlDialect::Sqlite);
    }
}
