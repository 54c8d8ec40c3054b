// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Drops a tree whose `FROM` table doesn't exist. Grounded on
//! `deepdive/sql/processor/filter_bad_queries_processor.py::FilterBadQueriesProcessor`.

use sqlviz_ir::{DatabaseSchema, SqlTree};

use crate::pipeline::SqlProcessor;

/// Drops the tree outright when `from_term` is absent or names a table the
/// schema doesn't have — a query against a table that was never real
/// can't be safely executed, so it never reaches the compiler/serializer.
pub struct FilterBadQueriesProcessor<'a> {
    schema: &'a DatabaseSchema,
}

impl<'a> FilterBadQueriesProcessor<'a> {
    pub fn new(schema: &'a DatabaseSchema) -> Self {
        FilterBadQueriesProcessor { schema }
    }
}

impl<'a> SqlProcessor for FilterBadQueriesProcessor<'a> {
    fn process(&self, tree: SqlTree) -> Option<SqlTree> {
        let from_term = tree.from_term.as_ref()?;
        if self.schema.get_table(&from_term.name).is_some() {
            Some(tree)
        } else {
            tracing::warn!(table = %from_term.name, "dropping query against unknown table");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlviz_ir::{SqlDialect, TableRef};
    use sqlviz_test_utils::SchemaFixtures;

    #[test]
    fn keeps_a_tree_whose_table_exists() {
        let schema = SchemaFixtures::orders_schema();
        let mut tree = SqlTree::new(SqlDialect::Sqlite);
        tree.from_term = Some(TableRef::new("customers"));
        assert!(FilterBadQueriesProcessor::new(&schema).process(tree).is_some());
    }

    #[test]
    fn drops_a_tree_against_an_unknown_table() {
        let schema = SchemaFixtures::orders_schema();
        let mut tree = SqlTree::new(SqlDialect::Sqlite);
        tree.from_term = Some(TableRef::new("nonexistent"));
        assert!(FilterBadQueriesProcessor::new(&schema).process(tree).is_none());
    }

    #[test]
    fn drops_a_tree_with_no_from_at_all() {
        let schema = SchemaFixtures::orders_schema();
        let tree = SqlTree::new(SqlDialect::Sqlite);
        assert!(FilterBadQueriesProcessor::new(&schema).process(tree).is_none());
    }
}
