// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Adds any table a referenced column lives in but that isn't already part
//! of `VizSpec.tables`. Grounded on
//! `deepdive/viz/processor/tables_processor.py::TablesProcessor`.

use sqlviz_ir::{DatabaseSchema, VizSpec};

use crate::pipeline::VizSpecProcessor;

/// Walks every column name referenced by an axis, breakdown, or filter; for
/// each one not already covered by `tables`, looks up the first schema
/// table (not yet in `tables`) that declares that column and appends it.
///
/// Never drops the spec — an unresolvable column is left as-is, matching
/// the original's `if table_name: ... ` guard (columns with no owning
/// table just don't extend `tables`).
pub struct TablesProcessor<'a> {
    schema: &'a DatabaseSchema,
}

impl<'a> TablesProcessor<'a> {
    pub fn new(schema: &'a DatabaseSchema) -> Self {
        TablesProcessor { schema }
    }

    fn owning_table(&self, column_name: &str, tables: &[String]) -> Option<String> {
        self.schema
            .tables
            .iter()
            .find(|table| !tables.contains(&table.name) && table.get_column(column_name).is_some())
            .map(|table| table.name.clone())
    }
}

impl<'a> VizSpecProcessor for TablesProcessor<'a> {
    fn process(&self, mut spec: VizSpec) -> Option<VizSpec> {
        let mut referenced = spec.all_columns();
        referenced.extend(spec.filter_columns());
        referenced.retain(|name| name != "*");

        for column_name in referenced {
            if let Some(table_name) = self.owning_table(&column_name, &spec.tables) {
                spec.tables.push(table_name);
            }
        }

        Some(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlviz_test_utils::SchemaFixtures;
    use sqlviz_ir::{VizSpecParams, XAxis};

    #[test]
    fn adds_owning_table_for_referenced_column() {
        let schema = SchemaFixtures::orders_schema();
        let spec = VizSpec::new(VizSpecParams {
            x_axis: Some(XAxis::new("region")),
            ..Default::default()
        })
        .unwrap();
        let spec = TablesProcessor::new(&schema).process(spec).unwrap();
        assert_eq!(spec.tables, vec!["customers".to_string()]);
    }

    #[test]
    fn does_not_duplicate_an_already_present_table() {
        let schema = SchemaFixtures::orders_schema();
        let spec = VizSpec::new(VizSpecParams {
            x_axis: Some(XAxis::new("region")),
            tables: vec!["customers".to_string()],
            ..Default::default()
        })
        .unwrap();
        let spec = TablesProcessor::new(&schema).process(spec).unwrap();
        assert_eq!(spec.tables, vec!["customers".to_string()]);
    }

    #[test]
    fn leaves_unresolvable_column_without_adding_a_table() {
        let schema = SchemaFixtures::orders_schema();
        let spec = VizSpec::new(VizSpecParams {
            x_axis: Some(XAxis::new("nonexistent_column")),
            ..Default::default()
        })
        .unwrap();
        let spec = TablesProcessor::new(&schema).process(spec).unwrap();
        assert!(spec.tables.is_empty());
    }
}
