// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Infers a chart type from the shape of a `VizSpec`. Grounded on
//! `deepdive/viz/processor/viz_type_processor.py::VizTypeProcessor`.
//!
//! `viz_type` is advisory, not authoritative (spec.md §3) — this pass
//! overwrites whatever default the constructor chose, it never fails.

use sqlviz_ir::{BinnerType, ColumnType, DatabaseSchema, VizSpec, VizType};

use crate::pipeline::VizSpecProcessor;

/// - No x-axis, or 2+ breakdowns → `table`.
/// - x-axis is a date/datetime-binned column with no breakdowns → `line`.
/// - x-axis is a numeric column with at most one breakdown → `line`.
/// - otherwise → `bar`.
pub struct VizTypeProcessor<'a> {
    schema: &'a DatabaseSchema,
}

impl<'a> VizTypeProcessor<'a> {
    pub fn new(schema: &'a DatabaseSchema) -> Self {
        VizTypeProcessor { schema }
    }

    fn column_type(&self, column_name: &str) -> Option<ColumnType> {
        self.schema
            .tables
            .iter()
            .find_map(|table| table.get_column(column_name))
            .map(|column| column.column_type)
    }
}

impl<'a> VizSpecProcessor for VizTypeProcessor<'a> {
    fn process(&self, mut spec: VizSpec) -> Option<VizSpec> {
        spec.viz_type = self.infer(&spec);
        Some(spec)
    }
}

impl<'a> VizTypeProcessor<'a> {
    fn infer(&self, spec: &VizSpec) -> VizType {
        let Some(x_axis) = &spec.x_axis else {
            return VizType::Table;
        };
        if spec.breakdowns.len() >= 2 {
            return VizType::Table;
        }

        let is_datetime_binned = x_axis
            .binner
            .as_ref()
            .is_some_and(|binner| binner.binner_type == BinnerType::Datetime);
        let column_type = self.column_type(&x_axis.name);
        let is_date_column = matches!(column_type, Some(ColumnType::Date) | Some(ColumnType::Time));

        if (is_datetime_binned || is_date_column) && spec.breakdowns.is_empty() {
            return VizType::Line;
        }

        let is_numeric_column = matches!(column_type, Some(ColumnType::Int) | Some(ColumnType::Float));
        if is_numeric_column && spec.breakdowns.len() <= 1 {
            return VizType::Line;
        }

        VizType::Bar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlviz_ir::{Binner, Breakdown, TimeUnit, VizSpecParams, XAxis};
    use sqlviz_test_utils::SchemaFixtures;

    #[test]
    fn no_x_axis_is_table() {
        let schema = SchemaFixtures::orders_schema();
        let spec = VizSpec::new(VizSpecParams::default()).unwrap();
        let spec = VizTypeProcessor::new(&schema).process(spec).unwrap();
        assert_eq!(spec.viz_type, VizType::Table);
    }

    #[test]
    fn two_breakdowns_is_table() {
        let schema = SchemaFixtures::orders_schema();
        let spec = VizSpec::new(VizSpecParams {
            x_axis: Some(XAxis::new("status")),
            breakdowns: vec![Breakdown::new("region"), Breakdown::new("product_id")],
            ..Default::default()
        })
        .unwrap();
        let spec = VizTypeProcessor::new(&schema).process(spec).unwrap();
        assert_eq!(spec.viz_type, VizType::Table);
    }

    #[test]
    fn datetime_binned_x_axis_no_breakdowns_is_line() {
        let schema = SchemaFixtures::orders_schema();
        let mut x_axis = XAxis::new("created_at");
        x_axis.binner = Some(Binner::datetime(TimeUnit::Day));
        let spec = VizSpec::new(VizSpecParams {
            x_axis: Some(x_axis),
            ..Default::default()
        })
        .unwrap();
        let spec = VizTypeProcessor::new(&schema).process(spec).unwrap();
        assert_eq!(spec.viz_type, VizType::Line);
    }

    #[test]
    fn plain_categorical_x_axis_is_bar() {
        let schema = SchemaFixtures::orders_schema();
        let spec = VizSpec::new(VizSpecParams {
            x_axis: Some(XAxis::new("status")),
            ..Default::default()
        })
        .unwrap();
        let spec = VizTypeProcessor::new(&schema).process(spec).unwrap();
        assert_eq!(spec.viz_type, VizType::Bar);
    }

    #[test]
    fn numeric_x_axis_with_one_breakdown_is_line() {
        let schema = SchemaFixtures::orders_schema();
        let spec = VizSpec::new(VizSpecParams {
            x_axis: Some(XAxis::new("total")),
            breakdowns: vec![Breakdown::new("status")],
            ..Default::default()
        })
        .unwrap();
        let spec = VizTypeProcessor::new(&schema).process(spec).unwrap();
        assert_eq!(spec.viz_type, VizType::Line);
    }
}
