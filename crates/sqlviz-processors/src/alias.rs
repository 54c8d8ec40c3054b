// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Attaches canonical aliases to binned/aggregated axes (overwriting any
//! user-supplied alias there) and to unparsed axes that don't already carry
//! one. Grounded on `deepdive/viz/processor/alias_processor.py`.

use sqlviz_ir::VizSpec;

use crate::pipeline::VizSpecProcessor;

/// - A binned x-axis always gets `<name>_<TIME_UNIT>` (datetime) or
///   `<name>_bins` (numeric), overwriting any existing alias.
/// - An unparsed x-axis with no alias gets `computed_x_axis`.
/// - An aggregated y-axis always gets `<AGG>_<name>` (`*` reads as `ROWS`,
///   so `COUNT(*)` becomes `COUNT_ROWS`), overwriting any existing alias.
/// - An unparsed y-axis with no alias gets a stable `computed_column_N`,
///   numbered by its position among the unparsed y-axes.
pub struct AliasProcessor;

impl VizSpecProcessor for AliasProcessor {
    fn process(&self, mut spec: VizSpec) -> Option<VizSpec> {
        if let Some(x_axis) = spec.x_axis.as_mut() {
            if let Some(binner) = &x_axis.binner {
                let suffix = match binner.time_unit {
                    Some(time_unit) => time_unit.upper().to_string(),
                    None => "bins".to_string(),
                };
                x_axis.alias = Some(format!("{}_{}", x_axis.name, suffix));
            } else if x_axis.unparsed && x_axis.alias.is_none() {
                x_axis.alias = Some("computed_x_axis".to_string());
            }
        }

        let mut computed_column = 0;
        for y_axis in spec.y_axes.iter_mut() {
            if let Some(aggregation) = y_axis.aggregation {
                let subject = if y_axis.name == "*" { "ROWS" } else { &y_axis.name };
                y_axis.alias = Some(format!("{}_{}", aggregation.as_str(), subject));
            } else if y_axis.unparsed && y_axis.alias.is_none() {
                computed_column += 1;
                y_axis.alias = Some(format!("computed_column_{computed_column}"));
            }
        }

        Some(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlviz_ir::{Aggregation, Binner, TimeUnit, VizSpecParams, XAxis, YAxis};

    #[test]
    fn binned_x_axis_gets_name_time_unit_alias() {
        let mut x_axis = XAxis::new("started_at");
        x_axis.binner = Some(Binner::datetime(TimeUnit::Day));
        let spec = VizSpec::new(VizSpecParams {
            x_axis: Some(x_axis),
            y_axes: vec![YAxis::new("*")],
            ..Default::default()
        })
        .unwrap();
        let spec = AliasProcessor.process(spec).unwrap();
        assert_eq!(spec.x_axis.unwrap().alias.as_deref(), Some("started_at_DAY"));
    }

    #[test]
    fn count_star_gets_rows_alias() {
        let spec = VizSpec::new(VizSpecParams {
            y_axes: vec![YAxis {
                name: "*".into(),
                aggregation: Some(Aggregation::Count),
                ..Default::default()
            }],
            ..Default::default()
        })
        .unwrap();
        let spec = AliasProcessor.process(spec).unwrap();
        assert_eq!(spec.y_axes[0].alias.as_deref(), Some("COUNT_ROWS"));
    }

    #[test]
    fn aggregated_y_axis_overwrites_an_existing_alias() {
        let spec = VizSpec::new(VizSpecParams {
            y_axes: vec![YAxis {
                name: "b".into(),
                aggregation: Some(Aggregation::Sum),
                alias: Some("some_alias".into()),
                ..Default::default()
            }],
            ..Default::default()
        })
        .unwrap();
        let spec = AliasProcessor.process(spec).unwrap();
        assert_eq!(spec.y_axes[0].alias.as_deref(), Some("SUM_b"));
    }

    #[test]
    fn binned_x_axis_overwrites_an_existing_alias() {
        let mut x_axis = XAxis::new("a");
        x_axis.binner = Some(Binner::datetime(TimeUnit::Day));
        x_axis.alias = Some("something_here".into());
        let spec = VizSpec::new(VizSpecParams {
            x_axis: Some(x_axis),
            y_axes: vec![YAxis::new("*")],
            ..Default::default()
        })
        .unwrap();
        let spec = AliasProcessor.process(spec).unwrap();
        assert_eq!(spec.x_axis.unwrap().alias.as_deref(), Some("a_DAY"));
    }

    #[test]
    fn numeric_binned_x_axis_gets_bins_suffix() {
        let mut x_axis = XAxis::new("amount");
        x_axis.binner = Some(Binner::numeric(10).unwrap());
        let spec = VizSpec::new(VizSpecParams {
            x_axis: Some(x_axis),
            y_axes: vec![YAxis::new("*")],
            ..Default::default()
        })
        .unwrap();
        let spec = AliasProcessor.process(spec).unwrap();
        assert_eq!(spec.x_axis.unwrap().alias.as_deref(), Some("amount_bins"));
    }

    #[test]
    fn unparsed_y_axis_existing_alias_is_left_untouched() {
        let spec = VizSpec::new(VizSpecParams {
            y_axes: vec![YAxis {
                name: "a + b".into(),
                unparsed: true,
                alias: Some("computed".into()),
                ..Default::default()
            }],
            ..Default::default()
        })
        .unwrap();
        let spec = AliasProcessor.process(spec).unwrap();
        assert_eq!(spec.y_axes[0].alias.as_deref(), Some("computed"));
    }

    #[test]
    fn unparsed_y_axes_get_numbered_computed_aliases() {
        let spec = VizSpec::new(VizSpecParams {
            y_axes: vec![
                YAxis {
                    name: "a + b".into(),
                    unparsed: true,
                    ..Default::default()
                },
                YAxis {
                    name: "c * 2".into(),
                    unparsed: true,
                    ..Default::default()
                },
            ],
            ..Default::default()
        })
        .unwrap();
        let spec = AliasProcessor.process(spec).unwrap();
        assert_eq!(spec.y_axes[0].alias.as_deref(), Some("computed_column_1"));
        assert_eq!(spec.y_axes[1].alias.as_deref(), Some("computed_column_2"));
    }
}
