// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Structural corrections applied to a `VizSpec` before the invariant
//! checks in `VizSpec::new` would otherwise reject it outright — e.g. a
//! UI-edited spec with a stray extra y-axis alongside a bare `*`.
//!
//! Grounded on spec.md §4.5's stated repair policy directly: the upstream
//! Python source for this step (`deepdive/viz/parser.py::parse_spec`) was
//! not captured in this retrieval, only its test file was, so the three
//! corrections below are exactly the ones spec.md names rather than a
//! reconstruction of untested behavior (see DESIGN.md).

use sqlviz_ir::{Aggregation, VizSpec, YAxis};

use crate::pipeline::VizSpecProcessor;

/// - Drops every y-axis but the bare `*` when one is present alongside
///   others (the `VizSpec::new` invariant would otherwise just reject the
///   whole spec; this repair makes it constructible).
/// - Infers a `COUNT(*)` y-axis when an x-axis or breakdown exists with no
///   y-axis at all — a chart needs *something* to measure.
/// - Drops a `sort_by` that no longer resolves to any axis, rather than
///   leaving the spec un-buildable.
pub struct VizSpecRepair;

impl VizSpecProcessor for VizSpecRepair {
    fn process(&self, mut spec: VizSpec) -> Option<VizSpec> {
        drop_extra_y_axes_if_star(&mut spec);
        infer_count_star_if_missing(&mut spec);
        drop_unresolvable_sort_by(&mut spec);
        Some(spec)
    }
}

fn drop_extra_y_axes_if_star(spec: &mut VizSpec) {
    if spec.y_axes.len() <= 1 {
        return;
    }
    if let Some(star) = spec.y_axes.iter().find(|y| y.is_bare_star()).cloned() {
        spec.y_axes = vec![star];
    }
}

fn infer_count_star_if_missing(spec: &mut VizSpec) {
    let has_axis = spec.x_axis.is_some() || !spec.breakdowns.is_empty();
    if has_axis && spec.y_axes.is_empty() {
        spec.y_axes.push(YAxis {
            name: "*".to_string(),
            aggregation: Some(Aggregation::Count),
            ..Default::default()
        });
    }
}

fn drop_unresolvable_sort_by(spec: &mut VizSpec) {
    let Some(sort_by) = &spec.sort_by else {
        return;
    };
    if sort_by.unparsed {
        return;
    }
    let has_star = spec.y_axes.iter().any(YAxis::is_bare_star);
    if has_star || spec.all_columns().contains(&sort_by.name) {
        return;
    }
    spec.sort_by = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlviz_ir::{SortBy, SortDirection, VizSpecParams, XAxis};

    #[test]
    fn drops_extra_y_axes_when_star_present() {
        let mut spec = spec_bypassing_validation(VizSpecParams {
            y_axes: vec![YAxis::new("*"), YAxis::new("b")],
            ..Default::default()
        });
        spec = VizSpecRepair.process(spec).unwrap();
        assert_eq!(spec.y_axes.len(), 1);
        assert_eq!(spec.y_axes[0].name, "*");
    }

    #[test]
    fn infers_count_star_when_x_axis_has_no_y_axis() {
        let spec = VizSpec::new(VizSpecParams {
            x_axis: Some(XAxis::new("status")),
            ..Default::default()
        })
        .unwrap();
        let spec = VizSpecRepair.process(spec).unwrap();
        assert_eq!(spec.y_axes.len(), 1);
        assert!(!spec.y_axes[0].is_bare_star());
        assert_eq!(spec.y_axes[0].aggregation, Some(Aggregation::Count));
    }

    #[test]
    fn drops_sort_by_that_no_longer_resolves() {
        let mut spec = spec_bypassing_validation(VizSpecParams {
            x_axis: Some(XAxis::new("status")),
            sort_by: Some(SortBy::new("gone", SortDirection::Asc)),
            ..Default::default()
        });
        spec = VizSpecRepair.process(spec).unwrap();
        assert!(spec.sort_by.is_none());
    }

    #[test]
    fn keeps_sort_by_that_resolves() {
        let spec = VizSpec::new(VizSpecParams {
            x_axis: Some(XAxis::new("status")),
            sort_by: Some(SortBy::new("status", SortDirection::Asc)),
            ..Default::default()
        })
        .unwrap();
        let spec = VizSpecRepair.process(spec).unwrap();
        assert!(spec.sort_by.is_some());
    }

    /// `VizSpec::new` would reject some fixtures above outright (that's the
    /// whole point of this module) — build the value directly the way a UI
    /// edit that bypasses the Rust constructor might hand it over.
    fn spec_bypassing_validation(params: VizSpecParams) -> VizSpec {
        VizSpec {
            viz_type: params.viz_type.unwrap_or(sqlviz_ir::VizType::Bar),
            x_axis: params.x_axis,
            y_axes: params.y_axes,
            breakdowns: params.breakdowns,
            filters: params.filters,
            tables: params.tables,
            limit: params.limit,
            sort_by: params.sort_by,
        }
    }
}
