// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # VizSpec
//!
//! The declarative chart description: axes, breakdowns, filters, sort,
//! limit, and tables. Grounded on `deepdive.schema`'s `VizSpec`/`XAxis`/
//! `YAxis`/`Breakdown`/`Filter`/`SortBy`/`Binner`/`VizType`. Where the
//! original uses pydantic `model_validator`s, this crate uses a fallible
//! constructor (`VizSpec::new`) in the error style of
//! `crates/lowering/src/error.rs`.

use serde::{Deserialize, Serialize};

use crate::sql_tree::SortDirection;

/// A bound on a `Filter`'s or `XAxis`'s domain: `int | float | string`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DomainLimit {
    Int(i64),
    Float(f64),
    Text(String),
}

impl DomainLimit {
    pub fn as_str_for_sql(&self) -> String {
        match self {
            DomainLimit::Int(v) => v.to_string(),
            DomainLimit::Float(v) => v.to_string(),
            DomainLimit::Text(v) => v.clone(),
        }
    }
}

impl From<i64> for DomainLimit {
    fn from(v: i64) -> Self {
        DomainLimit::Int(v)
    }
}

impl From<f64> for DomainLimit {
    fn from(v: f64) -> Self {
        DomainLimit::Float(v)
    }
}

impl From<String> for DomainLimit {
    fn from(v: String) -> Self {
        DomainLimit::Text(v)
    }
}

/// An inclusive low/high pair, either side optionally open.
pub type Domain = (Option<DomainLimit>, Option<DomainLimit>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinnerType {
    Datetime,
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    HourOfDay,
    Day,
    DayOfWeek,
    DayOfMonth,
    Week,
    WeekOfYear,
    WeekOfYearLong,
    Month,
    MonthOfYear,
    Year,
}

impl TimeUnit {
    /// Upper-cased suffix used by `AliasProcessor` (`<name>_<TIME_UNIT>`).
    pub fn upper(&self) -> &'static str {
        match self {
            TimeUnit::Second => "SECOND",
            TimeUnit::Minute => "MINUTE",
            TimeUnit::Hour => "HOUR",
            TimeUnit::HourOfDay => "HOUR_OF_DAY",
            TimeUnit::Day => "DAY",
            TimeUnit::DayOfWeek => "DAY_OF_WEEK",
            TimeUnit::DayOfMonth => "DAY_OF_MONTH",
            TimeUnit::Week => "WEEK",
            TimeUnit::WeekOfYear => "WEEK_OF_YEAR",
            TimeUnit::WeekOfYearLong => "WEEK_OF_YEAR_LONG",
            TimeUnit::Month => "MONTH",
            TimeUnit::MonthOfYear => "MONTH_OF_YEAR",
            TimeUnit::Year => "YEAR",
        }
    }
}

/// The error kinds enumerated in spec.md §4.5 / §7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum VizSpecErrorKind {
    #[error("no_duplicate_axes")]
    NoDuplicateAxes,
    #[error("aggregation_not_specified")]
    AggregationNotSpecified,
    #[error("sort_by_not_found")]
    SortByNotFound,
    #[error("extra_column_with_star")]
    ExtraColumnWithStar,
    #[error("invalid_binner")]
    InvalidBinner,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct VizSpecError {
    pub kind: VizSpecErrorKind,
    pub message: String,
}

impl VizSpecError {
    pub fn new(kind: VizSpecErrorKind, message: impl Into<String>) -> Self {
        VizSpecError {
            kind,
            message: message.into(),
        }
    }
}

/// Rule that buckets a datetime or numeric column.
///
/// Invariant (spec.md §3): `binner_type=datetime` requires `time_unit`;
/// `binner_type=numeric` requires `scale`. Enforced in the constructors
/// below rather than after the fact, so an invalid `Binner` can't exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binner {
    pub binner_type: BinnerType,
    pub time_unit: Option<TimeUnit>,
    pub scale: Option<u8>,
}

impl Binner {
    pub fn datetime(time_unit: TimeUnit) -> Self {
        Binner {
            binner_type: BinnerType::Datetime,
            time_unit: Some(time_unit),
            scale: None,
        }
    }

    pub fn numeric(scale: u8) -> Result<Self, VizSpecError> {
        if scale > 100 {
            return Err(VizSpecError::new(
                VizSpecErrorKind::InvalidBinner,
                format!("numeric binner scale must be 0..=100, got {scale}"),
            ));
        }
        Ok(Binner {
            binner_type: BinnerType::Numeric,
            time_unit: None,
            scale: Some(scale),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct XAxis {
    pub name: String,
    pub alias: Option<String>,
    pub domain: Option<Domain>,
    pub binner: Option<Binner>,
    pub unparsed: bool,
}

impl XAxis {
    pub fn new(name: impl Into<String>) -> Self {
        XAxis {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Aggregation {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl Aggregation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::Count => "COUNT",
            Aggregation::Sum => "SUM",
            Aggregation::Avg => "AVG",
            Aggregation::Min => "MIN",
            Aggregation::Max => "MAX",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "COUNT" => Some(Aggregation::Count),
            "SUM" => Some(Aggregation::Sum),
            "AVG" => Some(Aggregation::Avg),
            "MIN" => Some(Aggregation::Min),
            "MAX" => Some(Aggregation::Max),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct YAxis {
    pub name: String,
    pub alias: Option<String>,
    pub aggregation: Option<Aggregation>,
    pub unparsed: bool,
}

impl YAxis {
    pub fn new(name: impl Into<String>) -> Self {
        YAxis {
            name: name.into(),
            ..Default::default()
        }
    }

    /// `name == "*"` with no aggregation — the star-exclusivity case.
    pub fn is_bare_star(&self) -> bool {
        self.name == "*" && self.aggregation.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Breakdown {
    pub name: String,
    pub alias: Option<String>,
    pub unparsed: bool,
}

impl Breakdown {
    pub fn new(name: impl Into<String>) -> Self {
        Breakdown {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortBy {
    pub name: String,
    pub direction: SortDirection,
    pub unparsed: bool,
}

impl SortBy {
    pub fn new(name: impl Into<String>, direction: SortDirection) -> Self {
        SortBy {
            name: name.into(),
            direction,
            unparsed: false,
        }
    }
}

/// A WHERE-clause predicate lowered into a chart-editable shape.
///
/// Unlike the original's single struct with an optional field per variant,
/// this is a tagged enum — each filter_type only carries the fields it
/// actually uses, so a `Comparison` filter can't be constructed without
/// `values` the way the pydantic model allowed before its validator ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "filter_type", rename_all = "snake_case")]
pub enum Filter {
    Comparison {
        name: String,
        values: Vec<DomainLimit>,
        negate: bool,
    },
    Numeric {
        name: String,
        domain: Domain,
        negate: bool,
    },
    Like {
        name: String,
        value: DomainLimit,
        negate: bool,
    },
    Complex {
        expression: String,
        negate: bool,
    },
}

impl Filter {
    /// The column name this filter targets, or `None` for `complex` filters
    /// (matching `VizSpec.get_filter_columns`' skip-complex behavior).
    pub fn name(&self) -> Option<&str> {
        match self {
            Filter::Comparison { name, .. }
            | Filter::Numeric { name, .. }
            | Filter::Like { name, .. } => Some(name),
            Filter::Complex { .. } => None,
        }
    }

    pub fn negate(&self) -> bool {
        match self {
            Filter::Comparison { negate, .. }
            | Filter::Numeric { negate, .. }
            | Filter::Like { negate, .. }
            | Filter::Complex { negate, .. } => *negate,
        }
    }

    pub fn negated(mut self) -> Self {
        match &mut self {
            Filter::Comparison { negate, .. }
            | Filter::Numeric { negate, .. }
            | Filter::Like { negate, .. }
            | Filter::Complex { negate, .. } => *negate = !*negate,
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VizType {
    Bar,
    Line,
    Area,
    Pie,
    Table,
    Scatter,
}

/// The declarative chart description produced by the Generator and consumed
/// by the Compiler (or edited directly by an end-user UI in between).
///
/// Constructed only through `VizSpec::new`, which re-runs the invariant
/// checks from spec.md §3/§4.5 on every build — matching the original's
/// `model_validator(mode="after")` chain running on every instantiation,
/// not just the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizSpec {
    pub viz_type: VizType,
    pub x_axis: Option<XAxis>,
    pub y_axes: Vec<YAxis>,
    pub breakdowns: Vec<Breakdown>,
    pub filters: Vec<Filter>,
    pub tables: Vec<String>,
    pub limit: Option<i64>,
    pub sort_by: Option<SortBy>,
}

/// Unvalidated field bag handed to `VizSpec::new` — mirrors
/// `VizSpecParams` standing in front of `VizSpec`'s validators.
#[derive(Debug, Clone, Default)]
pub struct VizSpecParams {
    pub viz_type: Option<VizType>,
    pub x_axis: Option<XAxis>,
    pub y_axes: Vec<YAxis>,
    pub breakdowns: Vec<Breakdown>,
    pub filters: Vec<Filter>,
    pub tables: Vec<String>,
    pub limit: Option<i64>,
    pub sort_by: Option<SortBy>,
}

impl VizSpec {
    pub fn new(params: VizSpecParams) -> Result<Self, VizSpecError> {
        let spec = VizSpec {
            viz_type: params.viz_type.unwrap_or(VizType::Bar),
            x_axis: params.x_axis,
            y_axes: params.y_axes,
            breakdowns: params.breakdowns,
            filters: params.filters,
            tables: params.tables,
            limit: params.limit,
            sort_by: params.sort_by,
        };
        spec.check_no_duplicate_axes()?;
        spec.check_no_extra_columns_if_star()?;
        spec.check_sort_by()?;
        Ok(spec)
    }

    fn has_star(&self) -> bool {
        self.y_axes.iter().any(YAxis::is_bare_star)
    }

    fn check_no_duplicate_axes(&self) -> Result<(), VizSpecError> {
        let all = self.all_columns();
        let mut seen = std::collections::HashSet::new();
        for col in &all {
            if !seen.insert(col) {
                return Err(VizSpecError::new(
                    VizSpecErrorKind::NoDuplicateAxes,
                    "Duplicate column name in x_axis, y_axes, and breakdown!",
                ));
            }
        }
        Ok(())
    }

    fn check_no_extra_columns_if_star(&self) -> Result<(), VizSpecError> {
        if self.has_star() && self.y_axes.len() > 1 {
            return Err(VizSpecError::new(
                VizSpecErrorKind::ExtraColumnWithStar,
                "Extra columns should NOT be specified when a star is present",
            ));
        }
        Ok(())
    }

    fn check_sort_by(&self) -> Result<(), VizSpecError> {
        if self.has_star() {
            return Ok(());
        }
        if let Some(sort_by) = &self.sort_by {
            if !sort_by.unparsed && !self.all_columns().contains(&sort_by.name) {
                return Err(VizSpecError::new(
                    VizSpecErrorKind::SortByNotFound,
                    "Sort by MUST be specified in one of x_axis, y_axes, or breakdown",
                ));
            }
        }
        Ok(())
    }

    /// Every column name referenced by an axis/breakdown, deduplicated the
    /// way `get_all_columns` dedupes y-axis names before flattening.
    pub fn all_columns(&self) -> Vec<String> {
        let mut columns = Vec::new();
        if let Some(x_axis) = &self.x_axis {
            if !x_axis.unparsed {
                columns.push(x_axis.name.clone());
            }
        }
        let mut y_names: Vec<String> = self
            .y_axes
            .iter()
            .filter(|y| !y.unparsed)
            .map(|y| y.name.clone())
            .collect();
        y_names.sort();
        y_names.dedup();
        columns.extend(y_names);
        columns.extend(self.breakdowns.iter().map(|b| b.name.clone()));
        columns
    }

    pub fn filter_columns(&self) -> Vec<String> {
        self.filters
            .iter()
            .filter_map(|f| f.name().map(|n| n.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_axes() {
        let params = VizSpecParams {
            x_axis: Some(XAxis::new("a")),
            breakdowns: vec![Breakdown::new("a")],
            ..Default::default()
        };
        let err = VizSpec::new(params).unwrap_err();
        assert_eq!(err.kind, VizSpecErrorKind::NoDuplicateAxes);
    }

    #[test]
    fn rejects_extra_y_axis_with_bare_star() {
        let params = VizSpecParams {
            y_axes: vec![YAxis::new("*"), YAxis::new("b")],
            ..Default::default()
        };
        let err = VizSpec::new(params).unwrap_err();
        assert_eq!(err.kind, VizSpecErrorKind::ExtraColumnWithStar);
    }

    #[test]
    fn allows_star_with_count_aggregation_plus_other_axes() {
        let params = VizSpecParams {
            x_axis: Some(XAxis::new("a")),
            y_axes: vec![YAxis {
                name: "*".into(),
                aggregation: Some(Aggregation::Count),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(VizSpec::new(params).is_ok());
    }

    #[test]
    fn rejects_sort_by_not_in_axes() {
        let params = VizSpecParams {
            x_axis: Some(XAxis::new("a")),
            sort_by: Some(SortBy::new("z", SortDirection::Asc)),
            ..Default::default()
        };
        let err = VizSpec::new(params).unwrap_err();
        assert_eq!(err.kind, VizSpecErrorKind::SortByNotFound);
    }

    #[test]
    fn sort_by_unresolved_is_allowed_when_star_present() {
        let params = VizSpecParams {
            y_axes: vec![YAxis::new("*")],
            sort_by: Some(SortBy::new("whatever", SortDirection::Desc)),
            ..Default::default()
        };
        assert!(VizSpec::new(params).is_ok());
    }

    #[test]
    fn numeric_binner_rejects_out_of_range_scale() {
        let err = Binner::numeric(150).unwrap_err();
        assert_eq!(err.kind, VizSpecErrorKind::InvalidBinner);
    }

    #[test]
    fn filter_columns_skips_complex() {
        let params = VizSpecParams {
            filters: vec![
                Filter::Comparison {
                    name: "status".into(),
                    values: vec!["x".to_string().into()],
                    negate: false,
                },
                Filter::Complex {
                    expression: "a OR b".into(),
                    negate: false,
                },
            ],
            ..Default::default()
        };
        let spec = VizSpec::new(params).unwrap();
        assert_eq!(spec.filter_columns(), vec!["status".to_string()]);
    }
}
