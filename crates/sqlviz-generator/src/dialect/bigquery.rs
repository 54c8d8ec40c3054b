// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Grounded on `deepdive/viz/generator/bigquery_generator.py`.

use sqlviz_ir::{Binner, SqlDialect, Term, TimeUnit, XAxis};

use crate::dialect::{field_name, finish_x_axis, literal_str, DialectGenerator};
use crate::helper::term_key;
use crate::time_format::time_unit_from_format_string;

pub struct BigQueryGenerator;

impl DialectGenerator for BigQueryGenerator {
    fn term_to_x_axis(&self, term: &Term) -> XAxis {
        let x_axis = match term {
            Term::Unparsed { raw, .. } => XAxis {
                name: raw.clone(),
                unparsed: true,
                ..Default::default()
            },
            Term::Field { name, .. } => XAxis::new(name.clone()),
            Term::Function { name, args, .. } if name.eq_ignore_ascii_case("format_date") => {
                format_date_to_x_axis(term, args)
            }
            Term::Function { name, args, .. } if name.eq_ignore_ascii_case("date") => {
                date_to_x_axis(term, args)
            }
            Term::Function { name, args, .. } if name.eq_ignore_ascii_case("date_trunc") => {
                date_trunc_to_x_axis(term, args)
            }
            Term::Extract { date_part, term: inner, .. } => extract_to_x_axis(term, date_part, inner),
            _ => fallback(term),
        };
        finish_x_axis(x_axis, term)
    }
}

fn format_date_to_x_axis(term: &Term, args: &[Term]) -> XAxis {
    if args.len() == 2 {
        let (Some(format), Some(name)) = (literal_str(&args[0]), field_name(&args[1])) else {
            return fallback(term);
        };
        if let Some(time_unit) = time_unit_from_format_string(format) {
            return XAxis {
                name: name.to_string(),
                binner: Some(Binner::datetime(time_unit)),
                ..Default::default()
            };
        }
    }
    fallback(term)
}

fn date_to_x_axis(term: &Term, args: &[Term]) -> XAxis {
    if args.len() == 1 {
        if let Some(name) = field_name(&args[0]) {
            return XAxis {
                name: name.to_string(),
                binner: Some(Binner::datetime(TimeUnit::Day)),
                ..Default::default()
            };
        }
    }
    fallback(term)
}

/// `DATE_TRUNC` takes its `(field, date_part)` arguments in either order in
/// practice (LLM-generated SQL often swaps them), so both are tried.
fn date_trunc_to_x_axis(term: &Term, args: &[Term]) -> XAxis {
    if args.len() != 2 {
        return fallback(term);
    }
    let (field, date_part) = (&args[0], &args[1]);
    let (field, date_part) = if field_name(date_part).is_some() {
        (date_part, field)
    } else {
        (field, date_part)
    };
    let (Some(name), Some(part)) = (field_name(field), literal_str(date_part)) else {
        return fallback(term);
    };
    match date_trunc_part_to_time_unit(part) {
        Some(time_unit) => XAxis {
            name: name.to_string(),
            binner: Some(Binner::datetime(time_unit)),
            ..Default::default()
        },
        None => fallback(term),
    }
}

fn date_trunc_part_to_time_unit(date_part: &str) -> Option<TimeUnit> {
    Some(match date_part.to_ascii_uppercase().as_str() {
        "WEEK" | "ISOWEEK" => TimeUnit::Week,
        "DAY" => TimeUnit::Day,
        "DAYOFWEEK" => TimeUnit::DayOfWeek,
        "MONTH" => TimeUnit::Month,
        "YEAR" | "ISOYEAR" => TimeUnit::Year,
        _ => return None,
    })
}

fn extract_to_x_axis(term: &Term, date_part: &str, inner: &Term) -> XAxis {
    let Some(name) = field_name(inner) else {
        return fallback(term);
    };
    match extract_part_to_time_unit(date_part) {
        Some(time_unit) => XAxis {
            name: name.to_string(),
            binner: Some(Binner::datetime(time_unit)),
            ..Default::default()
        },
        None => fallback(term),
    }
}

fn extract_part_to_time_unit(date_part: &str) -> Option<TimeUnit> {
    Some(match date_part.to_ascii_uppercase().as_str() {
        "MONTH" => TimeUnit::MonthOfYear,
        "DAY" => TimeUnit::DayOfMonth,
        "WEEK" => TimeUnit::WeekOfYear,
        "YEAR" | "ISOYEAR" => TimeUnit::Year,
        "HOUR" => TimeUnit::HourOfDay,
        _ => return None,
    })
}

fn fallback(term: &Term) -> XAxis {
    let raw = term_key(SqlDialect::GoogleSql, term);
    tracing::warn!(term = %raw, "could not infer x-axis binner, degrading to unparsed");
    XAxis {
        name: raw,
        unparsed: true,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlviz_ir::Literal;

    #[test]
    fn date_trunc_handles_swapped_argument_order() {
        let swapped = Term::Function {
            name: "DATE_TRUNC".to_string(),
            args: vec![
                Term::Literal {
                    value: Literal::String("WEEK".to_string()),
                    alias: None,
                },
                Term::field("started_at"),
            ],
            distinct: false,
            alias: None,
        };
        let x_axis = BigQueryGenerator.term_to_x_axis(&swapped);
        assert_eq!(x_axis.name, "started_at");
        assert_eq!(x_axis.binner.unwrap().time_unit, Some(TimeUnit::Week));
    }

    #[test]
    fn extract_month_infers_month_of_year() {
        let term = Term::Extract {
            date_part: "MONTH".to_string(),
            term: Box::new(Term::field("started_at")),
            alias: None,
        };
        let x_axis = BigQueryGenerator.term_to_x_axis(&term);
        assert_eq!(x_axis.binner.unwrap().time_unit, Some(TimeUnit::MonthOfYear));
    }
}
