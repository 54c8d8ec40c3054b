// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Grounded on `deepdive/viz/generator/snowflake_generator.py`.
//!
//! The date-part tables below are deliberately independent of
//! `sqlviz-compiler`'s emit-direction tables (the original imports
//! `TIME_UNIT_TO_DATE_PART` from `snowflake_compiler.py` into the generator,
//! coupling the two directions); keeping generator and compiler as sibling
//! crates with no dependency edge means this table is declared here too.
//! Note the comparison here is lower-case, unlike BigQuery's upper-case
//! tables - that divergence is in the original and is preserved.

use sqlviz_ir::{Binner, SqlDialect, Term, TimeUnit, XAxis};

use crate::dialect::{field_name, finish_x_axis, literal_str, DialectGenerator};
use crate::helper::term_key;

pub struct SnowflakeGenerator;

impl DialectGenerator for SnowflakeGenerator {
    fn term_to_x_axis(&self, term: &Term) -> XAxis {
        let x_axis = match term {
            Term::Unparsed { raw, .. } => XAxis {
                name: raw.clone(),
                unparsed: true,
                ..Default::default()
            },
            Term::Field { name, .. } => XAxis::new(name.clone()),
            Term::Function { name, args, .. } if name.eq_ignore_ascii_case("date") => {
                date_to_x_axis(term, args)
            }
            Term::Function { name, args, .. } if name.eq_ignore_ascii_case("date_trunc") => {
                date_trunc_to_x_axis(term, args)
            }
            Term::Function { name, args, .. } if name.eq_ignore_ascii_case("year") => {
                year_to_x_axis(term, args)
            }
            Term::Extract { date_part, term: inner, .. } => extract_to_x_axis(term, date_part, inner),
            _ => fallback(term),
        };
        finish_x_axis(x_axis, term)
    }
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

fn year_to_x_axis(term: &Term, args: &[Term]) -> XAxis {
    if args.len() == 1 {
        if let Some(name) = field_name(&args[0]) {
            return XAxis {
                name: name.to_string(),
                binner: Some(Binner::datetime(TimeUnit::Year)),
                ..Default::default()
            };
        }
    }
    fallback(term)
}

/// Same field/date_part swap tolerance as the BigQuery generator.
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
    match date_part_to_time_unit(part) {
        Some(time_unit) => XAxis {
            name: name.to_string(),
            binner: Some(Binner::datetime(time_unit)),
            ..Default::default()
        },
        None => fallback(term),
    }
}

fn date_part_to_time_unit(date_part: &str) -> Option<TimeUnit> {
    Some(match date_part.to_ascii_lowercase().as_str() {
        "day" => TimeUnit::Day,
        "week" => TimeUnit::Week,
        "month" => TimeUnit::Month,
        "year" => TimeUnit::Year,
        "dayofweek" => TimeUnit::DayOfWeek,
        "hour" => TimeUnit::Hour,
        "minute" => TimeUnit::Minute,
        "second" => TimeUnit::Second,
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
    Some(match date_part.to_ascii_lowercase().as_str() {
        "month" => TimeUnit::MonthOfYear,
        "day" => TimeUnit::DayOfMonth,
        "week" => TimeUnit::WeekOfYear,
        "year" | "isoyear" => TimeUnit::Year,
        "hour" => TimeUnit::HourOfDay,
        _ => return None,
    })
}

fn fallback(term: &Term) -> XAxis {
    let raw = term_key(SqlDialect::Snowflake, term);
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
    fn year_function_infers_year_binner() {
        let term = Term::Function {
            name: "YEAR".to_string(),
            args: vec![Term::field("created_at")],
            distinct: false,
            alias: None,
        };
        let x_axis = SnowflakeGenerator.term_to_x_axis(&term);
        assert_eq!(x_axis.binner.unwrap().time_unit, Some(TimeUnit::Year));
    }

    #[test]
    fn date_trunc_lowercase_date_part_and_swapped_args() {
        let swapped = Term::Function {
            name: "DATE_TRUNC".to_string(),
            args: vec![
                Term::Literal {
                    value: Literal::String("month".to_string()),
                    alias: None,
                },
                Term::field("created_at"),
            ],
            distinct: false,
            alias: None,
        };
        let x_axis = SnowflakeGenerator.term_to_x_axis(&swapped);
        assert_eq!(x_axis.name, "created_at");
        assert_eq!(x_axis.binner.unwrap().time_unit, Some(TimeUnit::Month));
    }

    #[test]
    fn extract_hour_infers_hour_of_day() {
        let term = Term::Extract {
            date_part: "hour".to_string(),
            term: Box::new(Term::field("created_at")),
            alias: None,
        };
        let x_axis = SnowflakeGenerator.term_to_x_axis(&term);
        assert_eq!(x_axis.binner.unwrap().time_unit, Some(TimeUnit::HourOfDay));
    }
}
