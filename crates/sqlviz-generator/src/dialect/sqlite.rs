// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Grounded on `deepdive/viz/generator/sqlite_generator.py`.

use sqlviz_ir::{Binner, SqlDialect, Term, TimeUnit, XAxis};

use crate::dialect::{field_name, finish_x_axis, literal_str, DialectGenerator};
use crate::helper::term_key;
use crate::time_format::time_unit_from_format_string;

pub struct SqliteGenerator;

impl DialectGenerator for SqliteGenerator {
    fn term_to_x_axis(&self, term: &Term) -> XAxis {
        let x_axis = match term {
            Term::Unparsed { raw, .. } => XAxis {
                name: raw.clone(),
                unparsed: true,
                ..Default::default()
            },
            Term::Field { name, .. } => XAxis::new(name.clone()),
            Term::Function { name, args, .. } if name.eq_ignore_ascii_case("strftime") => {
                strftime_to_x_axis(term, args)
            }
            Term::Function { name, args, .. } if name.eq_ignore_ascii_case("date") => {
                date_to_x_axis(term, args)
            }
            _ => fallback(term),
        };
        finish_x_axis(x_axis, term)
    }
}

fn strftime_to_x_axis(term: &Term, args: &[Term]) -> XAxis {
    match args.len() {
        2 => {
            let (Some(format), Some(name)) = (literal_str(&args[0]), field_name(&args[1])) else {
                return fallback(term);
            };
            match time_unit_from_format_string(format) {
                Some(time_unit) => XAxis {
                    name: name.to_string(),
                    binner: Some(Binner::datetime(time_unit)),
                    ..Default::default()
                },
                None => fallback(term),
            }
        }
        4 => {
            let is_week_form = literal_str(&args[0]) == Some("%Y-%m-%d")
                && literal_str(&args[2]) == Some("weekday 0")
                && literal_str(&args[3]) == Some("-6 days");
            if is_week_form {
                if let Some(name) = field_name(&args[1]) {
                    return XAxis {
                        name: name.to_string(),
                        binner: Some(Binner::datetime(TimeUnit::Week)),
                        ..Default::default()
                    };
                }
            }
            fallback(term)
        }
        _ => fallback(term),
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

fn fallback(term: &Term) -> XAxis {
    let raw = term_key(SqlDialect::Sqlite, term);
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

    fn strftime(format: &str, field: &str) -> Term {
        Term::Function {
            name: "strftime".to_string(),
            args: vec![
                Term::Literal {
                    value: Literal::String(format.to_string()),
                    alias: None,
                },
                Term::field(field),
            ],
            distinct: false,
            alias: None,
        }
    }

    #[test]
    fn plain_field_has_no_binner() {
        let x_axis = SqliteGenerator.term_to_x_axis(&Term::field("status"));
        assert_eq!(x_axis.name, "status");
        assert!(x_axis.binner.is_none());
    }

    #[test]
    fn strftime_month_infers_month_binner() {
        let x_axis = SqliteGenerator.term_to_x_axis(&strftime("%Y-%m", "created_at"));
        assert_eq!(x_axis.name, "created_at");
        assert_eq!(
            x_axis.binner.unwrap().time_unit,
            Some(TimeUnit::Month)
        );
    }

    #[test]
    fn week_strftime_four_arg_form_infers_week_binner() {
        let term = Term::Function {
            name: "strftime".to_string(),
            args: vec![
                Term::Literal {
                    value: Literal::String("%Y-%m-%d".to_string()),
                    alias: None,
                },
                Term::field("created_at"),
                Term::Literal {
                    value: Literal::String("weekday 0".to_string()),
                    alias: None,
                },
                Term::Literal {
                    value: Literal::String("-6 days".to_string()),
                    alias: None,
                },
            ],
            distinct: false,
            alias: None,
        };
        let x_axis = SqliteGenerator.term_to_x_axis(&term);
        assert_eq!(x_axis.name, "created_at");
        assert_eq!(x_axis.binner.unwrap().time_unit, Some(TimeUnit::Week));
    }

    #[test]
    fn unrecognized_function_degrades_to_unparsed() {
        let term = Term::Function {
            name: "UPPER".to_string(),
            args: vec![Term::field("name")],
            distinct: false,
            alias: None,
        };
        let x_axis = SqliteGenerator.term_to_x_axis(&term);
        assert!(x_axis.unparsed);
    }
}
