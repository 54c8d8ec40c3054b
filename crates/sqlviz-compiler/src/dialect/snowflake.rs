// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Grounded on `deepdive/viz/compiler/snowflake_compiler.py`.

use sqlviz_ir::{BinnerType, Term, TimeUnit, XAxis};

use crate::dialect::DialectCompiler;
use crate::error::{CompileError, CompileResult};
use crate::helper::column_to_term;

pub struct SnowflakeCompiler;

impl DialectCompiler for SnowflakeCompiler {
    fn x_axis_to_term(&self, x_axis: &XAxis) -> CompileResult<Term> {
        let mut term = if x_axis.unparsed {
            Term::Unparsed {
                raw: x_axis.name.clone(),
                alias: None,
            }
        } else {
            column_to_term(&x_axis.name)
        };

        if let Some(binner) = &x_axis.binner {
            if binner.binner_type != BinnerType::Datetime {
                return Err(CompileError::NumericBinnerUnsupported(x_axis.name.clone()));
            }
            let time_unit = binner.time_unit.expect("datetime binner always carries a time_unit");
            if let Some(date_part) = time_unit_to_date_part(time_unit) {
                term = date_trunc_call(date_part, &x_axis.name);
            } else if let Some(format) = time_unit_to_date_format(time_unit) {
                term = to_varchar_call(&x_axis.name, format);
            } else if time_unit == TimeUnit::MonthOfYear {
                term = extract_month_call(&x_axis.name);
            }
        }

        if let Some(alias) = &x_axis.alias {
            term = term.with_alias(alias.clone());
        }
        Ok(term)
    }
}

/// https://docs.snowflake.com/en/sql-reference/functions-date-time#label-supported-date-time-parts
fn time_unit_to_date_part(time_unit: TimeUnit) -> Option<&'static str> {
    Some(match time_unit {
        TimeUnit::Day => "day",
        TimeUnit::Week => "week",
        TimeUnit::Month => "month",
        TimeUnit::Year => "year",
        TimeUnit::DayOfWeek => "dayofweek",
        TimeUnit::Hour => "hour",
        TimeUnit::Minute => "minute",
        TimeUnit::Second => "second",
        _ => return None,
    })
}

/// https://docs.snowflake.com/en/sql-reference/functions-conversion#label-date-time-format-conversion
fn time_unit_to_date_format(time_unit: TimeUnit) -> Option<&'static str> {
    Some(match time_unit {
        TimeUnit::HourOfDay => "HH24",
        TimeUnit::DayOfMonth => "DD",
        _ => return None,
    })
}

fn date_trunc_call(date_part: &str, field: &str) -> Term {
    Term::Function {
        name: "DATE_TRUNC".to_string(),
        args: vec![
            Term::Literal {
                value: sqlviz_ir::Literal::String(date_part.to_string()),
                alias: None,
            },
            Term::field(field),
        ],
        distinct: false,
        alias: None,
    }
}

fn to_varchar_call(field: &str, format: &str) -> Term {
    Term::Function {
        name: "TO_VARCHAR".to_string(),
        args: vec![
            Term::field(field),
            Term::Literal {
                value: sqlviz_ir::Literal::String(format.to_string()),
                alias: None,
            },
        ],
        distinct: false,
        alias: None,
    }
}

fn extract_month_call(field: &str) -> Term {
    Term::Extract {
        date_part: "MONTH".to_string(),
        term: Box::new(Term::field(field)),
        alias: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlviz_ir::Binner;

    #[test]
    fn day_binner_emits_date_trunc() {
        let x_axis = XAxis {
            binner: Some(Binner::datetime(TimeUnit::Day)),
            ..XAxis::new("created_at")
        };
        let term = SnowflakeCompiler.x_axis_to_term(&x_axis).unwrap();
        match term {
            Term::Function { name, .. } => assert_eq!(name, "DATE_TRUNC"),
            other => panic!("expected Function term, got {other:?}"),
        }
    }

    #[test]
    fn hour_of_day_binner_emits_to_varchar() {
        let x_axis = XAxis {
            binner: Some(Binner::datetime(TimeUnit::HourOfDay)),
            ..XAxis::new("created_at")
        };
        let term = SnowflakeCompiler.x_axis_to_term(&x_axis).unwrap();
        match term {
            Term::Function { name, .. } => assert_eq!(name, "TO_VARCHAR"),
            other => panic!("expected Function term, got {other:?}"),
        }
    }

    #[test]
    fn month_of_year_binner_emits_extract() {
        let x_axis = XAxis {
            binner: Some(Binner::datetime(TimeUnit::MonthOfYear)),
            ..XAxis::new("created_at")
        };
        let term = SnowflakeCompiler.x_axis_to_term(&x_axis).unwrap();
        assert!(matches!(term, Term::Extract { .. }));
    }
}
