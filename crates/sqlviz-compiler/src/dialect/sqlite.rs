// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Grounded on `deepdive/viz/compiler/sqlite_compiler.py`.

use sqlviz_ir::{BinnerType, Term, XAxis};

use crate::binner_format::time_unit_to_format_string;
use crate::dialect::DialectCompiler;
use crate::error::{CompileError, CompileResult};
use crate::helper::column_to_term;

pub struct SqliteCompiler;

impl DialectCompiler for SqliteCompiler {
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
            term = if let Some(format) = time_unit_to_format_string(time_unit) {
                strftime_call(format, &x_axis.name)
            } else if time_unit == sqlviz_ir::TimeUnit::Week {
                week_bucket_call(&x_axis.name)
            } else {
                term
            };
        }

        if let Some(alias) = &x_axis.alias {
            term = term.with_alias(alias.clone());
        }
        Ok(term)
    }
}

fn strftime_call(format: &str, field: &str) -> Term {
    Term::Function {
        name: "strftime".to_string(),
        args: vec![
            Term::Literal {
                value: sqlviz_ir::Literal::String(format.to_string()),
                alias: None,
            },
            Term::field(field),
        ],
        distinct: false,
        alias: None,
    }
}

/// SQLite has no single ISO-week function, so `week` is bucketed by
/// rewinding to the preceding Sunday: `strftime('%Y-%m-%d', field,
/// 'weekday 0', '-6 days')`.
fn week_bucket_call(field: &str) -> Term {
    Term::Function {
        name: "strftime".to_string(),
        args: vec![
            Term::Literal {
                value: sqlviz_ir::Literal::String("%Y-%m-%d".to_string()),
                alias: None,
            },
            Term::field(field),
            Term::Literal {
                value: sqlviz_ir::Literal::String("weekday 0".to_string()),
                alias: None,
            },
            Term::Literal {
                value: sqlviz_ir::Literal::String("-6 days".to_string()),
                alias: None,
            },
        ],
        distinct: false,
        alias: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlviz_ir::{Binner, TimeUnit};

    #[test]
    fn month_binner_emits_two_arg_strftime() {
        let x_axis = XAxis {
            binner: Some(Binner::datetime(TimeUnit::Month)),
            ..XAxis::new("created_at")
        };
        let term = SqliteCompiler.x_axis_to_term(&x_axis).unwrap();
        match term {
            Term::Function { name, args, .. } => {
                assert_eq!(name, "strftime");
                assert_eq!(args.len(), 2);
            }
            other => panic!("expected Function term, got {other:?}"),
        }
    }

    #[test]
    fn week_binner_emits_four_arg_strftime() {
        let x_axis = XAxis {
            binner: Some(Binner::datetime(TimeUnit::Week)),
            ..XAxis::new("created_at")
        };
        let term = SqliteCompiler.x_axis_to_term(&x_axis).unwrap();
        match term {
            Term::Function { args, .. } => assert_eq!(args.len(), 4),
            other => panic!("expected Function term, got {other:?}"),
        }
    }

    #[test]
    fn numeric_binner_errors() {
        let x_axis = XAxis {
            binner: Some(Binner::numeric(10).unwrap()),
            ..XAxis::new("amount")
        };
        assert!(SqliteCompiler.x_axis_to_term(&x_axis).is_err());
    }
}
