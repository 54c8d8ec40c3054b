// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Grounded on `deepdive/viz/compiler/bigquery_complier.py`.

use sqlviz_ir::{BinnerType, Term, TimeUnit, XAxis};

use crate::binner_format::time_unit_to_format_string;
use crate::dialect::{domain_to_where, DialectCompiler};
use crate::error::{CompileError, CompileResult};
use crate::helper::column_to_term;

pub struct BigQueryCompiler;

impl DialectCompiler for BigQueryCompiler {
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
                format_date_call(format, &x_axis.name)
            } else if time_unit == TimeUnit::Week {
                date_trunc_week_call(&x_axis.name)
            } else if time_unit == TimeUnit::MonthOfYear {
                extract_month_call(&x_axis.name)
            } else {
                term
            };
        }

        if let Some(alias) = &x_axis.alias {
            term = term.with_alias(alias.clone());
        }
        Ok(term)
    }

    /// BigQuery's `WHERE` clause cannot reference a `SELECT`-list alias
    /// (https://cloud.google.com/bigquery/docs/reference/standard-sql/query-syntax#where_clause),
    /// so the x-axis term is recomputed here with its alias suppressed
    /// rather than reusing whatever alias-or-term `compile` passed in.
    fn x_axis_to_where(&self, x_axis: &XAxis, _term_or_alias: &Term) -> CompileResult<Option<Term>> {
        if x_axis.domain.is_none() {
            return Ok(None);
        }
        let term = self.x_axis_to_term(x_axis)?;
        let term = term.with_alias_cleared();
        Ok(domain_to_where(&x_axis.domain, &term))
    }
}

fn format_date_call(format: &str, field: &str) -> Term {
    Term::Function {
        name: "FORMAT_DATE".to_string(),
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

/// `DATE_TRUNC(field, 'WEEK')` — BigQuery takes the field first and the
/// date part as a bare (unquoted-in-SQL) literal, unlike every other
/// dialect's `DATE_TRUNC(part, field)` argument order.
fn date_trunc_week_call(field: &str) -> Term {
    Term::Function {
        name: "DATE_TRUNC".to_string(),
        args: vec![
            Term::field(field),
            Term::Literal {
                value: sqlviz_ir::Literal::String("WEEK".to_string()),
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
