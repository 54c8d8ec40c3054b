// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Walks a parsed [`SqlTree`] into a [`VizSpec`]. Grounded on
//! `deepdive/viz/generator/base_generator.py::BaseGenerator.generate` and
//! its `term_to_y_axis`/`term_to_breakdown`/`term_to_sortby`/`term_to_filter`
//! helpers.

use std::collections::{HashMap, HashSet};

use sqlviz_ir::{
    Aggregation, BinaryOp, Breakdown, DomainLimit, Filter, Literal, SortBy, SortDirection,
    SqlDialect, SqlTree, Term, VizSpec, YAxis,
};

use crate::builder::{AxisInfo, VizSpecBuilder};
use crate::dialect;
use crate::error::{GeneratorError, GeneratorResult};
use crate::helper::{aliases_to_terms, term_key};

/// Turns a parsed query into a chart description.
///
/// Returns `Ok(None)` for a tree with no select list at all (grounded on
/// `generate`'s `if not sql_tree.select: return None` guard) — an empty
/// query describes no chart, which is not itself an error.
pub fn generate(tree: &SqlTree) -> GeneratorResult<Option<VizSpec>> {
    if tree.select_terms.is_empty() {
        return Ok(None);
    }

    let dialect = tree.dialect;
    let generator = dialect::for_dialect(dialect);
    let mut builder = VizSpecBuilder::new(dialect, tree);

    for term in select_only_terms(dialect, tree) {
        builder.add_y_axis(term);
    }

    if !tree.groupby_terms.is_empty() {
        let aliases = aliases_to_terms(tree);
        let resolve = |term: &Term| -> Term {
            aliases
                .get(&term_key(dialect, term))
                .cloned()
                .unwrap_or_else(|| term.clone())
        };

        let (function_terms, non_function_terms): (Vec<&Term>, Vec<&Term>) = tree
            .groupby_terms
            .iter()
            .partition(|term| resolve(term).is_function());

        match function_terms.len() {
            0 => {
                if let Some((x_axis_term, breakdown_terms)) = non_function_terms.split_first() {
                    builder.set_x_axis(generator.as_ref(), x_axis_term);
                    for term in breakdown_terms {
                        builder.add_breakdown(term);
                    }
                }
            }
            1 => {
                builder.set_x_axis(generator.as_ref(), function_terms[0]);
                for term in &non_function_terms {
                    builder.add_breakdown(term);
                }
            }
            _ => {
                return Err(GeneratorError::MultipleFunctionGroupbys(
                    function_terms.iter().map(|t| term_key(dialect, t)).collect(),
                ));
            }
        }
    }

    if let Some(orderby) = &tree.orderby {
        builder.add_sortby(&orderby.term, orderby.direction);
    }

    if let Some(where_term) = &tree.where_term {
        builder.add_where(where_term);
    }

    let spec = builder.build()?;
    Ok(Some(spec))
}

/// Select-list terms not already covered by a group-by term, directly or
/// through its alias. Grounded on `base_generator.py`'s
/// `select_only_terms` comprehension.
fn select_only_terms<'a>(dialect: SqlDialect, tree: &'a SqlTree) -> Vec<&'a Term> {
    let groupby_keys: HashSet<String> = tree
        .groupby_terms
        .iter()
        .map(|term| term_key(dialect, term))
        .collect();

    tree.select_terms
        .iter()
        .filter(|term| {
            if let Some(alias) = term.alias() {
                if groupby_keys.contains(alias) {
                    return false;
                }
            }
            !groupby_keys.contains(&term_key(dialect, term))
        })
        .collect()
}

/// Turns a select-list term into a [`YAxis`]. Grounded on
/// `base_generator.py::term_to_y_axis`.
pub(crate) fn term_to_y_axis(dialect: SqlDialect, term: &Term) -> YAxis {
    let mut y_axis = match term {
        Term::Aggregate { name, args, .. } => aggregate_to_y_axis(dialect, term, name, args),
        Term::Field { name, .. } => YAxis::new(name.clone()),
        Term::Unparsed { raw, .. } => YAxis {
            name: raw.clone(),
            unparsed: true,
            ..Default::default()
        },
        Term::Star { .. } => YAxis::new("*"),
        _ => fallback_y_axis(dialect, term),
    };
    if let Some(alias) = term.alias() {
        y_axis.alias = Some(alias.to_string());
    }
    y_axis
}

fn aggregate_to_y_axis(dialect: SqlDialect, term: &Term, name: &str, args: &[Term]) -> YAxis {
    let Some(aggregation) = Aggregation::parse(name) else {
        return fallback_y_axis(dialect, term);
    };

    // `COUNT(*)` — the one shape that names "*" instead of a single arg.
    if args.len() == 1 && args[0].is_star() {
        return YAxis {
            name: "*".to_string(),
            aggregation: Some(aggregation),
            ..Default::default()
        };
    }

    match args.first() {
        Some(Term::Field { name, .. }) => YAxis {
            name: name.clone(),
            aggregation: Some(aggregation),
            ..Default::default()
        },
        Some(Term::Literal { value, .. }) => YAxis {
            name: literal_to_string(value),
            aggregation: Some(aggregation),
            ..Default::default()
        },
        _ => {
            let raw = term_key(dialect, term);
            tracing::warn!(term = %raw, "could not resolve aggregate argument to a column, degrading to unparsed");
            YAxis {
                name: raw,
                aggregation: Some(aggregation),
                unparsed: true,
            }
        }
    }
}

fn literal_to_string(value: &Literal) -> String {
    match value {
        Literal::Null => "null".to_string(),
        Literal::Boolean(b) => b.to_string(),
        Literal::Integer(i) => i.to_string(),
        Literal::Float(f) => f.to_string(),
        Literal::String(s) => s.clone(),
    }
}

fn fallback_y_axis(dialect: SqlDialect, term: &Term) -> YAxis {
    let raw = term_key(dialect, term);
    tracing::warn!(term = %raw, "could not convert term to y-axis, degrading to unparsed");
    YAxis {
        name: raw,
        unparsed: true,
        ..Default::default()
    }
}

/// Turns a group-by term into a [`Breakdown`]. Grounded on
/// `base_generator.py::term_to_breakdown`.
pub(crate) fn term_to_breakdown(dialect: SqlDialect, term: &Term) -> Breakdown {
    match term {
        Term::Field { name, .. } => Breakdown::new(name.clone()),
        Term::Unparsed { raw, .. } => Breakdown {
            name: raw.clone(),
            unparsed: true,
            ..Default::default()
        },
        _ => {
            let raw = term_key(dialect, term);
            tracing::warn!(term = %raw, "could not convert term to breakdown, degrading to unparsed");
            Breakdown {
                name: raw,
                unparsed: true,
                ..Default::default()
            }
        }
    }
}

/// Resolves an `ORDER BY` term against the already-registered axes.
/// Grounded on `base_generator.py::term_to_sortby`.
pub(crate) fn term_to_sortby(
    dialect: SqlDialect,
    term: &Term,
    direction: SortDirection,
    aliases_to_terms: &HashMap<String, Term>,
    term_to_axes: &HashMap<String, AxisInfo>,
) -> Option<SortBy> {
    let resolved = aliases_to_terms
        .get(&term_key(dialect, term))
        .cloned()
        .unwrap_or_else(|| term.clone());
    let resolved_key = term_key(dialect, &resolved);

    if let Some(axis) = term_to_axes.get(&resolved_key) {
        let mut sort_by = SortBy::new(axis.name.clone(), direction);
        sort_by.unparsed = axis.unparsed;
        return Some(sort_by);
    }

    // A bare `*` y-axis was selected — any column named in ORDER BY is
    // fine to sort by even though it was never registered as an axis.
    if term_to_axes.contains_key("*") {
        if let Term::Field { name, .. } = &resolved {
            return Some(SortBy::new(name.clone(), direction));
        }
    }

    tracing::warn!(term = %resolved_key, "order-by term not found among select/group-by axes, degrading to unparsed");
    let mut sort_by = SortBy::new(resolved_key, direction);
    sort_by.unparsed = true;
    Some(sort_by)
}

/// Turns one unpacked WHERE criterion into a [`Filter`]. Grounded on
/// `base_generator.py::term_to_filter` and its `_basic_criterion_to_filter`/
/// `_range_criterion_to_filter`/`_contains_criterion_to_filter`/
/// `_null_criterion_to_filter`/`_complex_criterion_to_filter` dispatch.
pub(crate) fn term_to_filter(
    dialect: SqlDialect,
    term: &Term,
    term_to_axes: &HashMap<String, AxisInfo>,
) -> Filter {
    match term {
        Term::Not { term: inner, .. } => term_to_filter(dialect, inner, term_to_axes).negated(),
        Term::IsNull { term: inner, negate, .. } => Filter::Comparison {
            name: filter_name(dialect, inner, term_to_axes),
            values: vec![DomainLimit::Text("null".to_string())],
            negate: *negate,
        },
        Term::Between {
            term: inner,
            low,
            high,
            negate,
            ..
        } => Filter::Numeric {
            name: filter_name(dialect, inner, term_to_axes),
            domain: (
                term_to_domain_limit(low),
                term_to_domain_limit(high),
            ),
            negate: *negate,
        },
        Term::In {
            term: inner,
            list,
            negate,
            ..
        } => Filter::Comparison {
            name: filter_name(dialect, inner, term_to_axes),
            values: list.iter().filter_map(term_to_domain_limit).collect(),
            negate: *negate,
        },
        Term::BinaryOp { left, op, right, .. } => {
            basic_criterion_filter(dialect, left, *op, right, term_to_axes)
                .or_else(|| basic_criterion_filter(dialect, right, swap_comparison(*op), left, term_to_axes))
                .unwrap_or_else(|| complex_filter(dialect, term))
        }
        Term::Unparsed { raw, .. } => Filter::Complex {
            expression: raw.clone(),
            negate: false,
        },
        _ => complex_filter(dialect, term),
    }
}

/// Tries to read `field_term <op> value_term` as a basic comparison filter,
/// requiring `field_term` to itself be a plain column reference — the same
/// restriction `_basic_criterion_to_filter` places on `where.left`.
fn basic_criterion_filter(
    dialect: SqlDialect,
    field_term: &Term,
    op: BinaryOp,
    value_term: &Term,
    term_to_axes: &HashMap<String, AxisInfo>,
) -> Option<Filter> {
    if !matches!(field_term.unwrap_paren(), Term::Field { .. }) {
        return None;
    }
    let name = filter_name(dialect, field_term, term_to_axes);
    let value = term_to_domain_limit(value_term);

    Some(match op {
        BinaryOp::Lt | BinaryOp::LtEq => Filter::Numeric {
            name,
            domain: (None, value),
            negate: false,
        },
        BinaryOp::Gt | BinaryOp::GtEq => Filter::Numeric {
            name,
            domain: (value, None),
            negate: false,
        },
        BinaryOp::Eq | BinaryOp::Is => Filter::Comparison {
            name,
            values: value.into_iter().collect(),
            negate: false,
        },
        BinaryOp::NotEq | BinaryOp::IsNot => Filter::Comparison {
            name,
            values: value.into_iter().collect(),
            negate: true,
        },
        BinaryOp::Like | BinaryOp::ILike => Filter::Like {
            name,
            value: value.unwrap_or_else(|| DomainLimit::Text(String::new())),
            negate: false,
        },
        BinaryOp::NotLike | BinaryOp::NotILike => Filter::Like {
            name,
            value: value.unwrap_or_else(|| DomainLimit::Text(String::new())),
            negate: true,
        },
        _ => return None,
    })
}

/// Flips a comparator the way `10 < field` reads as `field > 10`.
fn swap_comparison(op: BinaryOp) -> BinaryOp {
    match op {
        BinaryOp::Lt => BinaryOp::Gt,
        BinaryOp::LtEq => BinaryOp::GtEq,
        BinaryOp::Gt => BinaryOp::Lt,
        BinaryOp::GtEq => BinaryOp::LtEq,
        other => other,
    }
}

fn filter_name(dialect: SqlDialect, term: &Term, term_to_axes: &HashMap<String, AxisInfo>) -> String {
    let key = term_key(dialect, term);
    term_to_axes
        .get(&key)
        .map(|axis| axis.name.clone())
        .or_else(|| term.field_path())
        .unwrap_or(key)
}

fn term_to_domain_limit(term: &Term) -> Option<DomainLimit> {
    match term {
        Term::Literal { value, .. } => Some(match value {
            Literal::Integer(i) => DomainLimit::Int(*i),
            Literal::Float(f) => DomainLimit::Float(*f),
            Literal::String(s) => DomainLimit::Text(s.clone()),
            Literal::Boolean(b) => DomainLimit::Text(b.to_string()),
            Literal::Null => DomainLimit::Text("null".to_string()),
        }),
        _ => None,
    }
}

/// A criterion that couldn't be read as a basic/range/contains/null filter —
/// an `OR` chain, a function call, a subquery. Grounded on
/// `_complex_criterion_to_filter`.
fn complex_filter(dialect: SqlDialect, term: &Term) -> Filter {
    Filter::Complex {
        expression: sqlviz_serializer::normalize_query(&term_key(dialect, term)),
        negate: false,
    }
}
