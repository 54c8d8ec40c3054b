// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Compiles a [`VizSpec`] back into a [`SqlTree`]. Grounded on
//! `deepdive/viz/compiler/base_compiler.py::BaseCompiler`.

use std::collections::HashMap;

use sqlviz_ir::{
    BinaryOp, Breakdown, DatabaseSchema, DomainLimit, Filter, ForeignKey, Join, SortBy, SqlTree,
    Term, VizSpec, XAxis, YAxis,
};

use crate::dialect::{self, DialectCompiler};
use crate::error::{CompileError, CompileResult};
use crate::helper::column_to_term;

/// Bidirectional join criteria between table pairs, built once from a
/// schema's foreign keys. Grounded on `BaseCompiler._construct_join_clauses`
/// (first FK pair found per table-pair wins, matching the original's
/// "doesn't support multiple ways to join a table pair" note).
pub type JoinClauses = HashMap<String, HashMap<String, Term>>;

pub fn construct_join_clauses(schema: &DatabaseSchema) -> JoinClauses {
    let mut join_clauses: JoinClauses = HashMap::new();
    for fk in &schema.foreign_keys {
        insert_join_clause(&mut join_clauses, &fk.primary, &fk.reference);
        insert_join_clause(&mut join_clauses, &fk.reference, &fk.primary);
    }
    join_clauses
}

fn insert_join_clause(join_clauses: &mut JoinClauses, left_path: &str, right_path: &str) {
    let left_table = ForeignKey::table_of(left_path).to_string();
    let right_table = ForeignKey::table_of(right_path).to_string();
    join_clauses
        .entry(left_table)
        .or_default()
        .entry(right_table)
        .or_insert_with(|| field_path_eq(left_path, right_path));
}

fn field_path_eq(left_path: &str, right_path: &str) -> Term {
    Term::BinaryOp {
        left: Box::new(field_from_path(left_path)),
        op: BinaryOp::Eq,
        right: Box::new(field_from_path(right_path)),
        alias: None,
    }
}

fn field_from_path(path: &str) -> Term {
    match path.split_once('.') {
        Some((table, name)) => Term::Field {
            table: Some(table.to_string()),
            name: name.to_string(),
            alias: None,
        },
        None => Term::field(path),
    }
}

/// Walks `tables[1..]`, joining each new table against the first already-
/// added table with a known FK path. A table with no reachable join is
/// silently left out of the resulting joins, matching spec.md's documented
/// behavior for unreachable tables.
pub fn tables_to_joins(tables: &[String], join_clauses: &JoinClauses) -> Vec<Join> {
    let Some((first, rest)) = tables.split_first() else {
        return Vec::new();
    };
    let mut added_tables = vec![first.clone()];
    let mut joins = Vec::new();

    for table_to_add in rest {
        for added_table in &added_tables {
            if let Some(on) = join_clauses
                .get(added_table)
                .and_then(|m| m.get(table_to_add))
            {
                joins.push(Join {
                    table: sqlviz_ir::TableRef::new(table_to_add.clone()),
                    on: on.clone(),
                });
                added_tables.push(table_to_add.clone());
                break;
            }
        }
    }

    joins
}

/// Compiles a chart description into a structured SELECT, per dialect.
/// Grounded on `BaseCompiler.compile`.
pub fn compile(spec: &VizSpec, schema: &DatabaseSchema) -> CompileResult<SqlTree> {
    let dialect = schema.dialect;
    let compiler = dialect::for_dialect(dialect);
    let join_clauses = construct_join_clauses(schema);

    let mut tree = SqlTree::new(dialect);

    let columns_to_terms = columns_to_terms(spec, compiler.as_ref())?;
    let columns_to_aliases = columns_to_aliases(spec);

    if let Some(x_axis) = &spec.x_axis {
        let term = columns_to_terms
            .get(&x_axis.name)
            .expect("x_axis column is always present in columns_to_terms")
            .clone();
        tree.add_select_term(term.clone());

        let term_or_alias = columns_to_aliases
            .get(&x_axis.name)
            .cloned()
            .unwrap_or(term);
        tree.add_groupby_term(term_or_alias.clone());

        if let Some(where_term) = compiler.x_axis_to_where(x_axis, &term_or_alias)? {
            tree.where_term = Some(where_term);
        }
    }

    for breakdown in &spec.breakdowns {
        let term = columns_to_terms
            .get(&breakdown.name)
            .expect("breakdown column is always present in columns_to_terms")
            .clone();
        tree.add_select_term(term.clone());

        let groupby_term = columns_to_aliases
            .get(&breakdown.name)
            .cloned()
            .unwrap_or(term);
        tree.add_groupby_term(groupby_term);
    }

    for y_axis in &spec.y_axes {
        tree.add_select_term(y_axis_to_term(y_axis));
    }

    if !spec.tables.is_empty() {
        tree.from_term = Some(sqlviz_ir::TableRef::new(spec.tables[0].clone()));
        if spec.tables.len() > 1 {
            tree.joins = tables_to_joins(&spec.tables, &join_clauses);
        }
    }

    if !spec.filters.is_empty() {
        let mut where_chain: Option<Term> = None;
        for filter in &spec.filters {
            let criterion = filter_to_where(filter)?;
            where_chain = Some(match where_chain {
                Some(existing) => and(existing, criterion),
                None => criterion,
            });
        }
        if let Some(filters_where) = where_chain {
            tree.where_term = Some(match tree.where_term.take() {
                Some(x_axis_where) => and(x_axis_where, filters_where),
                None => filters_where,
            });
        }
    }

    if spec.limit.is_some() {
        tree.limit = spec.limit;
    }

    if let Some(sort_by) = &spec.sort_by {
        tree.orderby = Some(sort_by_to_orderby(&columns_to_terms, &columns_to_aliases, sort_by)?);
    }

    Ok(sanitize_tree(tree))
}

fn and(left: Term, right: Term) -> Term {
    Term::BinaryOp {
        left: Box::new(left),
        op: BinaryOp::And,
        right: Box::new(right),
        alias: None,
    }
}

/// Collapses the select list to a bare `*` if any select term is itself a
/// star — matches `BaseCompiler._sanitize_tree`.
fn sanitize_tree(mut tree: SqlTree) -> SqlTree {
    if tree.select_terms.iter().any(Term::is_star) {
        tree.select_terms = vec![Term::star()];
    }
    tree
}

fn columns_to_terms(
    spec: &VizSpec,
    compiler: &dyn DialectCompiler,
) -> CompileResult<HashMap<String, Term>> {
    let mut map = HashMap::new();
    if let Some(x_axis) = &spec.x_axis {
        map.insert(x_axis.name.clone(), compiler.x_axis_to_term(x_axis)?);
    }
    for breakdown in &spec.breakdowns {
        map.insert(breakdown.name.clone(), breakdown_to_term(breakdown));
    }
    for y_axis in &spec.y_axes {
        map.insert(y_axis.name.clone(), y_axis_to_term(y_axis));
    }
    Ok(map)
}

fn columns_to_aliases(spec: &VizSpec) -> HashMap<String, Term> {
    let mut map = HashMap::new();
    if let Some(x_axis) = &spec.x_axis {
        if let Some(alias) = &x_axis.alias {
            map.insert(x_axis.name.clone(), Term::field(alias.clone()));
        }
    }
    for breakdown in &spec.breakdowns {
        if let Some(alias) = &breakdown.alias {
            map.insert(breakdown.name.clone(), Term::field(alias.clone()));
        }
    }
    for y_axis in &spec.y_axes {
        if let Some(alias) = &y_axis.alias {
            map.insert(y_axis.name.clone(), Term::field(alias.clone()));
        }
    }
    map
}

/// Grounded on `BaseCompiler.y_axis_to_term`.
pub fn y_axis_to_term(y_axis: &YAxis) -> Term {
    let mut term = if y_axis.unparsed {
        Term::Unparsed {
            raw: y_axis.name.clone(),
            alias: None,
        }
    } else {
        column_to_term(&y_axis.name)
    };

    if let Some(aggregation) = y_axis.aggregation {
        term = Term::Aggregate {
            name: aggregation.as_str().to_string(),
            args: vec![term],
            distinct: false,
            percentile: None,
            alias: None,
        };
    }

    if let Some(alias) = &y_axis.alias {
        term = term.with_alias(alias.clone());
    }
    term
}

/// Grounded on `BaseCompiler.breakdown_to_term`.
pub fn breakdown_to_term(breakdown: &Breakdown) -> Term {
    let mut term = if breakdown.unparsed {
        Term::Unparsed {
            raw: breakdown.name.clone(),
            alias: None,
        }
    } else {
        column_to_term(&breakdown.name)
    };
    if let Some(alias) = &breakdown.alias {
        term = term.with_alias(alias.clone());
    }
    term
}

/// Grounded on `BaseCompiler.filter_to_where`. Unlike `x_axis_to_where`'s
/// `>=`/`<=` bounds, single-sided numeric filters here use strict `>`/`<`,
/// matching the original's divergence between the two call sites.
pub fn filter_to_where(filter: &Filter) -> CompileResult<Term> {
    let mut where_term = match filter {
        Filter::Comparison { name, values, .. } => {
            if values.len() == 1 {
                let value = &values[0];
                if matches!(value, DomainLimit::Text(s) if s == "null") {
                    Term::IsNull {
                        term: Box::new(Term::field(name.clone())),
                        negate: false,
                        alias: None,
                    }
                } else {
                    Term::BinaryOp {
                        left: Box::new(Term::field(name.clone())),
                        op: BinaryOp::Eq,
                        right: Box::new(domain_limit_term(value)),
                        alias: None,
                    }
                }
            } else {
                Term::In {
                    term: Box::new(Term::field(name.clone())),
                    list: values.iter().map(domain_limit_term).collect(),
                    negate: false,
                    alias: None,
                }
            }
        }
        Filter::Numeric { name, domain, .. } => numeric_filter_where(name, domain),
        Filter::Like { name, value, .. } => Term::BinaryOp {
            left: Box::new(Term::field(name.clone())),
            op: BinaryOp::Like,
            right: Box::new(domain_limit_term(value)),
            alias: None,
        },
        Filter::Complex { expression, .. } => {
            let term = sqlviz_parser::parse_term(expression);
            if !is_basic_criterion(&term) {
                tracing::warn!(
                    expression = %expression,
                    "complex filter expression is not a basic criterion"
                );
            }
            term
        }
    };

    if filter.negate() {
        where_term = Term::Not {
            term: Box::new(where_term),
            alias: None,
        };
    }

    Ok(where_term)
}

fn numeric_filter_where(name: &str, domain: &sqlviz_ir::Domain) -> Term {
    let field = Term::field(name.to_string());
    match domain {
        (Some(low), Some(high)) => Term::Between {
            term: Box::new(field),
            low: Box::new(domain_limit_term(low)),
            high: Box::new(domain_limit_term(high)),
            negate: false,
            alias: None,
        },
        (Some(low), None) => Term::BinaryOp {
            left: Box::new(field),
            op: BinaryOp::Gt,
            right: Box::new(domain_limit_term(low)),
            alias: None,
        },
        (None, Some(high)) => Term::BinaryOp {
            left: Box::new(field),
            op: BinaryOp::Lt,
            right: Box::new(domain_limit_term(high)),
            alias: None,
        },
        (None, None) => field,
    }
}

fn domain_limit_term(limit: &DomainLimit) -> Term {
    crate::dialect::domain_limit_term(limit)
}

fn is_basic_criterion(term: &Term) -> bool {
    matches!(
        term,
        Term::BinaryOp { .. } | Term::In { .. } | Term::Between { .. } | Term::IsNull { .. } | Term::Not { .. }
    )
}

/// Grounded on `BaseCompiler.sort_by_to_term`.
pub fn sort_by_to_orderby(
    columns_to_terms: &HashMap<String, Term>,
    columns_to_aliases: &HashMap<String, Term>,
    sort_by: &SortBy,
) -> CompileResult<sqlviz_ir::OrderBy> {
    let term = if sort_by.unparsed {
        sqlviz_parser::parse_term(&sort_by.name)
    } else if let Some(alias_term) = columns_to_aliases.get(&sort_by.name) {
        alias_term.clone()
    } else if let Some(term) = columns_to_terms.get(&sort_by.name) {
        term.clone()
    } else {
        Term::field(sort_by.name.clone())
    };

    Ok(sqlviz_ir::OrderBy {
        term,
        direction: sort_by.direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlviz_ir::{Aggregation, ColumnSchema, ColumnType, SqlDialect, TableSchema, VizSpecParams};

    fn schema_with_fk() -> DatabaseSchema {
        DatabaseSchema::new(SqlDialect::Sqlite)
            .with_table(TableSchema::new(
                "customers",
                vec![ColumnSchema::new("id", ColumnType::Id)],
            ))
            .with_table(TableSchema::new(
                "orders",
                vec![ColumnSchema::new("customer_id", ColumnType::Id)],
            ))
            .with_foreign_key(ForeignKey::new("customers.id", "orders.customer_id"))
    }

    #[test]
    fn join_clauses_are_bidirectional() {
        let clauses = construct_join_clauses(&schema_with_fk());
        assert!(clauses.get("customers").unwrap().contains_key("orders"));
        assert!(clauses.get("orders").unwrap().contains_key("customers"));
    }

    #[test]
    fn compile_simple_count_by_status() {
        let schema = DatabaseSchema::new(SqlDialect::Sqlite).with_table(TableSchema::new(
            "orders",
            vec![ColumnSchema::new("status", ColumnType::Text)],
        ));
        let spec = VizSpec::new(VizSpecParams {
            x_axis: Some(XAxis::new("status")),
            y_axes: vec![YAxis {
                name: "*".to_string(),
                aggregation: Some(Aggregation::Count),
                ..Default::default()
            }],
            tables: vec!["orders".to_string()],
            ..Default::default()
        })
        .unwrap();

        let tree = compile(&spec, &schema).unwrap();
        assert_eq!(tree.select_terms.len(), 2);
        assert_eq!(tree.groupby_terms.len(), 1);
        assert_eq!(tree.from_term.unwrap().name, "orders");
    }

    #[test]
    fn two_tables_produce_a_join() {
        let schema = schema_with_fk();
        let spec = VizSpec::new(VizSpecParams {
            x_axis: Some(XAxis::new("id")),
            tables: vec!["customers".to_string(), "orders".to_string()],
            ..Default::default()
        })
        .unwrap();

        let tree = compile(&spec, &schema).unwrap();
        assert_eq!(tree.joins.len(), 1);
        assert_eq!(tree.joins[0].table.name, "orders");
    }

    #[test]
    fn single_value_comparison_filter_becomes_equality() {
        let filter = Filter::Comparison {
            name: "status".to_string(),
            values: vec![DomainLimit::Text("active".to_string())],
            negate: false,
        };
        let term = filter_to_where(&filter).unwrap();
        assert!(matches!(term, Term::BinaryOp { op: BinaryOp::Eq, .. }));
    }

    #[test]
    fn null_comparison_filter_becomes_is_null() {
        let filter = Filter::Comparison {
            name: "email".to_string(),
            values: vec![DomainLimit::Text("null".to_string())],
            negate: false,
        };
        let term = filter_to_where(&filter).unwrap();
        assert!(matches!(term, Term::IsNull { .. }));
    }

    #[test]
    fn negated_filter_wraps_in_not() {
        let filter = Filter::Comparison {
            name: "status".to_string(),
            values: vec![DomainLimit::Text("active".to_string())],
            negate: true,
        };
        let term = filter_to_where(&filter).unwrap();
        assert!(matches!(term, Term::Not { .. }));
    }
}
