// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Integration tests for SqlTree construction.

use sqlviz_ir::{Join, OrderBy, SortDirection, SqlDialect, SqlTree, TableRef, Term};

#[test]
fn builds_a_simple_select() {
    let mut tree = SqlTree::new(SqlDialect::Sqlite);
    tree.from_term = Some(TableRef::new("customers"));
    tree.add_select_term(Term::field("a"));
    tree.limit = Some(500);

    assert_eq!(tree.select_terms.len(), 1);
    assert_eq!(tree.tables(), vec!["customers"]);
    assert_eq!(tree.limit, Some(500));
}

#[test]
fn join_order_is_preserved() {
    let mut tree = SqlTree::new(SqlDialect::GoogleSql);
    tree.from_term = Some(TableRef::new("customer"));
    tree.joins.push(Join {
        table: TableRef::new("orders"),
        on: Term::BinaryOp {
            left: Box::new(Term::Field {
                table: Some("customer".into()),
                name: "c_custkey".into(),
                alias: None,
            }),
            op: sqlviz_ir::BinaryOp::Eq,
            right: Box::new(Term::Field {
                table: Some("orders".into()),
                name: "o_custkey".into(),
                alias: None,
            }),
            alias: None,
        },
    });

    assert_eq!(tree.tables(), vec!["customer", "orders"]);
}

#[test]
fn orderby_records_term_and_direction() {
    let mut tree = SqlTree::new(SqlDialect::MySql);
    tree.orderby = Some(OrderBy {
        term: Term::field("total"),
        direction: SortDirection::Desc,
    });
    assert_eq!(tree.orderby.unwrap().direction, SortDirection::Desc);
}

#[test]
fn table_ref_alias_is_distinct_from_name() {
    let t = TableRef::new("customers").with_alias("c");
    assert_eq!(t.resolved_name(), "customers");
    assert_eq!(t.alias.as_deref(), Some("c"));
}
