// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Sample SQL queries and a sample schema, grounded on `crates/test-utils`'s
//! `SqlFixtures`/`SchemaFixtures` and on the `orders`/`customers`/`products`
//! tables used throughout `deepdive`'s own viz test suite.

use sqlviz_ir::{ColumnSchema, ColumnType, DatabaseSchema, ForeignKey, SqlDialect, TableSchema};

/// Sample SQL queries covering the shapes this interpreter round-trips.
pub struct SqlFixtures;

impl SqlFixtures {
    pub const fn simple_select() -> &'static str {
        "SELECT id, name FROM customers"
    }

    pub const fn select_all() -> &'static str {
        "SELECT * FROM customers"
    }

    pub const fn select_with_where() -> &'static str {
        "SELECT id, name FROM customers WHERE region = 'US'"
    }

    pub const fn select_with_order_and_limit() -> &'static str {
        "SELECT id, name FROM customers ORDER BY name ASC LIMIT 10"
    }

    pub const fn single_join() -> &'static str {
        "SELECT c.name, o.total \
         FROM orders o \
         JOIN customers c ON o.customer_id = c.id"
    }

    pub const fn multiple_joins() -> &'static str {
        "SELECT c.name, o.total, p.name \
         FROM orders o \
         JOIN customers c ON o.customer_id = c.id \
         JOIN products p ON o.product_id = p.id"
    }

    pub const fn count_aggregation() -> &'static str {
        "SELECT COUNT(*) FROM orders"
    }

    pub const fn group_by() -> &'static str {
        "SELECT status, COUNT(*) as order_count FROM orders GROUP BY status"
    }

    pub const fn group_by_having() -> &'static str {
        "SELECT customer_id, SUM(total) as total_spent \
         FROM orders \
         GROUP BY customer_id \
         HAVING SUM(total) > 1000"
    }

    pub const fn datetime_bucketed() -> &'static str {
        "SELECT strftime('%Y-%m', created_at) as month, SUM(total) as revenue \
         FROM orders \
         GROUP BY strftime('%Y-%m', created_at)"
    }

    pub const fn error_missing_from() -> &'static str {
        "SELECT id, name"
    }

    pub const fn error_multiple_statements() -> &'static str {
        "SELECT id FROM customers; SELECT id FROM orders"
    }
}

/// Sample schema fixtures, grounded on the `orders`/`customers`/`products`
/// fixtures `deepdive`'s own viz test suite constructs inline.
pub struct SchemaFixtures;

impl SchemaFixtures {
    /// A small schema with a `customers`/`orders`/`products` join graph,
    /// one foreign key per join edge, dialect defaulted to SQLite.
    pub fn orders_schema() -> DatabaseSchema {
        Self::orders_schema_for(SqlDialect::Sqlite)
    }

    pub fn orders_schema_for(dialect: SqlDialect) -> DatabaseSchema {
        DatabaseSchema::new(dialect)
            .with_table(Self::customers_table())
            .with_table(Self::orders_table())
            .with_table(Self::products_table())
            .with_foreign_key(ForeignKey::new("orders.customer_id", "customers.id"))
            .with_foreign_key(ForeignKey::new("orders.product_id", "products.id"))
    }

    pub fn customers_table() -> TableSchema {
        TableSchema::new(
            "customers",
            vec![
                ColumnSchema::new("id", ColumnType::Id),
                ColumnSchema::new("name", ColumnType::Text),
                ColumnSchema::new("region", ColumnType::Text),
            ],
        )
    }

    pub fn orders_table() -> TableSchema {
        TableSchema::new(
            "orders",
            vec![
                ColumnSchema::new("id", ColumnType::Id),
                ColumnSchema::new("customer_id", ColumnType::Id),
                ColumnSchema::new("product_id", ColumnType::Id),
                ColumnSchema::new("status", ColumnType::Text),
                ColumnSchema::new("total", ColumnType::Float),
                ColumnSchema::new("created_at", ColumnType::Date),
            ],
        )
    }

    pub fn products_table() -> TableSchema {
        TableSchema::new(
            "products",
            vec![
                ColumnSchema::new("id", ColumnType::Id),
                ColumnSchema::new("name", ColumnType::Text),
                ColumnSchema::new("price", ColumnType::Float),
            ],
        )
    }
}
