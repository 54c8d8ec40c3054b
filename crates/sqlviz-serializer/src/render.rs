// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Renders a [`SqlTree`] to SQL text.
//!
//! Grounded on `SqlTree.build_str`'s dialect dispatch
//! (`SqlDialect::SQLITE`/`MY_SQL` -> backtick-quoting queries,
//! `SNOWFLAKE_SQL` -> double-quote-quoting queries, `GOOGLE_SQL` ->
//! `MySQLQuery` per the original's dispatch table, so it also backtick-quotes)
//! and on `_sanitize_tree`'s star-collapse rule (`base_compiler.py`): a
//! `SELECT *` anywhere in the select list collapses the whole list to a
//! bare `*`, matching how the compiler itself builds trees.

use sqlviz_ir::{BinaryOp, Join, Literal, OrderBy, SortDirection, SqlDialect, SqlTree, TableRef, Term};

fn quote_char(dialect: SqlDialect) -> char {
    match dialect {
        SqlDialect::Snowflake => '"',
        SqlDialect::Sqlite | SqlDialect::MySql | SqlDialect::GoogleSql => '`',
    }
}

fn quote_ident(dialect: SqlDialect, name: &str) -> String {
    let q = quote_char(dialect);
    let escaped = name.replace(q, &format!("{q}{q}"));
    format!("{q}{escaped}{q}")
}

/// Renders an alias identifier. Snowflake's query builder cannot parse a
/// quoted alias (`pypika_patch.py` sets `ALIAS_QUOTE_CHAR = None` for this
/// reason), so aliases render bare there while the dialect's own
/// identifiers still get quoted.
fn quote_alias(dialect: SqlDialect, alias: &str) -> String {
    match dialect {
        SqlDialect::Snowflake => alias.to_string(),
        SqlDialect::Sqlite | SqlDialect::MySql | SqlDialect::GoogleSql => {
            quote_ident(dialect, alias)
        }
    }
}

fn render_table_ref(dialect: SqlDialect, table: &TableRef) -> String {
    match &table.alias {
        Some(alias) => format!(
            "{} AS {}",
            quote_ident(dialect, &table.name),
            quote_alias(dialect, alias)
        ),
        None => quote_ident(dialect, &table.name),
    }
}

fn render_literal(lit: &Literal) -> String {
    match lit {
        Literal::Null => "NULL".to_string(),
        Literal::Boolean(true) => "TRUE".to_string(),
        Literal::Boolean(false) => "FALSE".to_string(),
        Literal::Integer(i) => i.to_string(),
        Literal::Float(f) => f.to_string(),
        Literal::String(s) => format!("'{}'", s.replace('\'', "''")),
    }
}

fn binary_op_str(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::Concat => "||",
        BinaryOp::Eq => "=",
        BinaryOp::NotEq => "<>",
        BinaryOp::Lt => "<",
        BinaryOp::LtEq => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::GtEq => ">=",
        BinaryOp::And => "AND",
        BinaryOp::Or => "OR",
        BinaryOp::Like => "LIKE",
        BinaryOp::NotLike => "NOT LIKE",
        BinaryOp::ILike => "ILIKE",
        BinaryOp::NotILike => "NOT ILIKE",
        BinaryOp::Is => "IS",
        BinaryOp::IsNot => "IS NOT",
    }
}

/// Renders a single expression, ignoring any `alias` the node carries —
/// aliases only apply to top-level select items, rendered separately by
/// [`render_select_item`]. Exposed publicly as the canonical "expression
/// text" of a term, used by `sqlviz-generator`/`sqlviz-compiler` the way
/// `term_to_str`/`term.get_sql()` is used throughout `base_generator.py` to
/// key alias/group-by lookup tables and to render unparsed fallback text.
pub fn render_expr(dialect: SqlDialect, term: &Term) -> String {
    match term {
        Term::Star { table } => match table {
            Some(t) => format!("{}.*", quote_ident(dialect, t)),
            None => "*".to_string(),
        },
        Term::Field { table, name, .. } => match table {
            Some(t) => format!(
                "{}.{}",
                quote_ident(dialect, t),
                quote_ident(dialect, name)
            ),
            None => quote_ident(dialect, name),
        },
        Term::Literal { value, .. } => render_literal(value),
        Term::BinaryOp { left, op, right, .. } => format!(
            "{} {} {}",
            render_expr(dialect, left),
            binary_op_str(*op),
            render_expr(dialect, right)
        ),
        Term::Not { term, .. } => format!("NOT {}", render_expr(dialect, term)),
        Term::In {
            term,
            list,
            negate,
            ..
        } => {
            let items: Vec<String> = list.iter().map(|t| render_expr(dialect, t)).collect();
            format!(
                "{} {}IN ({})",
                render_expr(dialect, term),
                if *negate { "NOT " } else { "" },
                items.join(", ")
            )
        }
        Term::Between {
            term,
            low,
            high,
            negate,
            ..
        } => format!(
            "{} {}BETWEEN {} AND {}",
            render_expr(dialect, term),
            if *negate { "NOT " } else { "" },
            render_expr(dialect, low),
            render_expr(dialect, high)
        ),
        Term::IsNull { term, negate, .. } => format!(
            "{} IS {}NULL",
            render_expr(dialect, term),
            if *negate { "NOT " } else { "" }
        ),
        Term::Function {
            name, args, distinct, ..
        } => render_call(dialect, name, args, *distinct),
        Term::Aggregate {
            name,
            args,
            distinct,
            percentile,
            ..
        } => {
            if name == "APPROXIMATE_PERCENTILE" {
                let inner = args
                    .iter()
                    .map(|a| render_expr(dialect, a))
                    .collect::<Vec<_>>()
                    .join(", ");
                let pct = percentile.unwrap_or(0.5);
                format!("APPROXIMATE_PERCENTILE({inner} USING PARAMETERS PERCENTILE = {pct})")
            } else {
                render_call(dialect, name, args, *distinct)
            }
        }
        Term::Cast { term, type_name, .. } => {
            format!("CAST({} AS {})", render_expr(dialect, term), type_name)
        }
        Term::Extract { date_part, term, .. } => {
            format!("EXTRACT({} FROM {})", date_part, render_expr(dialect, term))
        }
        Term::Case {
            conditions,
            results,
            else_result,
            ..
        } => {
            let mut out = String::from("CASE");
            for (cond, res) in conditions.iter().zip(results.iter()) {
                out.push_str(&format!(
                    " WHEN {} THEN {}",
                    render_expr(dialect, cond),
                    render_expr(dialect, res)
                ));
            }
            if let Some(else_result) = else_result {
                out.push_str(&format!(" ELSE {}", render_expr(dialect, else_result)));
            }
            out.push_str(" END");
            out
        }
        Term::Analytic { function, window, .. } => {
            let func = render_expr(dialect, function);
            match window {
                None => format!("{func} IGNORE NULLS"),
                Some(w) => {
                    let mut clauses = Vec::new();
                    if !w.partition_by.is_empty() {
                        clauses.push(format!(
                            "PARTITION BY {}",
                            w.partition_by
                                .iter()
                                .map(|t| render_expr(dialect, t))
                                .collect::<Vec<_>>()
                                .join(", ")
                        ));
                    }
                    if !w.order_by.is_empty() {
                        clauses.push(format!(
                            "ORDER BY {}",
                            w.order_by
                                .iter()
                                .map(|(t, asc)| format!(
                                    "{} {}",
                                    render_expr(dialect, t),
                                    if *asc { "ASC" } else { "DESC" }
                                ))
                                .collect::<Vec<_>>()
                                .join(", ")
                        ));
                    }
                    let over = format!("{func} OVER ({})", clauses.join(" "));
                    if w.ignore_nulls {
                        format!("{over} IGNORE NULLS")
                    } else {
                        over
                    }
                }
            }
        }
        Term::Paren { term, .. } => format!("({})", render_expr(dialect, term)),
        Term::Unparsed { raw, .. } => raw.clone(),
    }
}

fn render_call(dialect: SqlDialect, name: &str, args: &[Term], distinct: bool) -> String {
    let rendered_args: Vec<String> = args.iter().map(|a| render_expr(dialect, a)).collect();
    let args_str = if args.is_empty() && name.eq_ignore_ascii_case("COUNT") {
        "*".to_string()
    } else {
        rendered_args.join(", ")
    };
    format!(
        "{name}({}{args_str})",
        if distinct { "DISTINCT " } else { "" }
    )
}

/// Renders a select-list item: its expression, plus `AS <alias>` if set.
fn render_select_item(dialect: SqlDialect, term: &Term) -> String {
    let expr = render_expr(dialect, term);
    match term.alias() {
        Some(alias) => format!("{expr} AS {}", quote_alias(dialect, alias)),
        None => expr,
    }
}

fn render_order_by(dialect: SqlDialect, order_by: &OrderBy) -> String {
    format!(
        "{} {}",
        render_expr(dialect, &order_by.term),
        match order_by.direction {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    )
}

fn render_join(dialect: SqlDialect, join: &Join) -> String {
    format!(
        "JOIN {} ON {}",
        render_table_ref(dialect, &join.table),
        render_expr(dialect, &join.on)
    )
}

/// Renders a full `SqlTree` to SQL text.
///
/// Collapses the select list to a bare `*` if any entry is a `Term::Star`,
/// matching `BaseCompiler._sanitize_tree`'s behavior when building a tree,
/// and applied here too so a hand-built tree with a stray `*` mixed with
/// other columns still renders valid SQL.
pub fn serialize(tree: &SqlTree) -> String {
    let dialect = tree.dialect;
    let mut out = String::from("SELECT ");

    if tree.select_terms.iter().any(Term::is_star) {
        out.push('*');
    } else {
        let items: Vec<String> = tree
            .select_terms
            .iter()
            .map(|t| render_select_item(dialect, t))
            .collect();
        out.push_str(&items.join(", "));
    }

    if let Some(from) = &tree.from_term {
        out.push_str(" FROM ");
        out.push_str(&render_table_ref(dialect, from));
    }

    for join in &tree.joins {
        out.push(' ');
        out.push_str(&render_join(dialect, join));
    }

    if let Some(where_term) = &tree.where_term {
        out.push_str(" WHERE ");
        out.push_str(&render_expr(dialect, where_term));
    }

    if !tree.groupby_terms.is_empty() {
        out.push_str(" GROUP BY ");
        let items: Vec<String> = tree
            .groupby_terms
            .iter()
            .map(|t| render_expr(dialect, t))
            .collect();
        out.push_str(&items.join(", "));
    }

    if let Some(having_term) = &tree.having_term {
        out.push_str(" HAVING ");
        out.push_str(&render_expr(dialect, having_term));
    }

    if let Some(order_by) = &tree.orderby {
        out.push_str(" ORDER BY ");
        out.push_str(&render_order_by(dialect, order_by));
    }

    if let Some(limit) = tree.limit {
        out.push_str(&format!(" LIMIT {limit}"));
    }

    out
}
