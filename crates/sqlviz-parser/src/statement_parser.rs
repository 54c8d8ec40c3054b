// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Statement parser
//!
//! Splits a whole `SELECT` statement into its clauses and assembles a
//! [`SqlTree`], grounded on `statement_parser.py`'s `parse_statement`. The
//! original leans on `sqlparse`'s tokenizer plus `sql_metadata` for the
//! `LIMIT` value; neither has an equivalent crate in this stack, so the
//! clause split below walks the sanitized query text directly, tracking
//! parenthesis depth and quoted spans the same way [`crate::term_parser`]'s
//! `AS`-splitter does, and looks for the same keyword set
//! (`statement_parser.py::SECTION_KEYWORDS`, extended with the join
//! variants `sqlparse` tokenizes as a single compound keyword).

use sqlviz_ir::{Join, OrderBy, SortDirection, SqlDialect, SqlTree, TableRef};
use sqlviz_lexer::sanitize_query;

use crate::error::{ParseError, ParseResult};
use crate::term_parser::{has_quotes, parse_term, strip_quotes};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Select,
    From,
    Join,
    Where,
    GroupBy,
    Having,
    OrderBy,
    Limit,
}

/// Longest-phrase-first so a join variant like `"left join"` is matched
/// whole rather than leaving a dangling `"join"` behind.
const KEYWORDS: &[(&str, Section)] = &[
    ("left outer join", Section::Join),
    ("right outer join", Section::Join),
    ("full outer join", Section::Join),
    ("cross join", Section::Join),
    ("inner join", Section::Join),
    ("left join", Section::Join),
    ("right join", Section::Join),
    ("full join", Section::Join),
    ("group by", Section::GroupBy),
    ("order by", Section::OrderBy),
    ("having", Section::Having),
    ("select", Section::Select),
    ("where", Section::Where),
    ("limit", Section::Limit),
    ("from", Section::From),
    ("join", Section::Join),
];

/// Parses a single `SELECT` statement into a [`SqlTree`]. `dialect` is the
/// dialect the resulting tree (and any later generate/compile step) is
/// associated with; the clause grammar itself does not vary by dialect.
pub fn parse_sql(sql: &str, dialect: SqlDialect) -> ParseResult<SqlTree> {
    let sanitized = sanitize_query(sql);
    let statements = split_top_level_statements(&sanitized);

    if statements.is_empty() {
        return Err(ParseError::NotASelectStatement);
    }
    if statements.len() > 1 {
        return Err(ParseError::MultipleStatements);
    }
    let stmt = statements[0].trim();

    if !starts_with_word(stmt, "select") {
        return Err(ParseError::NotASelectStatement);
    }

    let spans = scan_clause_spans(stmt);
    let mut select_content: Option<&str> = None;
    let mut from_content: Option<&str> = None;
    let mut join_contents: Vec<&str> = Vec::new();
    let mut where_content: Option<&str> = None;
    let mut groupby_content: Option<&str> = None;
    let mut having_content: Option<&str> = None;
    let mut orderby_content: Option<&str> = None;
    let mut limit_content: Option<&str> = None;

    for (section, content) in &spans {
        match section {
            Section::Select => select_content = Some(content),
            Section::From => from_content = Some(content),
            Section::Join => join_contents.push(content),
            Section::Where => where_content = Some(content),
            Section::GroupBy => groupby_content = Some(content),
            Section::Having => having_content = Some(content),
            Section::OrderBy => orderby_content = Some(content),
            Section::Limit => limit_content = Some(content),
        }
    }

    let select_terms = parse_select_terms(select_content.unwrap_or(""))?;

    let from_term = match from_content {
        Some(content) => Some(parse_table_alias(content)?),
        None => return Err(ParseError::MissingFromClause),
    };

    let joins = join_contents
        .into_iter()
        .map(parse_join)
        .collect::<ParseResult<Vec<_>>>()?;

    let where_term = where_content
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_term);

    let having_term = having_content
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_term);

    let groupby_terms = groupby_content
        .map(split_top_level_commas)
        .unwrap_or_default()
        .into_iter()
        .map(parse_term)
        .collect();

    let orderby = orderby_content.map(parse_orderby).transpose()?.flatten();

    let limit = limit_content.map(parse_limit).transpose()?;

    let mut tree = SqlTree::new(dialect);
    tree.select_terms = select_terms;
    tree.from_term = from_term;
    tree.joins = joins;
    tree.where_term = where_term;
    tree.having_term = having_term;
    tree.groupby_terms = groupby_terms;
    tree.orderby = orderby;
    tree.limit = limit;

    Ok(tree)
}

fn parse_select_terms(content: &str) -> ParseResult<Vec<sqlviz_ir::Term>> {
    let pieces = split_top_level_commas(content);
    if pieces.is_empty() {
        return Err(ParseError::EmptySelectList);
    }
    Ok(pieces
        .into_iter()
        .map(|piece| {
            if piece.trim() == "*" {
                sqlviz_ir::Term::star()
            } else {
                parse_term(piece)
            }
        })
        .collect())
}

/// Parses a `table`, `table alias`, or `table AS alias` fragment, the same
/// grammar `statement_parser.py::_parse_table_alias` accepts.
fn parse_table_alias(content: &str) -> ParseResult<TableRef> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    match tokens.as_slice() {
        [] => Err(ParseError::InvalidFromClause(content.to_string())),
        [name] => Ok(TableRef::new(unquote(name))),
        [name, alias] => Ok(TableRef::new(unquote(name)).with_alias(unquote(alias))),
        [name, as_kw, alias] if as_kw.eq_ignore_ascii_case("as") => {
            Ok(TableRef::new(unquote(name)).with_alias(unquote(alias)))
        }
        _ => Err(ParseError::InvalidFromClause(content.to_string())),
    }
}

fn parse_join(content: &str) -> ParseResult<Join> {
    let on_pos = find_top_level_word(content, "on")
        .ok_or_else(|| ParseError::MalformedJoin(content.to_string()))?;
    let table_part = content[..on_pos].trim();
    let on_part = content[on_pos + 2..].trim();
    Ok(Join {
        table: parse_table_alias(table_part)?,
        on: parse_term(on_part),
    })
}

fn parse_orderby(content: &str) -> ParseResult<Option<OrderBy>> {
    let first = split_top_level_commas(content).into_iter().next();
    let Some(first) = first.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let lower = first.to_ascii_lowercase();
    let (expr, direction) = if lower.ends_with(" asc") {
        (first[..first.len() - 4].trim_end(), SortDirection::Asc)
    } else if lower.ends_with(" desc") {
        (first[..first.len() - 5].trim_end(), SortDirection::Desc)
    } else {
        (first, SortDirection::Asc)
    };

    Ok(Some(OrderBy {
        term: parse_term(expr),
        direction,
    }))
}

fn parse_limit(content: &str) -> ParseResult<i64> {
    content
        .trim()
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidLimit(content.to_string()))
}

fn unquote(s: &str) -> &str {
    if has_quotes(s) {
        strip_quotes(s)
    } else {
        s
    }
}

fn starts_with_word(s: &str, word: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    lower == word
        || (lower.starts_with(word)
            && lower
                .as_bytes()
                .get(word.len())
                .map(|b| !is_word_byte(*b))
                .unwrap_or(true))
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Splits on top-level (depth 0, outside quotes) `;` characters, discarding
/// any empty trailing statement left by a terminating semicolon.
fn split_top_level_statements(s: &str) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut depth: i32 = 0;
    let mut quote: Option<u8> = None;
    let mut start = 0usize;
    let mut out = Vec::new();

    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match c {
            b'\'' | b'`' => {
                quote = Some(c);
                i += 1;
            }
            b'(' => {
                depth += 1;
                i += 1;
            }
            b')' => {
                depth -= 1;
                i += 1;
            }
            b';' if depth == 0 => {
                out.push(&s[start..i]);
                start = i + 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    out.push(&s[start..]);
    out.into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Walks `stmt` once, recording each top-level clause keyword it finds, and
/// returns the clause keyword paired with the text up to the next keyword
/// (or the end of the statement).
fn scan_clause_spans(stmt: &str) -> Vec<(Section, &str)> {
    let bytes = stmt.as_bytes();
    let len = bytes.len();
    let mut depth: i32 = 0;
    let mut quote: Option<u8> = None;
    let mut matches: Vec<(Section, usize, usize)> = Vec::new();
    let mut i = 0;

    while i < len {
        let c = bytes[i];
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match c {
            b'\'' | b'`' => {
                quote = Some(c);
                i += 1;
                continue;
            }
            b'(' => {
                depth += 1;
                i += 1;
                continue;
            }
            b')' => {
                depth -= 1;
                i += 1;
                continue;
            }
            _ => {}
        }

        if depth == 0 {
            if let Some((phrase, section)) = match_keyword_at(stmt, i) {
                matches.push((section, i, i + phrase.len()));
                i += phrase.len();
                continue;
            }
        }
        i += 1;
    }

    let mut spans = Vec::with_capacity(matches.len());
    for (idx, (section, _start, end)) in matches.iter().enumerate() {
        let next_start = matches.get(idx + 1).map(|m| m.1).unwrap_or(len);
        spans.push((*section, stmt[*end..next_start].trim()));
    }
    spans
}

fn match_keyword_at(stmt: &str, pos: usize) -> Option<(&'static str, Section)> {
    let bytes = stmt.as_bytes();
    for (phrase, section) in KEYWORDS {
        let plen = phrase.len();
        if pos + plen > bytes.len() {
            continue;
        }
        if !stmt[pos..pos + plen].eq_ignore_ascii_case(phrase) {
            continue;
        }
        let before_ok = pos == 0 || !is_word_byte(bytes[pos - 1]);
        let after_ok = pos + plen == bytes.len() || !is_word_byte(bytes[pos + plen]);
        if before_ok && after_ok {
            return Some((phrase, *section));
        }
    }
    None
}

/// Finds the first top-level (depth 0, outside quotes) occurrence of the
/// word `word`, used to split a join's table part from its `ON` condition.
fn find_top_level_word(s: &str, word: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let len = bytes.len();
    let wlen = word.len();
    let mut depth: i32 = 0;
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < len {
        let c = bytes[i];
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match c {
            b'\'' | b'`' => {
                quote = Some(c);
                i += 1;
                continue;
            }
            b'(' => {
                depth += 1;
                i += 1;
                continue;
            }
            b')' => {
                depth -= 1;
                i += 1;
                continue;
            }
            _ => {}
        }
        if depth == 0
            && i + wlen <= len
            && s[i..i + wlen].eq_ignore_ascii_case(word)
            && (i == 0 || !is_word_byte(bytes[i - 1]))
            && (i + wlen == len || !is_word_byte(bytes[i + wlen]))
        {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Splits on top-level (depth 0, outside quotes) commas, trimming each
/// piece and dropping empty ones.
fn split_top_level_commas(s: &str) -> Vec<&str> {
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut depth: i32 = 0;
    let mut quote: Option<u8> = None;
    let mut start = 0usize;
    let mut out = Vec::new();
    let mut i = 0;

    while i < len {
        let c = bytes[i];
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match c {
            b'\'' | b'`' => {
                quote = Some(c);
                i += 1;
            }
            b'(' => {
                depth += 1;
                i += 1;
            }
            b')' => {
                depth -= 1;
                i += 1;
            }
            b',' if depth == 0 => {
                out.push(&s[start..i]);
                start = i + 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    out.push(&s[start..]);
    out.into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlviz_ir::Term;
    use sqlviz_test_utils::SqlFixtures;

    #[test]
    fn parses_fixture_queries_with_joins_and_aggregation() {
        let tree = parse_sql(SqlFixtures::multiple_joins(), SqlDialect::Sqlite).unwrap();
        assert_eq!(tree.joins.len(), 2);

        let tree = parse_sql(SqlFixtures::group_by_having(), SqlDialect::Sqlite).unwrap();
        assert_eq!(tree.groupby_terms.len(), 1);
        assert!(tree.having_term.is_some());
    }

    #[test]
    fn parses_simple_select() {
        let tree = parse_sql("select a, b from customer", SqlDialect::Sqlite).unwrap();
        assert_eq!(tree.select_terms.len(), 2);
        assert_eq!(tree.from_term, Some(TableRef::new("customer")));
    }

    #[test]
    fn parses_select_star() {
        let tree = parse_sql("select * from customer", SqlDialect::Sqlite).unwrap();
        assert_eq!(tree.select_terms, vec![Term::star()]);
    }

    #[test]
    fn parses_from_alias_with_as() {
        let tree = parse_sql("select a from customer as c", SqlDialect::Sqlite).unwrap();
        assert_eq!(
            tree.from_term,
            Some(TableRef::new("customer").with_alias("c"))
        );
    }

    #[test]
    fn parses_from_alias_without_as() {
        let tree = parse_sql("select a from customer c", SqlDialect::Sqlite).unwrap();
        assert_eq!(
            tree.from_term,
            Some(TableRef::new("customer").with_alias("c"))
        );
    }

    #[test]
    fn parses_join_with_on() {
        let tree = parse_sql(
            "select a from orders o join customer c on o.cid = c.id",
            SqlDialect::Sqlite,
        )
        .unwrap();
        assert_eq!(tree.joins.len(), 1);
        assert_eq!(tree.joins[0].table, TableRef::new("customer").with_alias("c"));
    }

    #[test]
    fn parses_multiple_joins() {
        let tree = parse_sql(
            "select a from orders o \
             join customer c on o.cid = c.id \
             left join region r on c.rid = r.id",
            SqlDialect::Sqlite,
        )
        .unwrap();
        assert_eq!(tree.joins.len(), 2);
        assert_eq!(tree.joins[1].table, TableRef::new("region").with_alias("r"));
    }

    #[test]
    fn parses_where_groupby_having_orderby_limit() {
        let tree = parse_sql(
            "select a, count(*) from t where a > 1 group by a having count(*) > 2 \
             order by a desc limit 10",
            SqlDialect::Sqlite,
        )
        .unwrap();
        assert!(tree.where_term.is_some());
        assert_eq!(tree.groupby_terms.len(), 1);
        assert!(tree.having_term.is_some());
        assert_eq!(tree.orderby.as_ref().unwrap().direction, SortDirection::Desc);
        assert_eq!(tree.limit, Some(10));
    }

    #[test]
    fn orderby_defaults_to_ascending() {
        let tree = parse_sql("select a from t order by a", SqlDialect::Sqlite).unwrap();
        assert_eq!(tree.orderby.unwrap().direction, SortDirection::Asc);
    }

    #[test]
    fn orderby_ignores_all_but_first_column() {
        let tree = parse_sql("select a, b from t order by a, b desc", SqlDialect::Sqlite).unwrap();
        assert_eq!(tree.orderby.unwrap().direction, SortDirection::Asc);
    }

    #[test]
    fn rejects_non_select_statement() {
        let err = parse_sql("delete from t", SqlDialect::Sqlite).unwrap_err();
        assert_eq!(err, ParseError::NotASelectStatement);
    }

    #[test]
    fn rejects_multiple_statements() {
        let err = parse_sql("select a from t; select b from t", SqlDialect::Sqlite).unwrap_err();
        assert_eq!(err, ParseError::MultipleStatements);
    }

    #[test]
    fn rejects_missing_from_clause() {
        let err = parse_sql("select 1", SqlDialect::Sqlite).unwrap_err();
        assert_eq!(err, ParseError::MissingFromClause);
    }

    #[test]
    fn rejects_empty_select_list() {
        let err = parse_sql("select from t", SqlDialect::Sqlite).unwrap_err();
        assert_eq!(err, ParseError::EmptySelectList);
    }

    #[test]
    fn rejects_join_without_on() {
        let err = parse_sql("select a from t join u", SqlDialect::Sqlite).unwrap_err();
        assert!(matches!(err, ParseError::MalformedJoin(_)));
    }

    #[test]
    fn rejects_invalid_limit() {
        let err = parse_sql("select a from t limit abc", SqlDialect::Sqlite).unwrap_err();
        assert!(matches!(err, ParseError::InvalidLimit(_)));
    }

    #[test]
    fn strips_quotes_from_table_and_alias() {
        let tree = parse_sql("select a from `my table` as `t`", SqlDialect::Sqlite).unwrap();
        assert_eq!(
            tree.from_term,
            Some(TableRef::new("my table").with_alias("t"))
        );
    }
}
