// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Integration tests exercising sanitize + tokenize together, the way
//! `sqlviz-parser` drives them for a full expression fragment.

use sqlviz_lexer::{sanitize_query, tokenize, Token};

#[test]
fn sanitizes_then_tokenizes_a_quoted_column() {
    let sanitized = sanitize_query(r#"CAST("order total" AS FLOAT)"#);
    let tokens = tokenize(&sanitized).unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Cast,
            Token::LParen,
            Token::QuotedName("order total".into()),
            Token::As,
            Token::FloatType,
            Token::RParen,
        ]
    );
}

#[test]
fn tokenizes_a_function_call_with_distinct() {
    let tokens = tokenize("COUNT(DISTINCT customer_id)").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Name("COUNT".into()),
            Token::LParen,
            Token::Distinct,
            Token::Name("customer_id".into()),
            Token::RParen,
        ]
    );
}

#[test]
fn tokenizes_an_analytic_window_clause() {
    let tokens = tokenize("SUM(amount) OVER (PARTITION BY region ORDER BY dt)").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Name("SUM".into()),
            Token::LParen,
            Token::Name("amount".into()),
            Token::RParen,
            Token::Over,
            Token::LParen,
            Token::Partition,
            Token::By,
            Token::Name("region".into()),
            Token::Order,
            Token::By,
            Token::Name("dt".into()),
            Token::RParen,
        ]
    );
}

#[test]
fn tokenizes_between_with_negative_numbers() {
    let tokens = tokenize("x between -5 and 5.5").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Name("x".into()),
            Token::Between,
            Token::Minus,
            Token::Integer(5),
            Token::And,
            Token::Decimal(5.5),
        ]
    );
}

#[test]
fn whitespace_collapse_does_not_change_token_stream() {
    let a = tokenize(&sanitize_query("a  =   1")).unwrap();
    let b = tokenize(&sanitize_query("a=1")).unwrap();
    assert_eq!(a, b);
}
