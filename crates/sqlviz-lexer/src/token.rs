// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Tokens
//!
//! The token set expression fragments are broken into, grounded on
//! `term_parser.py`'s `PyPikaLexer` (an `sly.Lexer` token/regex table).

/// A single lexical token produced by [`crate::lexer::tokenize`].
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Name(String),
    QuotedName(String),
    Integer(i64),
    Decimal(f64),
    Str(String),

    // Operators
    Plus,
    Minus,
    Times,
    Divide,
    Modulo,
    Eq,
    Ne,
    Ne2,
    Lt,
    Le,
    Gt,
    Ge,
    DblPipe,

    // Punctuation
    Dot,
    Comma,
    LParen,
    RParen,

    // Keywords
    In,
    Is,
    As,
    From,
    By,
    Null,
    Nulls,
    Not,
    And,
    Or,
    Case,
    When,
    Then,
    Else,
    End,
    Distinct,
    Between,
    True_,
    False_,
    Over,
    Ignore,
    Partition,
    Using,
    Parameters,
    Percentile,
    Order,
    Asc,
    Desc,
    Cast,
    Extract,
    ApproximatePercentile,
    Like,
    ILike,

    // SQL types
    IntegerType,
    FloatType,
    NumericType,
    SignedType,
    UnsignedType,
    BooleanType,
    CharType,
    VarcharType,
    BinaryType,
    VarbinaryType,
    LongType,

    // Time units
    Year,
    Quarter,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Microsecond,
}

/// Maps an uppercased identifier to its keyword token, matching
/// `PyPikaLexer.special_tokens`. Returns `None` for plain names.
pub fn keyword(upper: &str) -> Option<Token> {
    use Token::*;
    Some(match upper {
        "IN" => In,
        "IS" => Is,
        "AS" => As,
        "FROM" => From,
        "BY" => By,
        "NULL" => Null,
        "NULLS" => Nulls,
        "NOT" => Not,
        "AND" => And,
        "OR" => Or,
        "CASE" => Case,
        "WHEN" => When,
        "THEN" => Then,
        "ELSE" => Else,
        "END" => End,
        "DISTINCT" => Distinct,
        "BETWEEN" => Between,
        "TRUE" => True_,
        "FALSE" => False_,
        "OVER" => Over,
        "IGNORE" => Ignore,
        "PARTITION" => Partition,
        "USING" => Using,
        "PARAMETERS" => Parameters,
        "PERCENTILE" => Percentile,
        "ORDER" => Order,
        "ASC" => Asc,
        "DESC" => Desc,
        "CAST" => Cast,
        "APPROXIMATE_PERCENTILE" => ApproximatePercentile,
        "EXTRACT" => Extract,
        "LIKE" => Like,
        "ILIKE" => ILike,
        "INTEGER" => IntegerType,
        "FLOAT" => FloatType,
        "NUMERIC" => NumericType,
        "SIGNED" => SignedType,
        "UNSIGNED" => UnsignedType,
        "BOOLEAN" => BooleanType,
        "CHAR" => CharType,
        "VARCHAR" => VarcharType,
        "BINARY" => BinaryType,
        "VARBINARY" => VarbinaryType,
        "LONG" => LongType,
        "YEAR" => Year,
        "QUARTER" => Quarter,
        "MONTH" => Month,
        "WEEK" => Week,
        "DAY" => Day,
        "HOUR" => Hour,
        "MINUTE" => Minute,
        "SECOND" => Second,
        "MICROSECOND" => Microsecond,
        _ => return None,
    })
}
