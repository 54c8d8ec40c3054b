// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Lexer
//!
//! Turns a single expression fragment (a WHERE/HAVING/ON/SELECT term) into
//! a flat token stream. Grounded on `term_parser.py`'s `PyPikaLexer`
//! regex table, re-expressed as a hand-rolled scanner (the Python original
//! leans on `sly`'s regex-per-token dispatch; there is no equivalent crate
//! in this stack's dependency tree, so the scanner below walks characters
//! directly in the same token order).

use thiserror::Error;

use crate::token::{keyword, Token};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexError {
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("unterminated string literal starting at position {pos}")]
    UnterminatedString { pos: usize },
    #[error("unterminated quoted identifier starting at position {pos}")]
    UnterminatedQuotedName { pos: usize },
}

pub type LexResult<T> = Result<T, LexError>;

struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    fn new(input: &str) -> Self {
        Scanner {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn starts_with(&self, s: &str) -> bool {
        let end = self.pos + s.chars().count();
        if end > self.chars.len() {
            return false;
        }
        self.chars[self.pos..end].iter().collect::<String>() == s
    }
}

/// Tokenizes a single expression fragment. Mirrors `PyPikaLexer.tokenize`:
/// whitespace is ignored, `\n` advances a (here-unused) line counter, and
/// any character matching no rule is a hard [`LexError`] — expression-level
/// lex failures are always caught by the caller and turned into
/// `Term::Unparsed`, never propagated past `sqlviz_parser::parse_term`.
pub fn tokenize(input: &str) -> LexResult<Vec<Token>> {
    let mut scanner = Scanner::new(input);
    let mut tokens = Vec::new();

    while let Some(c) = scanner.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                scanner.advance();
            }
            '"' | '`' => {
                tokens.push(Token::QuotedName(scan_quoted_name(&mut scanner)?));
            }
            '\'' => {
                tokens.push(Token::Str(scan_string(&mut scanner)?));
            }
            '0'..='9' => {
                tokens.push(scan_number(&mut scanner));
            }
            '.' if matches!(scanner.peek_at(1), Some('0'..='9')) => {
                tokens.push(scan_number(&mut scanner));
            }
            '.' => {
                scanner.advance();
                tokens.push(Token::Dot);
            }
            ',' => {
                scanner.advance();
                tokens.push(Token::Comma);
            }
            '(' => {
                scanner.advance();
                tokens.push(Token::LParen);
            }
            ')' => {
                scanner.advance();
                tokens.push(Token::RParen);
            }
            '+' => {
                scanner.advance();
                tokens.push(Token::Plus);
            }
            '-' => {
                scanner.advance();
                tokens.push(Token::Minus);
            }
            '*' => {
                scanner.advance();
                tokens.push(Token::Times);
            }
            '/' => {
                scanner.advance();
                tokens.push(Token::Divide);
            }
            '%' => {
                scanner.advance();
                tokens.push(Token::Modulo);
            }
            '|' if scanner.starts_with("||") => {
                scanner.pos += 2;
                tokens.push(Token::DblPipe);
            }
            '<' if scanner.starts_with("<=") => {
                scanner.pos += 2;
                tokens.push(Token::Le);
            }
            '<' if scanner.starts_with("<>") => {
                scanner.pos += 2;
                tokens.push(Token::Ne);
            }
            '<' => {
                scanner.advance();
                tokens.push(Token::Lt);
            }
            '>' if scanner.starts_with(">=") => {
                scanner.pos += 2;
                tokens.push(Token::Ge);
            }
            '>' => {
                scanner.advance();
                tokens.push(Token::Gt);
            }
            '!' if scanner.starts_with("!=") => {
                scanner.pos += 2;
                tokens.push(Token::Ne2);
            }
            '=' => {
                scanner.advance();
                tokens.push(Token::Eq);
            }
            c if c.is_ascii_alphabetic() => {
                tokens.push(scan_name(&mut scanner));
            }
            other => {
                return Err(LexError::UnexpectedChar {
                    ch: other,
                    pos: scanner.pos,
                });
            }
        }
    }

    Ok(tokens)
}

fn scan_quoted_name(scanner: &mut Scanner) -> LexResult<String> {
    let start = scanner.pos;
    let quote = scanner.advance().unwrap();
    let mut value = String::new();
    loop {
        match scanner.advance() {
            Some(c) if c == quote => break,
            Some('\n') | None => {
                return Err(LexError::UnterminatedQuotedName { pos: start });
            }
            Some(c) => value.push(c),
        }
    }
    Ok(value)
}

fn scan_string(scanner: &mut Scanner) -> LexResult<String> {
    let start = scanner.pos;
    scanner.advance(); // opening quote
    let mut value = String::new();
    loop {
        match scanner.advance() {
            Some('\'') => {
                if scanner.peek() == Some('\'') {
                    scanner.advance();
                    value.push('\'');
                } else {
                    break;
                }
            }
            Some('\n') | None => {
                return Err(LexError::UnterminatedString { pos: start });
            }
            Some(c) => value.push(c),
        }
    }
    Ok(value)
}

fn scan_number(scanner: &mut Scanner) -> Token {
    let start = scanner.pos;
    let mut is_decimal = false;

    while matches!(scanner.peek(), Some('0'..='9')) {
        scanner.advance();
    }
    if scanner.peek() == Some('.') && matches!(scanner.peek_at(1), Some('0'..='9') | None) {
        // allow "12." and "12.5"; a bare "." is handled by the caller
        if scanner.peek_at(1).map(|c| c.is_ascii_digit()).unwrap_or(false) || scanner.pos > start
        {
            is_decimal = true;
            scanner.advance();
            while matches!(scanner.peek(), Some('0'..='9')) {
                scanner.advance();
            }
        }
    }
    if matches!(scanner.peek(), Some('e') | Some('E')) {
        let save = scanner.pos;
        scanner.advance();
        if matches!(scanner.peek(), Some('+') | Some('-')) {
            scanner.advance();
        }
        if matches!(scanner.peek(), Some('0'..='9')) {
            is_decimal = true;
            while matches!(scanner.peek(), Some('0'..='9')) {
                scanner.advance();
            }
        } else {
            scanner.pos = save;
        }
    }

    let text: String = scanner.chars[start..scanner.pos].iter().collect();
    if is_decimal {
        Token::Decimal(text.parse().unwrap_or(0.0))
    } else {
        Token::Integer(text.parse().unwrap_or(0))
    }
}

fn scan_name(scanner: &mut Scanner) -> Token {
    let start = scanner.pos;
    while matches!(scanner.peek(), Some(c) if c.is_ascii_alphanumeric() || matches!(c, '_' | '@' | '#'))
    {
        scanner.advance();
    }
    let text: String = scanner.chars[start..scanner.pos].iter().collect();
    let upper = text.to_ascii_uppercase();
    keyword(&upper).unwrap_or(Token::Name(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_simple_comparison() {
        let tokens = tokenize("a = 10").unwrap();
        assert_eq!(
            tokens,
            vec![Token::Name("a".into()), Token::Eq, Token::Integer(10)]
        );
    }

    #[test]
    fn tokenizes_dotted_field() {
        let tokens = tokenize("customer.c_custkey").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Name("customer".into()),
                Token::Dot,
                Token::Name("c_custkey".into())
            ]
        );
    }

    #[test]
    fn tokenizes_string_with_escaped_quote() {
        let tokens = tokenize("'it''s'").unwrap();
        assert_eq!(tokens, vec![Token::Str("it's".into())]);
    }

    #[test]
    fn tokenizes_quoted_identifier() {
        let tokens = tokenize("`Annual Salary`").unwrap();
        assert_eq!(tokens, vec![Token::QuotedName("Annual Salary".into())]);
    }

    #[test]
    fn tokenizes_decimal_with_exponent() {
        let tokens = tokenize("1.5e10").unwrap();
        assert_eq!(tokens, vec![Token::Decimal(1.5e10)]);
    }

    #[test]
    fn recognizes_keywords_case_insensitively() {
        let tokens = tokenize("a BETWEEN 1 and 2").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Name("a".into()),
                Token::Between,
                Token::Integer(1),
                Token::And,
                Token::Integer(2)
            ]
        );
    }

    #[test]
    fn recognizes_multi_char_operators() {
        let tokens = tokenize("a <> b").unwrap();
        assert_eq!(
            tokens,
            vec![Token::Name("a".into()), Token::Ne, Token::Name("b".into())]
        );
        let tokens = tokenize("a != b").unwrap();
        assert_eq!(
            tokens,
            vec![Token::Name("a".into()), Token::Ne2, Token::Name("b".into())]
        );
        let tokens = tokenize("a || b").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Name("a".into()),
                Token::DblPipe,
                Token::Name("b".into())
            ]
        );
    }

    #[test]
    fn errors_on_unexpected_character() {
        let err = tokenize("a ~ b").unwrap_err();
        assert!(matches!(err, LexError::UnexpectedChar { ch: '~', .. }));
    }
}
