// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Expression parser
//!
//! A recursive-descent reading of `term_parser.py`'s `PyPikaParser` grammar
//! (an `sly` LALR grammar over `pypika` builder calls). The precedence
//! table there --- `||` loosest, then `+ -`, then `* / %`, then unary `-`,
//! then `NOT` tightest --- is expressed here as the usual ladder of
//! descent levels instead of a declared-precedence table, since a
//! hand-written parser has no shift/reduce conflicts to resolve.

use sqlviz_ir::{BinaryOp, Literal, Term, WindowSpec};

use crate::error::{ExprResult, ExprSyntaxError};
use sqlviz_lexer::Token;

struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl Cursor {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn eat(&mut self, tok: &Token) -> bool {
        if self.peek() == Some(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: Token) -> ExprResult<()> {
        if self.eat(&tok) {
            Ok(())
        } else {
            Err(ExprSyntaxError(format!(
                "expected {tok:?}, found {:?}",
                self.peek()
            )))
        }
    }

    fn fail(&self, what: &str) -> ExprSyntaxError {
        ExprSyntaxError(format!("{what}, found {:?}", self.peek()))
    }
}

/// Parses a complete expression fragment (already tokenized). Returns an
/// error if the fragment doesn't reduce to a single expression, or if
/// tokens remain unconsumed afterward.
pub(crate) fn parse(tokens: Vec<Token>) -> ExprResult<Term> {
    let mut cursor = Cursor { tokens, pos: 0 };
    let term = parse_expression(&mut cursor)?;
    if cursor.pos != cursor.tokens.len() {
        return Err(cursor.fail("trailing tokens after expression"));
    }
    Ok(term)
}

fn parse_expression(cursor: &mut Cursor) -> ExprResult<Term> {
    let mut left = parse_and_condition(cursor)?;
    while cursor.eat(&Token::Or) {
        let right = parse_and_condition(cursor)?;
        left = Term::BinaryOp {
            left: Box::new(left),
            op: BinaryOp::Or,
            right: Box::new(right),
            alias: None,
        };
    }
    Ok(left)
}

fn parse_and_condition(cursor: &mut Cursor) -> ExprResult<Term> {
    let mut left = parse_condition(cursor)?;
    while cursor.eat(&Token::And) {
        let right = parse_condition(cursor)?;
        left = Term::BinaryOp {
            left: Box::new(left),
            op: BinaryOp::And,
            right: Box::new(right),
            alias: None,
        };
    }
    Ok(left)
}

fn parse_condition(cursor: &mut Cursor) -> ExprResult<Term> {
    if cursor.eat(&Token::Not) {
        let inner = parse_expression(cursor)?;
        return Ok(Term::Not {
            term: Box::new(inner),
            alias: None,
        });
    }
    if cursor.peek() == Some(&Token::LParen) {
        // Could be a parenthesized boolean expression, or a parenthesized
        // arithmetic operand consumed further down by parse_term_primary;
        // try the expression reading first since it is a superset.
        let save = cursor.pos;
        cursor.advance();
        if let Ok(inner) = parse_expression(cursor) {
            if cursor.eat(&Token::RParen) {
                return Ok(Term::Paren {
                    term: Box::new(inner),
                    alias: None,
                });
            }
        }
        cursor.pos = save;
    }

    let operand = parse_operand(cursor)?;

    if cursor.eat(&Token::Eq) {
        let rhs = parse_operand(cursor)?;
        return Ok(binop(operand, BinaryOp::Eq, rhs));
    }
    if cursor.eat(&Token::Ne) || cursor.eat(&Token::Ne2) {
        let rhs = parse_operand(cursor)?;
        return Ok(binop(operand, BinaryOp::NotEq, rhs));
    }
    if cursor.eat(&Token::Ge) {
        let rhs = parse_operand(cursor)?;
        return Ok(binop(operand, BinaryOp::GtEq, rhs));
    }
    if cursor.eat(&Token::Gt) {
        let rhs = parse_operand(cursor)?;
        return Ok(binop(operand, BinaryOp::Gt, rhs));
    }
    if cursor.eat(&Token::Le) {
        let rhs = parse_operand(cursor)?;
        return Ok(binop(operand, BinaryOp::LtEq, rhs));
    }
    if cursor.eat(&Token::Lt) {
        let rhs = parse_operand(cursor)?;
        return Ok(binop(operand, BinaryOp::Lt, rhs));
    }

    let negate = cursor.eat(&Token::Not);

    if cursor.eat(&Token::In) {
        cursor.expect(Token::LParen)?;
        let mut list = vec![parse_operand(cursor)?];
        while cursor.eat(&Token::Comma) {
            list.push(parse_operand(cursor)?);
        }
        cursor.expect(Token::RParen)?;
        return Ok(Term::In {
            term: Box::new(operand),
            list,
            negate,
            alias: None,
        });
    }
    if cursor.eat(&Token::Like) {
        let rhs = parse_operand(cursor)?;
        return Ok(binop(
            operand,
            if negate { BinaryOp::NotLike } else { BinaryOp::Like },
            rhs,
        ));
    }
    if cursor.eat(&Token::ILike) {
        let rhs = parse_operand(cursor)?;
        return Ok(binop(
            operand,
            if negate { BinaryOp::NotILike } else { BinaryOp::ILike },
            rhs,
        ));
    }
    if cursor.eat(&Token::Between) {
        let low = parse_operand(cursor)?;
        cursor.expect(Token::And)?;
        let high = parse_operand(cursor)?;
        return Ok(Term::Between {
            term: Box::new(operand),
            low: Box::new(low),
            high: Box::new(high),
            negate,
            alias: None,
        });
    }
    if negate {
        return Err(cursor.fail("expected IN, LIKE, ILIKE, or BETWEEN after NOT"));
    }

    if cursor.eat(&Token::Is) {
        let negate = cursor.eat(&Token::Not);
        cursor.expect(Token::Null)?;
        return Ok(Term::IsNull {
            term: Box::new(operand),
            negate,
            alias: None,
        });
    }

    Ok(operand)
}

fn binop(left: Term, op: BinaryOp, right: Term) -> Term {
    Term::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
        alias: None,
    }
}

fn parse_operand(cursor: &mut Cursor) -> ExprResult<Term> {
    let mut left = parse_additive(cursor)?;
    while cursor.eat(&Token::DblPipe) {
        let right = parse_additive(cursor)?;
        left = binop(left, BinaryOp::Concat, right);
    }
    Ok(left)
}

fn parse_additive(cursor: &mut Cursor) -> ExprResult<Term> {
    let mut left = parse_multiplicative(cursor)?;
    loop {
        if cursor.eat(&Token::Plus) {
            let right = parse_multiplicative(cursor)?;
            left = binop(left, BinaryOp::Add, right);
        } else if cursor.eat(&Token::Minus) {
            let right = parse_multiplicative(cursor)?;
            left = binop(left, BinaryOp::Sub, right);
        } else {
            break;
        }
    }
    Ok(left)
}

fn parse_multiplicative(cursor: &mut Cursor) -> ExprResult<Term> {
    let mut left = parse_unary(cursor)?;
    loop {
        if cursor.eat(&Token::Times) {
            let right = parse_unary(cursor)?;
            left = binop(left, BinaryOp::Mul, right);
        } else if cursor.eat(&Token::Divide) {
            let right = parse_unary(cursor)?;
            left = binop(left, BinaryOp::Div, right);
        } else if cursor.eat(&Token::Modulo) {
            let right = parse_unary(cursor)?;
            left = binop(left, BinaryOp::Mod, right);
        } else {
            break;
        }
    }
    Ok(left)
}

fn parse_unary(cursor: &mut Cursor) -> ExprResult<Term> {
    if cursor.eat(&Token::Minus) {
        // A literal negative number folds directly into the literal; there
        // is no dedicated negation node, so any other operand is rendered
        // as `0 - x` by the serializer.
        if let Some(Token::Integer(n)) = cursor.peek().cloned() {
            cursor.advance();
            return Ok(Term::Literal {
                value: Literal::Integer(-n),
                alias: None,
            });
        }
        if let Some(Token::Decimal(d)) = cursor.peek().cloned() {
            cursor.advance();
            return Ok(Term::Literal {
                value: Literal::Float(-d),
                alias: None,
            });
        }
        let inner = parse_unary(cursor)?;
        return Ok(binop(
            Term::Literal {
                value: Literal::Integer(0),
                alias: None,
            },
            BinaryOp::Sub,
            inner,
        ));
    }
    parse_term_primary(cursor)
}

fn parse_term_primary(cursor: &mut Cursor) -> ExprResult<Term> {
    match cursor.peek().cloned() {
        Some(Token::Integer(n)) => {
            cursor.advance();
            Ok(Term::Literal {
                value: Literal::Integer(n),
                alias: None,
            })
        }
        Some(Token::Decimal(d)) => {
            cursor.advance();
            Ok(Term::Literal {
                value: Literal::Float(d),
                alias: None,
            })
        }
        Some(Token::Str(s)) => {
            cursor.advance();
            Ok(Term::Literal {
                value: Literal::String(s),
                alias: None,
            })
        }
        Some(Token::True_) => {
            cursor.advance();
            Ok(Term::Literal {
                value: Literal::Boolean(true),
                alias: None,
            })
        }
        Some(Token::False_) => {
            cursor.advance();
            Ok(Term::Literal {
                value: Literal::Boolean(false),
                alias: None,
            })
        }
        Some(Token::Null) => {
            cursor.advance();
            Ok(Term::Literal {
                value: Literal::Null,
                alias: None,
            })
        }
        Some(Token::LParen) => {
            cursor.advance();
            let inner = parse_expression(cursor)?;
            cursor.expect(Token::RParen)?;
            Ok(Term::Paren {
                term: Box::new(inner),
                alias: None,
            })
        }
        Some(Token::Case) => parse_case(cursor),
        Some(Token::Cast) => parse_cast(cursor),
        Some(Token::Extract) => parse_extract(cursor),
        Some(Token::ApproximatePercentile) => parse_approximate_percentile(cursor),
        Some(Token::Name(name)) | Some(Token::QuotedName(name)) => {
            cursor.advance();
            parse_name_led(cursor, name)
        }
        other => Err(ExprSyntaxError(format!(
            "unexpected token {other:?} while parsing a term"
        ))),
    }
}

/// Continues parsing after a leading NAME/QUOTED_NAME has been consumed:
/// a plain field, a qualified field (`table.col`), a function call, or a
/// schema-qualified function call (`schema.fn(...)`).
fn parse_name_led(cursor: &mut Cursor, name: String) -> ExprResult<Term> {
    if cursor.peek() == Some(&Token::LParen) {
        return parse_function_call(cursor, name);
    }
    if cursor.eat(&Token::Dot) {
        let second = match cursor.advance() {
            Some(Token::Name(n)) | Some(Token::QuotedName(n)) => n,
            other => {
                return Err(ExprSyntaxError(format!(
                    "expected a name after '.', found {other:?}"
                )))
            }
        };
        if cursor.peek() == Some(&Token::LParen) {
            // Schema-qualified function call: fold the schema into the
            // call name, the way the serializer already renders dotted
            // identifiers untouched.
            return parse_function_call(cursor, format!("{name}.{second}"));
        }
        return Ok(Term::Field {
            table: Some(name),
            name: second,
            alias: None,
        });
    }
    Ok(Term::Field {
        table: None,
        name,
        alias: None,
    })
}

fn make_function(name: String, args: Vec<Term>, distinct: bool) -> Term {
    let upper = name.to_ascii_uppercase();
    if upper == "COUNT" {
        Term::Aggregate {
            name: "COUNT".to_string(),
            args,
            distinct,
            percentile: None,
            alias: None,
        }
    } else if Term::is_aggregate_name(&upper) {
        Term::Aggregate {
            name: upper,
            args,
            distinct,
            percentile: None,
            alias: None,
        }
    } else {
        Term::Function {
            name,
            args,
            distinct,
            alias: None,
        }
    }
}

fn parse_function_call(cursor: &mut Cursor, name: String) -> ExprResult<Term> {
    cursor.expect(Token::LParen)?;

    if cursor.eat(&Token::RParen) {
        return Ok(make_function(name, vec![], false));
    }

    let distinct = cursor.eat(&Token::Distinct);

    let mut args = Vec::new();
    if !distinct && cursor.peek() == Some(&Token::Times) {
        cursor.advance();
        args.push(Term::star());
    } else {
        args.push(parse_expression(cursor)?);
        while cursor.eat(&Token::Comma) {
            args.push(parse_expression(cursor)?);
        }
    }

    let ignore_nulls = if cursor.eat(&Token::Ignore) {
        cursor.expect(Token::Nulls)?;
        true
    } else {
        false
    };
    cursor.expect(Token::RParen)?;

    let mut term = make_function(name, args, distinct);
    if ignore_nulls {
        term = Term::Analytic {
            function: Box::new(term),
            window: Some(WindowSpec {
                partition_by: vec![],
                order_by: vec![],
                ignore_nulls: true,
            }),
            alias: None,
        };
    }

    if cursor.eat(&Token::Over) {
        cursor.expect(Token::LParen)?;
        let mut partition_by = Vec::new();
        let mut order_by = Vec::new();
        if cursor.eat(&Token::Partition) {
            cursor.expect(Token::By)?;
            partition_by = parse_expression_list(cursor)?;
        }
        if cursor.eat(&Token::Order) {
            cursor.expect(Token::By)?;
            order_by = parse_orderby_list(cursor)?;
        }
        cursor.expect(Token::RParen)?;
        term = Term::Analytic {
            function: Box::new(term),
            window: Some(WindowSpec {
                partition_by,
                order_by,
                ignore_nulls,
            }),
            alias: None,
        };
    }

    Ok(term)
}

fn parse_expression_list(cursor: &mut Cursor) -> ExprResult<Vec<Term>> {
    let mut list = vec![parse_expression(cursor)?];
    while cursor.eat(&Token::Comma) {
        list.push(parse_expression(cursor)?);
    }
    Ok(list)
}

fn parse_orderby_list(cursor: &mut Cursor) -> ExprResult<Vec<(Term, bool)>> {
    let mut list = Vec::new();
    loop {
        let expr = parse_expression(cursor)?;
        let ascending = if cursor.eat(&Token::Asc) {
            true
        } else if cursor.eat(&Token::Desc) {
            false
        } else {
            true
        };
        list.push((expr, ascending));
        if !cursor.eat(&Token::Comma) {
            break;
        }
    }
    Ok(list)
}

fn parse_case(cursor: &mut Cursor) -> ExprResult<Term> {
    cursor.expect(Token::Case)?;
    let switch = if cursor.peek() != Some(&Token::When) {
        Some(parse_operand(cursor)?)
    } else {
        None
    };

    let mut conditions = Vec::new();
    let mut results = Vec::new();
    while cursor.eat(&Token::When) {
        let cond = parse_expression(cursor)?;
        cursor.expect(Token::Then)?;
        let result = parse_expression(cursor)?;
        let cond = match &switch {
            Some(switch_term) => binop(switch_term.clone(), BinaryOp::Eq, cond),
            None => cond,
        };
        conditions.push(cond);
        results.push(result);
    }
    if conditions.is_empty() {
        return Err(cursor.fail("CASE expression has no WHEN clauses"));
    }

    let else_result = if cursor.eat(&Token::Else) {
        Some(Box::new(parse_expression(cursor)?))
    } else {
        None
    };
    cursor.expect(Token::End)?;

    Ok(Term::Case {
        conditions,
        results,
        else_result,
        alias: None,
    })
}

fn parse_cast(cursor: &mut Cursor) -> ExprResult<Term> {
    cursor.expect(Token::Cast)?;
    cursor.expect(Token::LParen)?;
    let expr = parse_expression(cursor)?;
    cursor.expect(Token::As)?;
    let type_name = parse_data_type(cursor)?;
    cursor.expect(Token::RParen)?;
    Ok(Term::Cast {
        term: Box::new(expr),
        type_name,
        alias: None,
    })
}

fn parse_data_type(cursor: &mut Cursor) -> ExprResult<String> {
    let sized = |cursor: &mut Cursor, base: &str| -> ExprResult<String> {
        if cursor.eat(&Token::LParen) {
            let n = match cursor.advance() {
                Some(Token::Integer(n)) => n,
                other => {
                    return Err(ExprSyntaxError(format!(
                        "expected an integer type argument, found {other:?}"
                    )))
                }
            };
            cursor.expect(Token::RParen)?;
            Ok(format!("{base}({n})"))
        } else {
            Ok(base.to_string())
        }
    };

    match cursor.advance() {
        Some(Token::LongType) => match cursor.advance() {
            Some(Token::VarcharType) => Ok("LONG VARCHAR".to_string()),
            Some(Token::VarbinaryType) => Ok("LONG VARBINARY".to_string()),
            other => Err(ExprSyntaxError(format!(
                "expected VARCHAR or VARBINARY after LONG, found {other:?}"
            ))),
        },
        Some(Token::IntegerType) => Ok("INTEGER".to_string()),
        Some(Token::FloatType) => Ok("FLOAT".to_string()),
        Some(Token::NumericType) => sized(cursor, "NUMERIC"),
        Some(Token::SignedType) => Ok("SIGNED".to_string()),
        Some(Token::UnsignedType) => Ok("UNSIGNED".to_string()),
        Some(Token::BooleanType) => Ok("BOOLEAN".to_string()),
        Some(Token::CharType) => sized(cursor, "CHAR"),
        Some(Token::VarcharType) => sized(cursor, "VARCHAR"),
        Some(Token::BinaryType) => sized(cursor, "BINARY"),
        Some(Token::VarbinaryType) => sized(cursor, "VARBINARY"),
        other => Err(ExprSyntaxError(format!(
            "expected a SQL type name, found {other:?}"
        ))),
    }
}

fn parse_extract(cursor: &mut Cursor) -> ExprResult<Term> {
    cursor.expect(Token::Extract)?;
    cursor.expect(Token::LParen)?;
    let date_part = match cursor.advance() {
        Some(Token::Year) => "YEAR",
        Some(Token::Quarter) => "QUARTER",
        Some(Token::Month) => "MONTH",
        Some(Token::Week) => "WEEK",
        Some(Token::Day) => "DAY",
        Some(Token::Hour) => "HOUR",
        Some(Token::Minute) => "MINUTE",
        Some(Token::Second) => "SECOND",
        Some(Token::Microsecond) => "MICROSECOND",
        other => {
            return Err(ExprSyntaxError(format!(
                "expected a time unit in EXTRACT(), found {other:?}"
            )))
        }
    }
    .to_string();
    cursor.expect(Token::From)?;
    let expr = parse_expression(cursor)?;
    cursor.expect(Token::RParen)?;
    Ok(Term::Extract {
        date_part,
        term: Box::new(expr),
        alias: None,
    })
}

fn parse_approximate_percentile(cursor: &mut Cursor) -> ExprResult<Term> {
    cursor.expect(Token::ApproximatePercentile)?;
    cursor.expect(Token::LParen)?;
    let term = parse_operand(cursor)?;
    cursor.expect(Token::Using)?;
    cursor.expect(Token::Parameters)?;
    cursor.expect(Token::Percentile)?;
    cursor.expect(Token::Eq)?;
    let percentile = match cursor.advance() {
        Some(Token::Decimal(d)) => d,
        Some(Token::Integer(n)) => n as f64,
        other => {
            return Err(ExprSyntaxError(format!(
                "expected a numeric PERCENTILE value, found {other:?}"
            )))
        }
    };
    cursor.expect(Token::RParen)?;
    Ok(Term::Aggregate {
        name: "APPROXIMATE_PERCENTILE".to_string(),
        args: vec![term],
        distinct: false,
        percentile: Some(percentile),
        alias: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlviz_lexer::tokenize;

    fn parse_str(s: &str) -> Term {
        parse(tokenize(s).unwrap()).unwrap()
    }

    #[test]
    fn parses_a_field() {
        assert_eq!(parse_str("customer_id"), Term::field("customer_id"));
    }

    #[test]
    fn parses_a_qualified_field() {
        assert_eq!(
            parse_str("customer.id"),
            Term::Field {
                table: Some("customer".into()),
                name: "id".into(),
                alias: None
            }
        );
    }

    #[test]
    fn respects_multiplicative_over_additive_precedence() {
        let term = parse_str("1 + 2 * 3");
        match term {
            Term::BinaryOp { op: BinaryOp::Add, left, right, .. } => {
                assert_eq!(*left, Term::Literal { value: Literal::Integer(1), alias: None });
                assert!(matches!(*right, Term::BinaryOp { op: BinaryOp::Mul, .. }));
            }
            other => panic!("expected an addition at the top, got {other:?}"),
        }
    }

    #[test]
    fn parses_count_as_aggregate() {
        let term = parse_str("COUNT(*)");
        assert!(matches!(
            term,
            Term::Aggregate { ref name, ref args, .. } if name == "COUNT" && args.len() == 1 && args[0].is_star()
        ));
    }

    #[test]
    fn parses_count_distinct() {
        let term = parse_str("COUNT(DISTINCT customer_id)");
        assert!(matches!(
            term,
            Term::Aggregate { ref name, distinct: true, .. } if name == "COUNT"
        ));
    }

    #[test]
    fn parses_between() {
        let term = parse_str("amount between 10 and 20");
        assert!(matches!(term, Term::Between { negate: false, .. }));
    }

    #[test]
    fn parses_not_in_list() {
        let term = parse_str("status not in ('a', 'b')");
        match term {
            Term::In { negate, list, .. } => {
                assert!(negate);
                assert_eq!(list.len(), 2);
            }
            other => panic!("expected In, got {other:?}"),
        }
    }

    #[test]
    fn parses_is_not_null() {
        let term = parse_str("email is not null");
        assert!(matches!(term, Term::IsNull { negate: true, .. }));
    }

    #[test]
    fn parses_case_when() {
        let term = parse_str("case when a > 1 then 'big' else 'small' end");
        match term {
            Term::Case { conditions, results, else_result, .. } => {
                assert_eq!(conditions.len(), 1);
                assert_eq!(results.len(), 1);
                assert!(else_result.is_some());
            }
            other => panic!("expected Case, got {other:?}"),
        }
    }

    #[test]
    fn parses_analytic_function() {
        let term = parse_str("SUM(amount) OVER (PARTITION BY region ORDER BY dt DESC)");
        match term {
            Term::Analytic { window: Some(w), .. } => {
                assert_eq!(w.partition_by.len(), 1);
                assert_eq!(w.order_by.len(), 1);
                assert!(!w.order_by[0].1);
            }
            other => panic!("expected Analytic, got {other:?}"),
        }
    }

    #[test]
    fn parses_cast_with_sized_type() {
        let term = parse_str("CAST(a AS VARCHAR(255))");
        assert!(matches!(term, Term::Cast { ref type_name, .. } if type_name == "VARCHAR(255)"));
    }

    #[test]
    fn parses_extract() {
        let term = parse_str("EXTRACT(YEAR FROM created_at)");
        assert!(matches!(term, Term::Extract { ref date_part, .. } if date_part == "YEAR"));
    }

    #[test]
    fn parses_approximate_percentile() {
        let term = parse_str("APPROXIMATE_PERCENTILE(amount USING PARAMETERS PERCENTILE = 0.5)");
        assert!(matches!(
            term,
            Term::Aggregate { ref name, percentile: Some(p), .. } if name == "APPROXIMATE_PERCENTILE" && (p - 0.5).abs() < f64::EPSILON
        ));
    }

    #[test]
    fn negative_literal_folds_into_the_literal() {
        let term = parse_str("-5");
        assert_eq!(
            term,
            Term::Literal { value: Literal::Integer(-5), alias: None }
        );
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        assert!(parse(tokenize("a b").unwrap()).is_err());
    }
}
