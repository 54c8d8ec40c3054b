// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlviz-parser
//!
//! Turns raw SQL text into the structured [`sqlviz_ir::SqlTree`] the rest
//! of the workspace operates on. Three layers, grounded on
//! `deepdive.sql.parser`:
//!
//! - [`expr_parser`] — a recursive-descent grammar over the token stream
//!   from `sqlviz-lexer`, grounded on `term_parser.py`'s `sly`-based
//!   `TermParser`.
//! - [`term_parser`] — the public, infallible `parse_term` entry point for
//!   a single expression fragment, grounded on `term_parser.py::parse_term`.
//! - [`statement_parser`] — splits a whole `SELECT` statement into clauses
//!   and assembles a `SqlTree`, grounded on `statement_parser.py`.

pub mod error;
pub mod expr_parser;
pub mod statement_parser;
pub mod term_parser;

pub use error::{ParseError, ParseResult};
pub use statement_parser::parse_sql;
pub use term_parser::parse_term;
