// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlviz-lexer
//!
//! Tokenization and text-level normalization shared by `sqlviz-parser` (to
//! split and tokenize raw SQL) and `sqlviz-serializer` (to normalize
//! rendered SQL before a `sql_equals` comparison).

pub mod lexer;
pub mod sanitize;
pub mod token;

pub use lexer::{tokenize, LexError, LexResult};
pub use sanitize::sanitize_query;
pub use token::{keyword, Token};
