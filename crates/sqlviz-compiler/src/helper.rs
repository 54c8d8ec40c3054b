// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Grounded on `deepdive/viz/compiler/helper.py::column_to_term`.

use sqlviz_ir::Term;

/// A bare `*` column name stays a [`Term::Star`]; anything else becomes a
/// plain field reference.
pub fn column_to_term(column_name: &str) -> Term {
    if column_name == "*" {
        Term::star()
    } else {
        Term::field(column_name)
    }
}
