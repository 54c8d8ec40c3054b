// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Small helpers shared by [`crate::builder`] and [`crate::generate`].
//! Grounded on `deepdive/viz/generator/helper.py`.

use std::collections::HashMap;

use sqlviz_ir::{SqlDialect, SqlTree, Term};

/// The canonical expression text of a term, used as a hash-map key the same
/// way `term_to_str`/`term.get_sql()` keys `aliases_to_terms`/`term_to_axes`
/// throughout `base_generator.py`.
pub fn term_key(dialect: SqlDialect, term: &Term) -> String {
    sqlviz_serializer::render_expr(dialect, term)
}

/// Every select-list and group-by term carrying an alias, keyed by that
/// alias. Grounded on `helper.py::aliases_to_terms`.
pub fn aliases_to_terms(tree: &SqlTree) -> HashMap<String, Term> {
    let mut map = HashMap::new();
    for term in all_terms(tree) {
        if let Some(alias) = term.alias() {
            map.insert(alias.to_string(), term.clone());
        }
    }
    map
}

/// All select-list and group-by terms, in that order. Grounded on
/// `helper.py::all_terms`.
pub fn all_terms(tree: &SqlTree) -> Vec<&Term> {
    let mut terms: Vec<&Term> = tree.select_terms.iter().collect();
    terms.extend(tree.groupby_terms.iter());
    terms
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlviz_ir::TableRef;

    #[test]
    fn collects_aliased_terms_from_select_and_groupby() {
        let mut tree = SqlTree::new(SqlDialect::Sqlite);
        tree.from_term = Some(TableRef::new("orders"));
        tree.add_select_term(Term::field("status").with_alias("s"));
        tree.add_groupby_term(Term::field("status").with_alias("s"));
        let aliases = aliases_to_terms(&tree);
        assert_eq!(aliases.len(), 1);
        assert!(aliases.contains_key("s"));
    }
}
