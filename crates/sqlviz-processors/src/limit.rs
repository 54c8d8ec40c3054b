// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Caps (or fills in) a compiled tree's row limit. Grounded on
//! `deepdive/sql/processor/limit_processor.py::LimitProcessor`.

use sqlviz_ir::SqlTree;

use crate::pipeline::SqlProcessor;

/// The default applied by `LimitProcessor::default()` when a `SqlTree`
/// carries no `LIMIT` at all (spec.md §4.8).
pub const DEFAULT_LIMIT: i64 = 10_000;

/// Fills in `tree.limit` with a configured default when unset. Never
/// lowers an existing, user-specified limit — `LimitProcessor` fills gaps,
/// it does not cap (that policy choice belongs to the caller's own pass if
/// one is needed).
pub struct LimitProcessor {
    default_limit: i64,
}

impl LimitProcessor {
    pub fn new(default_limit: i64) -> Self {
        LimitProcessor { default_limit }
    }
}

impl Default for LimitProcessor {
    fn default() -> Self {
        LimitProcessor::new(DEFAULT_LIMIT)
    }
}

impl SqlProcessor for LimitProcessor {
    fn process(&self, mut tree: SqlTree) -> Option<SqlTree> {
        if tree.limit.is_none() {
            tree.limit = Some(self.default_limit);
        }
        Some(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlviz_ir::SqlDialect;

    #[test]
    fn fills_in_default_when_unset() {
        let tree = SqlTree::new(SqlDialect::Sqlite);
        let tree = LimitProcessor::default().process(tree).unwrap();
        assert_eq!(tree.limit, Some(DEFAULT_LIMIT));
    }

    #[test]
    fn leaves_an_explicit_limit_untouched() {
        let mut tree = SqlTree::new(SqlDialect::Sqlite);
        tree.limit = Some(25);
        let tree = LimitProcessor::default().process(tree).unwrap();
        assert_eq!(tree.limit, Some(25));
    }

    #[test]
    fn honors_a_configured_default() {
        let tree = SqlTree::new(SqlDialect::Sqlite);
        let tree = LimitProcessor::new(500).process(tree).unwrap();
        assert_eq!(tree.limit, Some(500));
    }
}
