// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! The two pass traits and their left-to-right compositions. Grounded on
//! `deepdive/viz/processor/multi_processor.py::MultiVizSpecProcessor` and
//! `deepdive/sql/processor/multi_processor.py::MultiSqlProcessor`: run each
//! stage in order, the first one that returns `None` ends the pipeline.

use sqlviz_ir::{SqlTree, VizSpec};

/// A single stage of the VizSpec-side pipeline (alias assignment, table
/// resolution, viz-type inference, …).
pub trait VizSpecProcessor {
    fn process(&self, spec: VizSpec) -> Option<VizSpec>;
}

/// A single stage of the SqlTree-side pipeline (limit capping, invalid-table
/// filtering).
pub trait SqlProcessor {
    fn process(&self, tree: SqlTree) -> Option<SqlTree>;
}

/// Runs its stages in the order given; a stage returning `None` short-
/// circuits the rest, matching `MultiVizSpecProcessor.process`'s early
/// `return None`.
pub struct MultiVizSpecProcessor<'a> {
    stages: Vec<Box<dyn VizSpecProcessor + 'a>>,
}

impl<'a> MultiVizSpecProcessor<'a> {
    pub fn new(stages: Vec<Box<dyn VizSpecProcessor + 'a>>) -> Self {
        MultiVizSpecProcessor { stages }
    }
}

impl<'a> VizSpecProcessor for MultiVizSpecProcessor<'a> {
    fn process(&self, mut spec: VizSpec) -> Option<VizSpec> {
        for stage in &self.stages {
            spec = stage.process(spec)?;
        }
        Some(spec)
    }
}

/// The `SqlTree` analogue of [`MultiVizSpecProcessor`].
pub struct MultiSqlProcessor<'a> {
    stages: Vec<Box<dyn SqlProcessor + 'a>>,
}

impl<'a> MultiSqlProcessor<'a> {
    pub fn new(stages: Vec<Box<dyn SqlProcessor + 'a>>) -> Self {
        MultiSqlProcessor { stages }
    }
}

impl<'a> SqlProcessor for MultiSqlProcessor<'a> {
    fn process(&self, mut tree: SqlTree) -> Option<SqlTree> {
        for stage in &self.stages {
            tree = stage.process(tree)?;
        }
        Some(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlviz_ir::{SqlDialect, VizSpecParams, XAxis};

    struct DropEverything;
    impl VizSpecProcessor for DropEverything {
        fn process(&self, _spec: VizSpec) -> Option<VizSpec> {
            None
        }
    }

    struct SetLimit(i64);
    impl VizSpecProcessor for SetLimit {
        fn process(&self, mut spec: VizSpec) -> Option<VizSpec> {
            spec.limit = Some(self.0);
            Some(spec)
        }
    }

    fn spec() -> VizSpec {
        VizSpec::new(VizSpecParams {
            x_axis: Some(XAxis::new("a")),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn short_circuits_on_first_none() {
        let pipeline = MultiVizSpecProcessor::new(vec![
            Box::new(SetLimit(5)),
            Box::new(DropEverything),
            Box::new(SetLimit(10)),
        ]);
        assert_eq!(pipeline.process(spec()), None);
    }

    #[test]
    fn runs_all_stages_in_order() {
        let pipeline = MultiVizSpecProcessor::new(vec![Box::new(SetLimit(5)), Box::new(SetLimit(10))]);
        let result = pipeline.process(spec()).unwrap();
        assert_eq!(result.limit, Some(10));
    }

    #[test]
    fn sql_pipeline_short_circuits() {
        struct DropTree;
        impl SqlProcessor for DropTree {
            fn process(&self, _tree: SqlTree) -> Option<SqlTree> {
                None
            }
        }
        let pipeline = MultiSqlProcessor::new(vec![Box::new(DropTree)]);
        assert_eq!(pipeline.process(SqlTree::new(SqlDialect::Sqlite)), None);
    }
}
