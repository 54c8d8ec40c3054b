// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Accumulates the pieces of a [`VizSpec`](sqlviz_ir::VizSpec) while
//! [`crate::generate::generate`] walks a [`SqlTree`]. Grounded on
//! `deepdive/viz/generator/base_generator.py::VizSpecBuilder`.

use std::collections::HashMap;

use sqlviz_ir::{BinaryOp, Domain, Filter, SortBy, SortDirection, SqlDialect, SqlTree, Term, VizSpecError, VizSpecParams, XAxis, YAxis, Breakdown, VizSpec};

use crate::dialect::DialectGenerator;
use crate::generate::{term_to_breakdown, term_to_filter, term_to_sortby, term_to_y_axis};
use crate::helper::{aliases_to_terms, term_key};

/// What a previously-registered select/group-by term resolved to, enough to
/// answer the two questions `term_to_sortby`/`term_to_filter_name` ask:
/// "what name does this axis expose" and "was it recognized".
#[derive(Debug, Clone)]
pub(crate) struct AxisInfo {
    pub name: String,
    pub unparsed: bool,
}

pub struct VizSpecBuilder {
    dialect: SqlDialect,
    aliases_to_terms: HashMap<String, Term>,
    pub(crate) term_to_axes: HashMap<String, AxisInfo>,
    x_axis: Option<XAxis>,
    y_axes: Vec<YAxis>,
    breakdowns: Vec<Breakdown>,
    filters: Vec<Filter>,
    tables: Vec<String>,
    limit: Option<i64>,
    sort_by: Option<SortBy>,
}

impl VizSpecBuilder {
    pub fn new(dialect: SqlDialect, tree: &SqlTree) -> Self {
        VizSpecBuilder {
            dialect,
            aliases_to_terms: aliases_to_terms(tree),
            term_to_axes: HashMap::new(),
            x_axis: None,
            y_axes: Vec::new(),
            breakdowns: Vec::new(),
            filters: Vec::new(),
            tables: tree.tables().into_iter().map(str::to_string).collect(),
            limit: tree.limit,
            sort_by: None,
        }
    }

    /// Swaps a term for the term it was defined as, if it is itself just a
    /// reference to a select-list/group-by alias. Grounded on
    /// `VizSpecBuilder._resolve_alias`.
    fn resolve_alias(&self, term: &Term) -> Term {
        let key = term_key(self.dialect, term);
        self.aliases_to_terms
            .get(&key)
            .cloned()
            .unwrap_or_else(|| term.clone())
    }

    pub fn set_x_axis(&mut self, generator: &dyn DialectGenerator, term: &Term) {
        let resolved = self.resolve_alias(term);
        let x_axis = generator.term_to_x_axis(&resolved);
        self.term_to_axes.insert(
            term_key(self.dialect, term),
            AxisInfo {
                name: x_axis.name.clone(),
                unparsed: x_axis.unparsed,
            },
        );
        self.x_axis = Some(x_axis);
    }

    pub fn add_y_axis(&mut self, term: &Term) {
        let y_axis = term_to_y_axis(self.dialect, term);
        self.term_to_axes.insert(
            term_key(self.dialect, term),
            AxisInfo {
                name: y_axis.name.clone(),
                unparsed: y_axis.unparsed,
            },
        );
        self.y_axes.push(y_axis);
    }

    pub fn add_breakdown(&mut self, term: &Term) {
        let resolved = self.resolve_alias(term);
        let mut breakdown = term_to_breakdown(self.dialect, &resolved);
        if let Some(alias) = term.alias() {
            breakdown.alias = Some(alias.to_string());
        }
        self.term_to_axes.insert(
            term_key(self.dialect, term),
            AxisInfo {
                name: breakdown.name.clone(),
                unparsed: breakdown.unparsed,
            },
        );
        self.breakdowns.push(breakdown);
    }

    pub fn add_sortby(&mut self, term: &Term, direction: SortDirection) {
        self.sort_by = term_to_sortby(
            self.dialect,
            term,
            direction,
            &self.aliases_to_terms,
            &self.term_to_axes,
        );
    }

    /// Splits an AND-chain into its individual criteria, converts each into
    /// a [`Filter`], and folds any that describe the x-axis's own domain
    /// into `x_axis.domain` instead of keeping it as a separate filter.
    /// Grounded on `VizSpecBuilder.add_where`/`_unpack_where`/
    /// `_filter_can_be_domain`.
    pub fn add_where(&mut self, term: &Term) {
        for criterion in unpack_where(term) {
            let viz_filter = term_to_filter(self.dialect, &criterion, &self.term_to_axes);
            match filter_domain(&self.x_axis, &viz_filter) {
                Some(domain) => {
                    if let Some(x_axis) = self.x_axis.as_mut() {
                        x_axis.domain = Some(domain);
                    }
                }
                None => self.filters.push(viz_filter),
            }
        }
    }

    pub fn build(self) -> Result<VizSpec, VizSpecError> {
        VizSpec::new(VizSpecParams {
            viz_type: None,
            x_axis: self.x_axis,
            y_axes: self.y_axes,
            breakdowns: self.breakdowns,
            filters: self.filters,
            tables: self.tables,
            limit: self.limit,
            sort_by: self.sort_by,
        })
    }
}

fn unpack_where(term: &Term) -> Vec<Term> {
    match term {
        Term::BinaryOp {
            op: BinaryOp::And,
            left,
            right,
            ..
        } => {
            let mut criteria = unpack_where(left);
            criteria.extend(unpack_where(right));
            criteria
        }
        other => vec![other.clone()],
    }
}

/// `filter` only absorbs into the x-axis domain when it is a numeric filter
/// naming the x-axis's own column (by name or alias) and the x-axis does
/// not already carry a domain — first match wins.
fn filter_domain(x_axis: &Option<XAxis>, filter: &Filter) -> Option<Domain> {
    let Filter::Numeric { name, domain, .. } = filter else {
        return None;
    };
    let x_axis = x_axis.as_ref()?;
    if x_axis.domain.is_some() {
        return None;
    }
    let matches = x_axis.name == *name || x_axis.alias.as_deref() == Some(name.as_str());
    matches.then(|| domain.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlviz_ir::{DomainLimit, TableRef};

    #[test]
    fn unpack_where_splits_and_chain() {
        let term = Term::BinaryOp {
            left: Box::new(Term::BinaryOp {
                left: Box::new(Term::field("a")),
                op: BinaryOp::Gt,
                right: Box::new(Term::Literal {
                    value: sqlviz_ir::Literal::Integer(1),
                    alias: None,
                }),
                alias: None,
            }),
            op: BinaryOp::And,
            right: Box::new(Term::field("b")),
            alias: None,
        };
        assert_eq!(unpack_where(&term).len(), 2);
    }

    #[test]
    fn numeric_filter_on_x_axis_name_absorbs_into_domain() {
        let x_axis = Some(XAxis::new("revenue"));
        let filter = Filter::Numeric {
            name: "revenue".to_string(),
            domain: (Some(DomainLimit::Int(0)), None),
            negate: false,
        };
        assert!(filter_domain(&x_axis, &filter).is_some());
    }

    #[test]
    fn tables_come_from_from_term_then_joins() {
        let mut tree = SqlTree::new(SqlDialect::Sqlite);
        tree.from_term = Some(TableRef::new("orders"));
        let builder = VizSpecBuilder::new(SqlDialect::Sqlite, &tree);
        assert_eq!(builder.tables, vec!["orders".to_string()]);
    }
}
