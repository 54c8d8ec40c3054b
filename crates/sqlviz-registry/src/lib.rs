// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlviz-registry
//!
//! The composition root: wires the statement parser, generator, compiler,
//! serializer, and processor pipelines together into the library surface
//! spec.md §6 names (`parse_sql`, `serialize`, `generate`, `compile`,
//! `interpret`, `render`, `normalize`, `sql_equals`). Grounded on
//! `deepdive/viz/interpreter.py::VizSpecInterpreter` and its
//! `get_generator`/`get_compiler` dispatch, in the composition-root style
//! of `crates/lsp/src/backend.rs` minus anything LSP-protocol-specific.
//!
//! Per-dialect dispatch itself lives one layer down — `sqlviz-generator`
//! and `sqlviz-compiler` each already pick their own dialect implementation
//! from `schema.dialect`/`tree.dialect`. This crate only assembles the
//! pipeline stages around them; it holds no dialect-specific logic of its
//! own.

pub mod error;

use sqlviz_compiler::compile as compile_spec;
use sqlviz_generator::generate as generate_spec;
use sqlviz_ir::{DatabaseSchema, SqlDialect, SqlTree, VizSpec};
use sqlviz_parser::parse_sql as parse_sql_tree;
use sqlviz_processors::{
    AliasProcessor, FilterBadQueriesProcessor, LimitProcessor, MultiSqlProcessor,
    MultiVizSpecProcessor, SqlProcessor, TablesProcessor, VizSpecProcessor, VizSpecRepair,
    VizTypeProcessor,
};
use sqlviz_serializer::{normalize_query, serialize as serialize_tree, sql_equals as sql_str_equals};

pub use error::{InterpretError, InterpretResult, RenderError, RenderResult};
pub use sqlviz_compiler::CompileError;
pub use sqlviz_generator::GeneratorError;
pub use sqlviz_parser::{ParseError, ParseResult};

/// Parses raw SQL text into a [`SqlTree`]. Grounded on
/// `statement_parser.py::parse_statement`; fails only on the parse-fatal
/// shapes spec.md §7 enumerates (not a `SELECT`, multiple statements, a
/// `JOIN` missing its `ON`) — everything else degrades to `Unparsed`.
pub fn parse_sql(sql: &str, dialect: SqlDialect) -> ParseResult<SqlTree> {
    parse_sql_tree(sql, dialect)
}

/// Renders a [`SqlTree`] back to SQL text for its own dialect.
pub fn serialize(tree: &SqlTree) -> String {
    serialize_tree(tree)
}

/// Lowers a parsed tree into a chart description, or `None` if the query
/// has no select list at all.
pub fn generate(tree: &SqlTree) -> Result<Option<VizSpec>, GeneratorError> {
    generate_spec(tree)
}

/// Raises a chart description back into a structured SELECT, resolving
/// joins from the schema's foreign keys.
pub fn compile(spec: &VizSpec, schema: &DatabaseSchema) -> Result<SqlTree, CompileError> {
    compile_spec(spec, schema)
}

/// `parse_sql` + `generate`, followed by the VizSpec-side processor
/// pipeline (structural repair, table resolution, viz-type inference,
/// alias assignment). Grounded on
/// `VizSpecInterpreter.interpret_sql_to_viz_spec`.
pub fn interpret(sql: &str, schema: &DatabaseSchema) -> InterpretResult<VizSpec> {
    let tree = parse_sql(sql, schema.dialect)?;
    let spec = generate(&tree)?.ok_or(InterpretError::NothingToChart)?;

    let pipeline = MultiVizSpecProcessor::new(vec![
        Box::new(VizSpecRepair),
        Box::new(TablesProcessor::new(schema)),
        Box::new(VizTypeProcessor::new(schema)),
        Box::new(AliasProcessor),
    ]);

    // None of the stages above ever drop a spec outright (they repair or
    // annotate, they don't filter) — `expect` documents that invariant
    // instead of threading a dead error path through every caller.
    Ok(pipeline
        .process(spec)
        .expect("VizSpec processor pipeline never drops a spec"))
}

/// `compile` + the SqlTree-side processor pipeline (invalid-table filter,
/// default limit) + `serialize`. Grounded on
/// `VizSpecInterpreter.interpret_viz_spec_to_sql`.
pub fn render(spec: &VizSpec, schema: &DatabaseSchema) -> RenderResult<String> {
    let tree = compile(spec, schema)?;

    let pipeline = MultiSqlProcessor::new(vec![
        Box::new(FilterBadQueriesProcessor::new(schema)),
        Box::new(LimitProcessor::default()),
    ]);

    let tree = pipeline.process(tree).ok_or(RenderError::DroppedBySqlProcessors)?;
    Ok(serialize(&tree))
}

/// The canonical comparable form of a SQL string (spec.md §4.4/§6).
pub fn normalize(sql: &str) -> String {
    normalize_query(sql)
}

/// `normalize(a) == normalize(b)`.
pub fn sql_equals(a: &str, b: &str) -> bool {
    sql_str_equals(a, b)
}
