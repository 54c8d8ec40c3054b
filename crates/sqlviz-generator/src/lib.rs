// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Turns a parsed [`sqlviz_ir::SqlTree`] into a
//! [`sqlviz_ir::VizSpec`] chart description, inferring axes, breakdowns,
//! filters, and binners along the way. Grounded on
//! `deepdive/viz/generator/base_generator.py` and its per-dialect
//! subclasses.

pub mod builder;
pub mod dialect;
pub mod error;
pub mod generate;
pub mod helper;
pub mod time_format;

pub use builder::VizSpecBuilder;
pub use error::{GeneratorError, GeneratorResult};
pub use generate::generate;
