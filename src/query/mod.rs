// src/query/mod.rs
//! The query language: parsing, field projection and execution.
//!
//! ```text
//! spaces(){minimal}; get(12345){id title version}; tree(12345, depth=2)
//! ```
//!
//! A query is parsed against a [`FieldSchema`] (so unknown fields fail
//! before any request is sent) and then run statement by statement by an
//! [`Executor`].

mod ast;
mod executor;
mod parser;
mod schema;
mod tree;

pub use ast::{Arg, Operation, ParameterInfo, Query, Statement};
pub use executor::{describe_language, Executor};
pub use parser::{parse_query, ParseError};
pub use schema::{page_schema, Extractor, FieldSchema};
pub use tree::{TreeBuilder, TreeNode};
