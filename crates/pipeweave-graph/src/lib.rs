#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod definition;
mod error;
pub mod graph;
pub mod port;
pub mod template;

#[doc(hidden)]
pub mod prelude;

pub use error::{GraphError, GraphResult};

/// Tracing target for graph operations.
pub const TRACING_TARGET: &str = "pipeweave_graph";
