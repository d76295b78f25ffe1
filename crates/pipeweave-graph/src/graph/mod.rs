//! Pipeline graph aggregate and structural validation.
//!
//! This module provides the owned graph representation and its read models:
//! - [`PipelineGraph`]: the mutation API over the node/edge aggregate
//! - [`NodeRemoval`]: cascade record returned by node removal
//! - [`PipelineSnapshot`]: immutable point-in-time view for readers
//! - [`validate`]: the structural DAG check with node/edge counts

mod pipeline;
mod snapshot;
mod validate;

pub use pipeline::{NodeRemoval, PipelineGraph};
pub use snapshot::{PipelineSnapshot, SnapshotNode};
pub use validate::{ValidationReport, validate};
