//! Commonly used types re-exported in one place.
//!
//! ```
//! use pipeweave_graph::prelude::*;
//! ```

pub use crate::definition::{
    Edge, EdgeId, FilterDef, InputDef, ModelCallDef, Node, NodeCommon, NodeDef, NodeId, NodeKind,
    OutputDef, PortRef, Position, TextDef, TransformDef,
};
pub use crate::error::{GraphError, GraphResult};
pub use crate::graph::{
    NodeRemoval, PipelineGraph, PipelineSnapshot, SnapshotNode, ValidationReport, validate,
};
pub use crate::port::{NodePorts, PortDirection, PortId, PortSpec, derive_ports};
pub use crate::template::extract_variables;
