//! Node definition types.

use std::str::FromStr;

use derive_more::{Debug, Display, From, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::position::Position;

/// Unique identifier for a node in a pipeline graph.
///
/// Assigned at creation, immutable, never reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Debug, Display, From, Into)]
#[debug("{_0}")]
#[display("{_0}")]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Creates a new random node ID.
    #[inline]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a node ID from an existing UUID.
    #[inline]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[inline]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for NodeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

impl AsRef<Uuid> for NodeId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

/// A generic node wrapper that adds canvas metadata to any inner type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeCommon<T> {
    /// Display name of the node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description of what this node does.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Position on the canvas.
    #[serde(default)]
    pub position: Position,
    /// Inner node content.
    #[serde(flatten)]
    pub inner: T,
}

impl<T> NodeCommon<T> {
    /// Creates a new node with the given inner value.
    pub fn new(inner: T) -> Self {
        Self {
            name: None,
            description: None,
            position: Position::default(),
            inner,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the canvas position.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

/// A pipeline node definition with common canvas metadata.
pub type Node = NodeCommon<NodeDef>;

/// The closed set of node kinds.
///
/// Everything else a kind registry knows about a node (icon, label, field
/// widgets) is cosmetic and stays outside the graph engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(strum::Display, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeKind {
    /// Pipeline entry point.
    Input,
    /// Pipeline exit point.
    Output,
    /// LLM invocation step.
    ModelCall,
    /// Data transformation step.
    Transform,
    /// Row filtering step.
    Filter,
    /// Templated free text with `{{variable}}` references.
    Text,
}

/// Node content enum for pipeline graphs.
///
/// Each variant carries only the content fields its kind needs; the kind of
/// a node is the variant's discriminant and is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, From)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeDef {
    /// Pipeline input, supplies a value to downstream nodes.
    Input(InputDef),
    /// Pipeline output, receives a final value.
    Output(OutputDef),
    /// Model call, forwards its input through an LLM.
    ModelCall(ModelCallDef),
    /// Transform, applies a selected operation to its input.
    Transform(TransformDef),
    /// Filter, keeps or drops its input by a selected rule.
    Filter(FilterDef),
    /// Templated text with variable references.
    Text(TextDef),
}

impl NodeDef {
    /// Returns the kind of this node content.
    pub const fn kind(&self) -> NodeKind {
        match self {
            NodeDef::Input(_) => NodeKind::Input,
            NodeDef::Output(_) => NodeKind::Output,
            NodeDef::ModelCall(_) => NodeKind::ModelCall,
            NodeDef::Transform(_) => NodeKind::Transform,
            NodeDef::Filter(_) => NodeKind::Filter,
            NodeDef::Text(_) => NodeKind::Text,
        }
    }

    /// Returns whether this is an input node.
    pub const fn is_input(&self) -> bool {
        matches!(self, NodeDef::Input(_))
    }

    /// Returns whether this is an output node.
    pub const fn is_output(&self) -> bool {
        matches!(self, NodeDef::Output(_))
    }

    /// Returns whether this node's ports depend on its content.
    pub const fn is_content_driven(&self) -> bool {
        matches!(self, NodeDef::Text(_))
    }
}

/// Content of a pipeline input node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InputDef {
    /// Field name the canvas shows for this input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Selected value type option (e.g. text or file); opaque to the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
}

/// Content of a pipeline output node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OutputDef {
    /// Field name the canvas shows for this output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Selected value type option; opaque to the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
}

/// Content of a model-call node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelCallDef {
    /// Selected model option; the option list is registry metadata, not ours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Content of a transform node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransformDef {
    /// Selected operation option; opaque to the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

/// Content of a filter node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterDef {
    /// Selected rule option; opaque to the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

/// Content of a templated text node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextDef {
    /// Free text, possibly containing `{{variable}}` references.
    #[serde(default)]
    pub template: String,
}

impl TextDef {
    /// Creates text content from a template string.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}
