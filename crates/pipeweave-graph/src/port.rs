//! Port derivation for pipeline nodes.
//!
//! Ports are derived, never stored authoritatively: the mutation API
//! recomputes them from a node's content on every content change and writes
//! the result back onto the node. Port identifiers are a deterministic
//! function of the content, so an edge attached to a variable port survives
//! every edit that keeps the variable.

use derive_more::{Debug, Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::definition::NodeDef;
use crate::template::extract_variables;

/// Identifier of a port, unique within its node.
///
/// The single output port is `out`, the default input port is `in`, and the
/// named input port for variable `v` is `in-v`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Debug, Display, From, Into)]
#[debug("{_0}")]
#[display("{_0}")]
#[serde(transparent)]
pub struct PortId(String);

impl PortId {
    /// The single output port every producing node exposes.
    pub fn output() -> Self {
        Self("out".to_string())
    }

    /// The default input port of a node without named inputs.
    pub fn input() -> Self {
        Self("in".to_string())
    }

    /// The named input port derived from a template variable.
    ///
    /// The same variable name always maps to the same port id.
    pub fn variable(name: &str) -> Self {
        Self(format!("in-{name}"))
    }

    /// Returns the port id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Direction of a port relative to its node.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Debug, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PortDirection {
    /// The port accepts incoming edges.
    Input,
    /// The port originates outgoing edges.
    Output,
}

/// A single derived connection point on a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSpec {
    /// Port identifier, unique within the node.
    pub id: PortId,
    /// Template variable this input port was derived from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
}

impl PortSpec {
    /// An unnamed port with a fixed identifier.
    fn unnamed(id: PortId) -> Self {
        Self { id, variable: None }
    }

    /// A named input port derived from a template variable.
    fn named(name: &str) -> Self {
        Self {
            id: PortId::variable(name),
            variable: Some(name.to_string()),
        }
    }
}

/// The full derived port set of a node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodePorts {
    /// Input ports in derivation order.
    pub inputs: Vec<PortSpec>,
    /// Output ports in derivation order.
    pub outputs: Vec<PortSpec>,
}

impl NodePorts {
    /// Looks up a port by identifier and direction.
    pub fn get(&self, id: &PortId, direction: PortDirection) -> Option<&PortSpec> {
        let ports = match direction {
            PortDirection::Input => &self.inputs,
            PortDirection::Output => &self.outputs,
        };
        ports.iter().find(|port| &port.id == id)
    }

    /// Returns whether the port exists with the given direction.
    pub fn contains(&self, id: &PortId, direction: PortDirection) -> bool {
        self.get(id, direction).is_some()
    }
}

/// Derives the current port set for a node's content.
///
/// Pure and deterministic: identical content always yields structurally
/// identical port sets, in the same order. Never mutates the node; writing
/// the result back is the mutation API's job.
pub fn derive_ports(def: &NodeDef) -> NodePorts {
    match def {
        NodeDef::Input(_) => NodePorts {
            inputs: Vec::new(),
            outputs: vec![PortSpec::unnamed(PortId::output())],
        },
        NodeDef::Output(_) => NodePorts {
            inputs: vec![PortSpec::unnamed(PortId::input())],
            outputs: Vec::new(),
        },
        NodeDef::Text(text) => {
            let variables = extract_variables(&text.template);
            let inputs = if variables.is_empty() {
                vec![PortSpec::unnamed(PortId::input())]
            } else {
                variables.iter().map(|name| PortSpec::named(name)).collect()
            };
            NodePorts {
                inputs,
                outputs: vec![PortSpec::unnamed(PortId::output())],
            }
        }
        NodeDef::ModelCall(_) | NodeDef::Transform(_) | NodeDef::Filter(_) => NodePorts {
            inputs: vec![PortSpec::unnamed(PortId::input())],
            outputs: vec![PortSpec::unnamed(PortId::output())],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{InputDef, ModelCallDef, OutputDef, TextDef};

    #[test]
    fn test_input_node_has_no_inputs() {
        let ports = derive_ports(&NodeDef::Input(InputDef::default()));
        assert!(ports.inputs.is_empty());
        assert_eq!(ports.outputs.len(), 1);
        assert_eq!(ports.outputs[0].id, PortId::output());
    }

    #[test]
    fn test_output_node_has_no_outputs() {
        let ports = derive_ports(&NodeDef::Output(OutputDef::default()));
        assert_eq!(ports.inputs.len(), 1);
        assert!(ports.outputs.is_empty());
    }

    #[test]
    fn test_plain_kinds_have_one_input_one_output() {
        let ports = derive_ports(&NodeDef::ModelCall(ModelCallDef::default()));
        assert_eq!(ports.inputs.len(), 1);
        assert_eq!(ports.outputs.len(), 1);
        assert!(ports.contains(&PortId::input(), PortDirection::Input));
        assert!(ports.contains(&PortId::output(), PortDirection::Output));
    }

    #[test]
    fn test_text_node_ports_follow_variables() {
        let ports = derive_ports(&NodeDef::Text(TextDef::new("{{city}} and {{year}}")));
        let ids: Vec<_> = ports.inputs.iter().map(|port| port.id.as_str()).collect();
        assert_eq!(ids, ["in-city", "in-year"]);
        assert_eq!(ports.inputs[0].variable.as_deref(), Some("city"));
        assert_eq!(ports.outputs.len(), 1);
    }

    #[test]
    fn test_text_node_without_variables_gets_default_input() {
        let ports = derive_ports(&NodeDef::Text(TextDef::new("static text")));
        assert_eq!(ports.inputs.len(), 1);
        assert_eq!(ports.inputs[0].id, PortId::input());
        assert!(ports.inputs[0].variable.is_none());
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let def = NodeDef::Text(TextDef::new("{{a}} {{b}} {{a}}"));
        assert_eq!(derive_ports(&def), derive_ports(&def));
    }

    #[test]
    fn test_variable_port_id_is_stable_across_contents() {
        let before = derive_ports(&NodeDef::Text(TextDef::new("{{x}} {{y}}")));
        let after = derive_ports(&NodeDef::Text(TextDef::new("reworded {{x}} only")));

        let port_before = before.get(&PortId::variable("x"), PortDirection::Input);
        let port_after = after.get(&PortId::variable("x"), PortDirection::Input);
        assert_eq!(port_before, port_after);
    }

    #[test]
    fn test_direction_lookup_is_strict() {
        let ports = derive_ports(&NodeDef::ModelCall(ModelCallDef::default()));
        assert!(!ports.contains(&PortId::input(), PortDirection::Output));
        assert!(!ports.contains(&PortId::output(), PortDirection::Input));
    }
}
