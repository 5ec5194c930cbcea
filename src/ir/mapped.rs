use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ir::node::OperatorNode;

/// A single accelerator compute unit, as declared in a [`HardwareConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardwareUnit {
    pub id: String,
    /// Matched case-insensitively against taxonomy tags and the mapping
    /// engine's fallback tables; stored uppercased on construction.
    pub unit_type: String,
    pub throughput_ops_per_cycle: f64,
    pub bandwidth_bytes_per_cycle: f64,
}

impl HardwareUnit {
    pub fn new(
        id: impl Into<String>,
        unit_type: impl Into<String>,
        throughput_ops_per_cycle: f64,
        bandwidth_bytes_per_cycle: f64,
    ) -> Self {
        Self {
            id: id.into(),
            unit_type: unit_type.into().to_ascii_uppercase(),
            throughput_ops_per_cycle,
            bandwidth_bytes_per_cycle,
        }
    }
}

/// The declared set of hardware units an [`OperatorGraph`](crate::ir::graph::OperatorGraph)
/// may be mapped onto.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HardwareConfig {
    pub units: Vec<HardwareUnit>,
}

impl HardwareConfig {
    pub fn new(units: Vec<HardwareUnit>) -> Self {
        Self { units }
    }

    /// Units grouped by `unit_type`, preserving declaration order within
    /// each group — required for round-robin determinism in the mapping
    /// engine.
    pub fn units_by_type(&self) -> HashMap<String, Vec<&HardwareUnit>> {
        let mut by_type: HashMap<String, Vec<&HardwareUnit>> = HashMap::new();
        for unit in &self.units {
            by_type.entry(unit.unit_type.clone()).or_default().push(unit);
        }
        by_type
    }

    pub fn unit(&self, id: &str) -> Option<&HardwareUnit> {
        self.units.iter().find(|u| u.id == id)
    }
}

/// An [`OperatorNode`] after hardware assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappedNode {
    pub node: OperatorNode,
    pub hw_unit_id: String,
    /// Passthrough hints plus any edge-augmentation metadata.
    #[serde(default)]
    pub attrs: HashMap<String, f64>,
}

/// Output of the mapping phase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappedIR {
    pub nodes: IndexMap<String, MappedNode>,
    pub edges: Vec<(String, String)>,
}
