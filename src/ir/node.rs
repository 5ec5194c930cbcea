use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ir::tensor::TensorDescriptor;

/// The unified operator taxonomy. Unrecognized tags parse to `Other` rather
/// than failing — an unknown taxonomy is valid input, it just has a
/// shorter fallback chain in the mapping engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperatorTaxonomy {
    Sampling,
    Encoding,
    FieldComputation,
    Blending,
    VolumeRendering,
    Mlp,
    HashEncode,
    PositionalEncode,
    Other(String),
}

impl OperatorTaxonomy {
    /// Case-insensitive parse of a producer-supplied tag string.
    pub fn parse(tag: &str) -> Self {
        match tag.to_ascii_uppercase().as_str() {
            "SAMPLING" => OperatorTaxonomy::Sampling,
            "ENCODING" => OperatorTaxonomy::Encoding,
            "FIELD_COMPUTATION" => OperatorTaxonomy::FieldComputation,
            "BLENDING" => OperatorTaxonomy::Blending,
            "VOLUME_RENDERING" => OperatorTaxonomy::VolumeRendering,
            "MLP" => OperatorTaxonomy::Mlp,
            "HASH_ENCODE" => OperatorTaxonomy::HashEncode,
            "POSITIONAL_ENCODE" => OperatorTaxonomy::PositionalEncode,
            _ => OperatorTaxonomy::Other(tag.to_string()),
        }
    }

    /// The canonical uppercase string this taxonomy maps to, for matching
    /// against `HardwareUnit::unit_type` and the fallback tables.
    pub fn as_str(&self) -> &str {
        match self {
            OperatorTaxonomy::Sampling => "SAMPLING",
            OperatorTaxonomy::Encoding => "ENCODING",
            OperatorTaxonomy::FieldComputation => "FIELD_COMPUTATION",
            OperatorTaxonomy::Blending => "BLENDING",
            OperatorTaxonomy::VolumeRendering => "VOLUME_RENDERING",
            OperatorTaxonomy::Mlp => "MLP",
            OperatorTaxonomy::HashEncode => "HASH_ENCODE",
            OperatorTaxonomy::PositionalEncode => "POSITIONAL_ENCODE",
            OperatorTaxonomy::Other(s) => s.as_str(),
        }
    }
}

/// A single operator in the workload graph, before any hardware mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorNode {
    pub id: String,
    pub taxonomy: OperatorTaxonomy,
    #[serde(default)]
    pub inputs: Vec<TensorDescriptor>,
    #[serde(default)]
    pub outputs: Vec<TensorDescriptor>,
    #[serde(default = "default_call_count")]
    pub call_count: u32,
    /// Scalar hints consumed by the mapping engine (e.g.
    /// `hash_index_activity`, `active_samples_ratio`) and by optimization
    /// strategies (e.g. `pruning_ratio`, `coalesce_factor`).
    #[serde(default)]
    pub hints: HashMap<String, f64>,
}

fn default_call_count() -> u32 {
    1
}

impl OperatorNode {
    pub fn new(id: impl Into<String>, taxonomy: OperatorTaxonomy) -> Self {
        Self {
            id: id.into(),
            taxonomy,
            inputs: Vec::new(),
            outputs: Vec::new(),
            call_count: 1,
            hints: HashMap::new(),
        }
    }

    pub fn with_io(
        mut self,
        inputs: Vec<TensorDescriptor>,
        outputs: Vec<TensorDescriptor>,
    ) -> Self {
        self.inputs = inputs;
        self.outputs = outputs;
        self
    }

    pub fn with_hint(mut self, key: impl Into<String>, value: f64) -> Self {
        self.hints.insert(key.into(), value);
        self
    }

    pub fn hint(&self, key: &str) -> Option<f64> {
        self.hints.get(key).copied()
    }
}
