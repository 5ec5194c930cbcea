//! Assigns [`OperatorNode`](crate::ir::node::OperatorNode)s to hardware
//! units.

use std::collections::HashMap;

use crate::errors::SchedulerError;
use crate::ir::graph::OperatorGraph;
use crate::ir::mapped::{HardwareConfig, HardwareUnit, MappedIR, MappedNode};
use crate::ir::node::OperatorTaxonomy;
use crate::observability::mapping::HardwareAssigned;
use crate::observability::StructuredLog;

const GENERIC_FALLBACK: [&str; 3] = ["GENERIC", "FIELD_COMPUTATION", "ENCODING"];

/// Hints passed through from an [`OperatorNode`](crate::ir::node::OperatorNode)
/// into its [`MappedNode`] unchanged, when present.
const PASSTHROUGH_HINTS: [&str; 3] = [
    "hash_index_activity",
    "low_bit_observed",
    "active_samples_ratio",
];

/// The hardware unit type a node of this taxonomy should be placed on
/// first, before `fallback_chain` or the generic fallback are consulted.
/// Distinct from [`OperatorTaxonomy::as_str`]: several taxonomy tags want
/// a *different* unit type than their own canonical string (e.g. ENCODING
/// nodes want POSITIONAL_ENCODE hardware, never a unit literally typed
/// "ENCODING").
fn desired_unit_type(taxonomy: &OperatorTaxonomy) -> &'static str {
    match taxonomy {
        OperatorTaxonomy::Sampling => "SAMPLING",
        OperatorTaxonomy::Encoding | OperatorTaxonomy::PositionalEncode => "POSITIONAL_ENCODE",
        OperatorTaxonomy::HashEncode => "HASH_ENCODE",
        OperatorTaxonomy::FieldComputation => "FIELD_COMPUTATION",
        OperatorTaxonomy::Mlp => "MLP",
        OperatorTaxonomy::Blending | OperatorTaxonomy::VolumeRendering => "VOLUME_RENDERING",
        OperatorTaxonomy::Other(_) => "FIELD_COMPUTATION",
    }
}

fn fallback_chain(taxonomy: &OperatorTaxonomy) -> &'static [&'static str] {
    match taxonomy {
        OperatorTaxonomy::Sampling => &["VOLUME_RENDERING", "FIELD_COMPUTATION"],
        OperatorTaxonomy::Encoding | OperatorTaxonomy::PositionalEncode => {
            &["HASH_ENCODE", "FIELD_COMPUTATION"]
        }
        OperatorTaxonomy::HashEncode => &["POSITIONAL_ENCODE", "FIELD_COMPUTATION"],
        OperatorTaxonomy::FieldComputation | OperatorTaxonomy::Mlp => &["FIELD_COMPUTATION"],
        OperatorTaxonomy::Blending | OperatorTaxonomy::VolumeRendering => {
            &["BLENDING", "FIELD_COMPUTATION"]
        }
        OperatorTaxonomy::Other(_) => &["VOLUME_RENDERING", "POSITIONAL_ENCODE"],
    }
}

/// Options controlling optional mapping-engine behavior (both default off).
#[derive(Debug, Clone, Copy, Default)]
pub struct MappingOptions {
    pub enable_hint_passthrough: bool,
    pub enable_edge_augmentation: bool,
}

/// Greedy taxonomy -> hardware-unit-type mapper with fallback chains and
/// round-robin load balancing within a type.
///
/// A per-type counter advances on every assignment and wraps modulo the
/// candidate count, so repeated operators of the same type spread across
/// all compatible units instead of piling onto the first one declared.
pub struct MappingEngine {
    hw_config: HardwareConfig,
    round_robin_cursor: HashMap<String, usize>,
    options: MappingOptions,
}

impl MappingEngine {
    pub fn new(hw_config: HardwareConfig) -> Self {
        Self::with_options(hw_config, MappingOptions::default())
    }

    pub fn with_options(hw_config: HardwareConfig, options: MappingOptions) -> Self {
        Self {
            hw_config,
            round_robin_cursor: HashMap::new(),
            options,
        }
    }

    pub fn run(&mut self, graph: &OperatorGraph) -> Result<MappedIR, SchedulerError> {
        if let Some(unknown) = graph.dangling_edge_refs().into_iter().next() {
            return Err(SchedulerError::UnknownNode { node_id: unknown });
        }
        // Edge augmentation below walks the graph assuming it's a DAG.
        graph.topological_order()?;

        let type_to_units = self.hw_config.units_by_type();
        let mut ir = MappedIR::default();

        for (node_id, node) in &graph.nodes {
            let selected = self.select_unit(node_id, &node.taxonomy, &type_to_units)?;

            let mut attrs = HashMap::new();
            if self.options.enable_hint_passthrough {
                for hint in PASSTHROUGH_HINTS {
                    if let Some(v) = node.hint(hint) {
                        attrs.insert(hint.to_string(), v);
                    }
                }
            }

            HardwareAssigned {
                node_id,
                hw_unit_id: &selected,
            }
            .log();

            ir.nodes.insert(
                node_id.clone(),
                MappedNode {
                    node: node.clone(),
                    hw_unit_id: selected,
                    attrs,
                },
            );
        }
        ir.edges = graph.edges.clone();

        if self.options.enable_edge_augmentation {
            self.augment_edges(graph, &mut ir);
        }

        Ok(ir)
    }

    fn select_unit(
        &mut self,
        node_id: &str,
        taxonomy: &OperatorTaxonomy,
        type_to_units: &HashMap<String, Vec<&HardwareUnit>>,
    ) -> Result<String, SchedulerError> {
        if self.hw_config.units.is_empty() {
            return Err(SchedulerError::NoCompatibleHardware {
                node_id: node_id.to_string(),
            });
        }

        let mut candidate_type: Option<&str> = None;

        let direct = desired_unit_type(taxonomy);
        if type_to_units.get(direct).map(|u| !u.is_empty()).unwrap_or(false) {
            candidate_type = Some(direct);
        }

        if candidate_type.is_none() {
            for fallback in fallback_chain(taxonomy) {
                if type_to_units.get(*fallback).map(|u| !u.is_empty()).unwrap_or(false) {
                    candidate_type = Some(fallback);
                    break;
                }
            }
        }

        if candidate_type.is_none() {
            for generic in GENERIC_FALLBACK {
                if type_to_units.get(generic).map(|u| !u.is_empty()).unwrap_or(false) {
                    candidate_type = Some(generic);
                    break;
                }
            }
        }

        let units = match candidate_type {
            Some(t) => &type_to_units[t],
            None => {
                // Still unmapped: fall back to the first declared unit overall.
                let cursor = self.round_robin_cursor.entry("__any__".to_string()).or_insert(0);
                let unit = &self.hw_config.units[0];
                *cursor += 1;
                return Ok(unit.id.clone());
            }
        };

        let type_key = units[0].unit_type.clone();
        let cursor = self.round_robin_cursor.entry(type_key).or_insert(0);
        let chosen = units[*cursor % units.len()];
        *cursor += 1;
        Ok(chosen.id.clone())
    }

    /// Links dangling `FieldComputation`/`Blending` nodes (zero declared
    /// predecessors) to an earlier node whose last output shape's
    /// `(batch, feature)` pair matches the dangling node's first input
    /// shape. Producer-supplied edges are authoritative; this only ever
    /// *adds* edges, never rewires or removes one a caller provided.
    fn augment_edges(&self, graph: &OperatorGraph, ir: &mut MappedIR) {
        let has_predecessor: std::collections::HashSet<&str> =
            graph.edges.iter().map(|(_, to)| to.as_str()).collect();

        let node_order: Vec<&String> = graph.nodes.keys().collect();

        for (idx, node_id) in node_order.iter().enumerate() {
            if has_predecessor.contains(node_id.as_str()) {
                continue;
            }
            let node = &graph.nodes[*node_id];
            if !matches!(
                node.taxonomy,
                OperatorTaxonomy::FieldComputation | OperatorTaxonomy::Blending
            ) {
                continue;
            }
            let Some(target_shape) = node.inputs.first().map(|t| &t.shape) else {
                continue;
            };
            if target_shape.len() < 2 {
                continue;
            }
            let target_pair = (target_shape[0], target_shape[target_shape.len() - 1]);

            for candidate_id in &node_order[..idx] {
                let candidate = &graph.nodes[*candidate_id];
                let Some(out_shape) = candidate.outputs.last().map(|t| &t.shape) else {
                    continue;
                };
                if out_shape.len() < 2 {
                    continue;
                }
                let out_pair = (out_shape[0], out_shape[out_shape.len() - 1]);
                if out_pair == target_pair {
                    ir.edges.push(((*candidate_id).clone(), (*node_id).clone()));
                    break;
                }
            }
        }
    }
}
