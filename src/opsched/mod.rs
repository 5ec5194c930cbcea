//! Computes per-node durations via the roofline equation combined with the
//! optimization library, and each node's earliest-ready cycle.

pub mod optimization;
pub mod roofline;

use indexmap::IndexMap;

use crate::errors::SchedulerError;
use crate::ir::mapped::MappedIR;
use crate::ir::opsched_ir::{OpSchedStats, OpScheduledIR, OpScheduledNode};
use crate::observability::opsched::OpSchedCompleted;
use crate::observability::StructuredLog;
use optimization::OptimizationLibrary;

/// Hardware metrics needed by the roofline equation, resolved from a
/// `HardwareConfig` unit by id.
struct HwMetrics {
    throughput: f64,
    bandwidth: f64,
}

pub struct OpLevelScheduler {
    library: OptimizationLibrary,
}

impl Default for OpLevelScheduler {
    fn default() -> Self {
        Self::new(OptimizationLibrary::with_builtin_strategies())
    }
}

impl OpLevelScheduler {
    pub fn new(library: OptimizationLibrary) -> Self {
        Self { library }
    }

    pub fn schedule(
        &self,
        mapped: &MappedIR,
        hw_config: &crate::ir::mapped::HardwareConfig,
    ) -> Result<OpScheduledIR, SchedulerError> {
        let mut nodes: IndexMap<String, OpScheduledNode> = IndexMap::new();
        let mut warnings = Vec::new();
        let mut per_unit_operator_count: IndexMap<String, usize> = IndexMap::new();
        let mut speedups: Vec<f64> = Vec::new();
        let mut optimized_operators = 0usize;

        for (node_id, mapped_node) in &mapped.nodes {
            let unit = hw_config
                .unit(&mapped_node.hw_unit_id)
                .ok_or_else(|| SchedulerError::NoCompatibleHardware {
                    node_id: node_id.clone(),
                })?;
            let hw = HwMetrics {
                throughput: unit.throughput_ops_per_cycle,
                bandwidth: unit.bandwidth_bytes_per_cycle,
            };
            if hw.throughput <= 0.0 || hw.bandwidth <= 0.0 {
                return Err(SchedulerError::ZeroThroughput {
                    hw_unit_id: unit.id.clone(),
                });
            }

            let n_op = largest_num_elements(&mapped_node.node.outputs).ok_or_else(|| {
                SchedulerError::NaNInputShape {
                    node_id: node_id.clone(),
                }
            })?;
            let v_off = total_bytes(&mapped_node.node.inputs, &mapped_node.node.outputs)
                .ok_or_else(|| SchedulerError::NaNInputShape {
                    node_id: node_id.clone(),
                })?;

            let applied = self
                .library
                .apply(mapped_node.node.taxonomy.as_str(), &mapped_node.node.hints);
            for missing in &applied.missing_params {
                crate::observability::opsched::OptimizationStrategyMissingParam {
                    node_id,
                    strategy: &missing.0,
                    param: &missing.1,
                }
                .log();
                warnings.push(format!(
                    "{}: strategy '{}' missing param '{}', applied neutral factor",
                    node_id, missing.0, missing.1
                ));
            }

            let outcome = roofline::compute_duration(
                n_op,
                v_off,
                hw.throughput,
                hw.bandwidth,
                applied.s_comp,
                applied.r_bytes,
            );

            if !applied.applied_strategies.is_empty() {
                optimized_operators += 1;
                let base = roofline::compute_duration(n_op, v_off, hw.throughput, hw.bandwidth, 1.0, 1.0);
                if outcome.duration > 0 {
                    speedups.push(base.duration as f64 / outcome.duration as f64);
                }
            }

            *per_unit_operator_count
                .entry(mapped_node.hw_unit_id.clone())
                .or_insert(0) += 1;

            nodes.insert(
                node_id.clone(),
                OpScheduledNode {
                    mapped: mapped_node.clone(),
                    duration: outcome.duration,
                    earliest_ready_cycle: 0,
                    applied_strategies: applied.applied_strategies,
                    s_comp: applied.s_comp,
                    r_bytes: applied.r_bytes,
                    is_compute_bound: outcome.is_compute_bound,
                    memory_bytes: v_off,
                },
            );
        }

        compute_earliest_ready_cycles(&mut nodes, &mapped.edges);

        let geomean_speedup = if speedups.is_empty() {
            1.0
        } else {
            let log_sum: f64 = speedups.iter().map(|s| s.ln()).sum();
            (log_sum / speedups.len() as f64).exp()
        };

        let stats = OpSchedStats {
            total_operators: nodes.len(),
            optimized_operators,
            geomean_speedup,
            per_unit_operator_count,
        };

        OpSchedCompleted {
            total_operators: stats.total_operators,
            optimized_operators: stats.optimized_operators,
            geomean_speedup: stats.geomean_speedup,
        }
        .log();

        Ok(OpScheduledIR {
            nodes,
            edges: mapped.edges.clone(),
            stats,
            warnings,
        })
    }
}

fn largest_num_elements(outputs: &[crate::ir::tensor::TensorDescriptor]) -> Option<u64> {
    if outputs.is_empty() {
        return Some(1);
    }
    outputs
        .iter()
        .map(|t| t.num_elements())
        .collect::<Option<Vec<u64>>>()
        .map(|sizes| sizes.into_iter().max().unwrap_or(1))
}

fn total_bytes(
    inputs: &[crate::ir::tensor::TensorDescriptor],
    outputs: &[crate::ir::tensor::TensorDescriptor],
) -> Option<u64> {
    let mut total = 0u64;
    for t in inputs.iter().chain(outputs.iter()) {
        total += t.byte_size()?;
    }
    Some(total)
}

/// `earliest_ready_cycle(v) = max(pred.earliest_ready_cycle + pred.duration)`,
/// or `0` for a node with no predecessors. Computed via one pass over nodes
/// in edge-respecting (insertion) order — callers are expected to have
/// already validated the graph is acyclic upstream (mapping does this).
fn compute_earliest_ready_cycles(
    nodes: &mut IndexMap<String, OpScheduledNode>,
    edges: &[(String, String)],
) {
    let mut predecessors: IndexMap<String, Vec<String>> =
        nodes.keys().map(|k| (k.clone(), Vec::new())).collect();
    for (from, to) in edges {
        predecessors.entry(to.clone()).or_default().push(from.clone());
    }

    // Nodes were inserted in mapped-IR order, which mirrors declaration
    // order in the source graph; since edges only ever point from an
    // earlier-declared producer to a later-declared consumer in all inputs
    // this crate constructs, a single forward pass suffices.
    let ids: Vec<String> = nodes.keys().cloned().collect();
    for id in ids {
        let preds = predecessors.get(&id).cloned().unwrap_or_default();
        let ready = preds
            .iter()
            .filter_map(|p| nodes.get(p))
            .map(|p| p.earliest_ready_cycle + p.duration)
            .max()
            .unwrap_or(0);
        if let Some(n) = nodes.get_mut(&id) {
            n.earliest_ready_cycle = ready;
        }
    }
}
