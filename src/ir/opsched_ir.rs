use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ir::mapped::MappedNode;

/// A [`MappedNode`] with its computed roofline duration and applied
/// optimization strategies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpScheduledNode {
    pub mapped: MappedNode,
    pub duration: u64,
    pub earliest_ready_cycle: u64,
    pub applied_strategies: Vec<String>,
    pub s_comp: f64,
    pub r_bytes: f64,
    pub is_compute_bound: bool,
    /// Communication volume (`v_off`, bytes) used by the roofline equation;
    /// kept on the node so a later pass (e.g. the memory-bandwidth-floor
    /// post-pass) can re-evaluate the memory-bound term without re-deriving
    /// it from the original tensors.
    pub memory_bytes: u64,
}

/// Aggregate statistics over an operator-level schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpSchedStats {
    pub total_operators: usize,
    pub optimized_operators: usize,
    pub geomean_speedup: f64,
    pub per_unit_operator_count: IndexMap<String, usize>,
}

/// Output of the operator-level scheduling phase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpScheduledIR {
    pub nodes: IndexMap<String, OpScheduledNode>,
    pub edges: Vec<(String, String)>,
    pub stats: OpSchedStats,
    /// Recoverable optimization warnings collected during scheduling
    /// (e.g. a strategy missing a required hint, applied as a neutral
    /// factor instead of aborting the run).
    pub warnings: Vec<String>,
}
