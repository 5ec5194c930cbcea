//! `score(v) = alpha * SC(v) + beta * CR(v)`.

use std::collections::HashMap;

use crate::ir::opsched_ir::OpScheduledIR;

/// Transitive successor count for every node, computed once via a single
/// reverse-topological accumulation pass: `SC(v) = successors(v).len() +
/// sum(SC(s) for s in successors(v))`. Counts paths, not distinct
/// descendants, matching the accumulation rule directly.
pub fn successor_counts(topo_order: &[String], edges: &[(String, String)]) -> HashMap<String, u64> {
    let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();
    for (from, to) in edges {
        successors.entry(from.as_str()).or_default().push(to.as_str());
    }

    let mut sc: HashMap<String, u64> = HashMap::new();
    for id in topo_order.iter().rev() {
        let total: u64 = successors
            .get(id.as_str())
            .into_iter()
            .flatten()
            .map(|s| 1 + sc.get(*s).copied().unwrap_or(0))
            .sum();
        sc.insert(id.clone(), total);
    }
    sc
}

/// Mean scheduled duration per hardware unit, over the operators mapped to
/// it.
pub fn avg_duration_per_unit(scheduled: &OpScheduledIR) -> HashMap<String, f64> {
    let mut sums: HashMap<String, (u64, u64)> = HashMap::new();
    for node in scheduled.nodes.values() {
        let entry = sums.entry(node.mapped.hw_unit_id.clone()).or_insert((0, 0));
        entry.0 += node.duration;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(unit, (sum, count))| {
            let avg = if count > 0 { sum as f64 / count as f64 } else { 0.0 };
            (unit, avg)
        })
        .collect()
}

/// `CR(v) = duration(v) / avg_duration(hw_unit(v))`.
pub fn critical_resource_impact(duration: u64, avg_duration_for_unit: f64) -> f64 {
    if avg_duration_for_unit > 0.0 {
        duration as f64 / avg_duration_for_unit
    } else {
        0.0
    }
}

pub fn score(sc: u64, cr: f64, alpha: f64, beta: f64) -> f64 {
    alpha * sc as f64 + beta * cr
}
