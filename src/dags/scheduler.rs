//! Dependency-Aware Greedy Scheduling (DAGS): the system-level scheduler.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::dags::priority_queue::{ReadyQueue, ScoredTask};
use crate::dags::scoring::{avg_duration_per_unit, critical_resource_impact, score, successor_counts};
use crate::errors::SchedulerError;
use crate::ir::opsched_ir::OpScheduledIR;
use crate::ir::schedule::{SystemSchedule, SystemScheduleEntry, SystemScheduleStats};
use crate::observability::dags::SystemScheduleCompleted;
use crate::observability::StructuredLog;

/// Default `alpha`/`beta` weights for `score(v) = alpha*SC(v) + beta*CR(v)`.
pub const DEFAULT_ALPHA: f64 = 0.6;
pub const DEFAULT_BETA: f64 = 0.4;

/// Optional per-hardware-unit minimum bandwidth (bytes/cycle) used by the
/// memory-bandwidth-floor post-pass. Entries are looked up by hw unit id;
/// units absent from the map are left untouched.
pub type BandwidthFloors = HashMap<String, f64>;

pub struct DagsScheduler {
    alpha: f64,
    beta: f64,
}

impl Default for DagsScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA, DEFAULT_BETA)
    }
}

impl DagsScheduler {
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }

    pub fn schedule(&self, scheduled: &OpScheduledIR) -> Result<SystemSchedule, SchedulerError> {
        self.schedule_with_bandwidth_floors(scheduled, None)
    }

    pub fn schedule_with_bandwidth_floors(
        &self,
        scheduled: &OpScheduledIR,
        bandwidth_floors: Option<&BandwidthFloors>,
    ) -> Result<SystemSchedule, SchedulerError> {
        if scheduled.nodes.is_empty() {
            return Ok(SystemSchedule::default());
        }

        for (from, to) in &scheduled.edges {
            if !scheduled.nodes.contains_key(from) {
                return Err(SchedulerError::UnreachableNode { node_id: from.clone() });
            }
            if !scheduled.nodes.contains_key(to) {
                return Err(SchedulerError::UnreachableNode { node_id: to.clone() });
            }
        }

        let topo_order = topological_order(scheduled)?;
        let sc = successor_counts(&topo_order, &scheduled.edges);
        let avg_duration = avg_duration_per_unit(scheduled);

        let mut predecessors: HashMap<String, Vec<String>> =
            scheduled.nodes.keys().map(|k| (k.clone(), Vec::new())).collect();
        let mut successors: HashMap<String, Vec<String>> =
            scheduled.nodes.keys().map(|k| (k.clone(), Vec::new())).collect();
        for (from, to) in &scheduled.edges {
            predecessors.entry(to.clone()).or_default().push(from.clone());
            successors.entry(from.clone()).or_default().push(to.clone());
        }

        let mut remaining_preds: HashMap<String, usize> = predecessors
            .iter()
            .map(|(k, v)| (k.clone(), v.len()))
            .collect();

        let mut queue = ReadyQueue::new();
        let mut hw_available_at: HashMap<String, u64> = HashMap::new();
        let mut pred_finish: HashMap<String, u64> = HashMap::new();
        let mut entries: Vec<SystemScheduleEntry> = Vec::with_capacity(scheduled.nodes.len());

        let node_score = |id: &str| -> f64 {
            let node = &scheduled.nodes[id];
            let avg = avg_duration.get(&node.mapped.hw_unit_id).copied().unwrap_or(0.0);
            let cr = critical_resource_impact(node.duration, avg);
            score(sc.get(id).copied().unwrap_or(0), cr, self.alpha, self.beta)
        };

        // Seed with entry points (node-declaration order; the heap's tie
        // break makes push order immaterial to the final result).
        for id in scheduled.nodes.keys() {
            if remaining_preds.get(id).copied().unwrap_or(0) == 0 {
                queue.push(ScoredTask {
                    node_id: id.clone(),
                    score: node_score(id),
                    hw_unit_id: scheduled.nodes[id].mapped.hw_unit_id.clone(),
                });
            }
        }

        while let Some(task) = queue.pop_best(&hw_available_at) {
            let node = &scheduled.nodes[&task.node_id];
            let unit = node.mapped.hw_unit_id.clone();

            let earliest_pred_finish = pred_finish.get(&task.node_id).copied().unwrap_or(0);
            let unit_available = hw_available_at.get(&unit).copied().unwrap_or(0);
            let start = earliest_pred_finish.max(unit_available);
            let finish = start + node.duration;

            hw_available_at.insert(unit.clone(), finish);
            entries.push(SystemScheduleEntry {
                node_id: task.node_id.clone(),
                hw_unit_id: unit,
                start_cycle: start,
                finish_cycle: finish,
            });

            if let Some(succs) = successors.get(&task.node_id) {
                for succ in succs.clone() {
                    let finish_so_far = pred_finish.entry(succ.clone()).or_insert(0);
                    *finish_so_far = (*finish_so_far).max(finish);

                    let remaining = remaining_preds.get_mut(&succ).unwrap();
                    *remaining -= 1;
                    if *remaining == 0 {
                        queue.push(ScoredTask {
                            node_id: succ.clone(),
                            score: node_score(&succ),
                            hw_unit_id: scheduled.nodes[&succ].mapped.hw_unit_id.clone(),
                        });
                    }
                }
            }
        }

        if let Some(floors) = bandwidth_floors {
            apply_bandwidth_floor(&mut entries, &successors, scheduled, floors);
        }

        let total_cycles = entries.iter().map(|e| e.finish_cycle).max().unwrap_or(0);
        let stats = compute_stats(&entries, total_cycles, queue.peak_size());

        SystemScheduleCompleted {
            node_count: entries.len(),
            total_cycles,
            ready_queue_peak_size: stats.ready_queue_peak_size,
        }
        .log();

        Ok(SystemSchedule {
            entries,
            total_cycles,
            stats,
        })
    }
}

fn topological_order(scheduled: &OpScheduledIR) -> Result<Vec<String>, SchedulerError> {
    let mut in_degree: HashMap<String, usize> =
        scheduled.nodes.keys().map(|k| (k.clone(), 0)).collect();
    let mut fwd: HashMap<String, Vec<String>> =
        scheduled.nodes.keys().map(|k| (k.clone(), Vec::new())).collect();
    for (from, to) in &scheduled.edges {
        *in_degree.get_mut(to).unwrap() += 1;
        fwd.get_mut(from).unwrap().push(to.clone());
    }

    let mut queue: VecDeque<String> = scheduled
        .nodes
        .keys()
        .filter(|id| in_degree[*id] == 0)
        .cloned()
        .collect();

    let mut order = Vec::with_capacity(scheduled.nodes.len());
    while let Some(id) = queue.pop_front() {
        order.push(id.clone());
        for succ in &fwd[&id] {
            let deg = in_degree.get_mut(succ).unwrap();
            *deg -= 1;
            if *deg == 0 {
                queue.push_back(succ.clone());
            }
        }
    }

    if order.len() == scheduled.nodes.len() {
        Ok(order)
    } else {
        let unresolved: Vec<String> = in_degree
            .into_iter()
            .filter(|(_, deg)| *deg > 0)
            .map(|(id, _)| id)
            .collect();
        Err(SchedulerError::CycleDetected { cycle: unresolved })
    }
}

/// Raises (never lowers) an entry's duration when a caller-supplied
/// per-unit bandwidth floor implies a longer memory time than originally
/// computed, cascading the increase to every downstream entry.
fn apply_bandwidth_floor(
    entries: &mut [SystemScheduleEntry],
    successors: &HashMap<String, Vec<String>>,
    scheduled: &OpScheduledIR,
    floors: &BandwidthFloors,
) {
    let mut index_by_id: HashMap<String, usize> = HashMap::new();
    for (i, e) in entries.iter().enumerate() {
        index_by_id.insert(e.node_id.clone(), i);
    }

    let order: Vec<String> = {
        let mut ids: Vec<&SystemScheduleEntry> = entries.iter().collect();
        ids.sort_by_key(|e| e.start_cycle);
        ids.into_iter().map(|e| e.node_id.clone()).collect()
    };

    let mut extra_delay: HashMap<String, u64> = HashMap::new();

    for id in order {
        let idx = index_by_id[&id];
        let node = &scheduled.nodes[&id];
        if let Some(&floor_bandwidth) = floors.get(&node.mapped.hw_unit_id) {
            if floor_bandwidth > 0.0 {
                let floored = (node.memory_bytes as f64 / floor_bandwidth).ceil() as u64;
                if floored > node.duration {
                    let shift = floored - node.duration;
                    entries[idx].finish_cycle += shift;
                    *extra_delay.entry(id.clone()).or_insert(0) += shift;
                }
            }
        }

        let upstream_delay = extra_delay.get(&id).copied().unwrap_or(0);
        if upstream_delay == 0 {
            continue;
        }
        if let Some(succs) = successors.get(&id) {
            for succ in succs {
                if let Some(&succ_idx) = index_by_id.get(succ) {
                    entries[succ_idx].start_cycle += upstream_delay;
                    entries[succ_idx].finish_cycle += upstream_delay;
                    *extra_delay.entry(succ.clone()).or_insert(0) += upstream_delay;
                }
            }
        }
    }
}

fn compute_stats(
    entries: &[SystemScheduleEntry],
    total_cycles: u64,
    ready_queue_peak_size: usize,
) -> SystemScheduleStats {
    if entries.is_empty() || total_cycles == 0 {
        return SystemScheduleStats {
            ready_queue_peak_size,
            ..Default::default()
        };
    }

    let units: HashSet<&str> = entries.iter().map(|e| e.hw_unit_id.as_str()).collect();
    let sum_duration: u64 = entries.iter().map(|e| e.duration()).sum();
    let scheduling_efficiency = sum_duration as f64 / (total_cycles as f64 * units.len() as f64);

    let mut busy_by_unit: HashMap<String, u64> = HashMap::new();
    for e in entries {
        *busy_by_unit.entry(e.hw_unit_id.clone()).or_insert(0) += e.duration();
    }

    let busy_values: Vec<f64> = busy_by_unit.values().map(|&v| v as f64).collect();
    let mean = busy_values.iter().sum::<f64>() / busy_values.len() as f64;
    let variance = if mean > 0.0 {
        busy_values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / busy_values.len() as f64
    } else {
        0.0
    };
    let std_dev = variance.sqrt();
    let coefficient_of_variation = if mean > 0.0 { std_dev / mean } else { 0.0 };
    let resource_balance_factor = (1.0 - coefficient_of_variation).max(0.0);

    let mut per_unit_utilization = indexmap::IndexMap::new();
    for unit in busy_by_unit.keys() {
        per_unit_utilization.insert(
            unit.clone(),
            busy_by_unit[unit] as f64 / total_cycles as f64,
        );
    }

    SystemScheduleStats {
        scheduling_efficiency,
        resource_balance_factor,
        ready_queue_peak_size,
        per_unit_utilization,
    }
}
