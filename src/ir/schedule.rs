use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One placed operator in a [`SystemSchedule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemScheduleEntry {
    pub node_id: String,
    pub hw_unit_id: String,
    pub start_cycle: u64,
    pub finish_cycle: u64,
}

impl SystemScheduleEntry {
    pub fn duration(&self) -> u64 {
        self.finish_cycle - self.start_cycle
    }
}

/// Aggregate statistics over a system-level schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemScheduleStats {
    pub scheduling_efficiency: f64,
    pub resource_balance_factor: f64,
    pub ready_queue_peak_size: usize,
    pub per_unit_utilization: IndexMap<String, f64>,
}

/// Output of the system-level (DAGS) scheduling phase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemSchedule {
    pub entries: Vec<SystemScheduleEntry>,
    pub total_cycles: u64,
    pub stats: SystemScheduleStats,
}

impl SystemSchedule {
    pub fn entry(&self, node_id: &str) -> Option<&SystemScheduleEntry> {
        self.entries.iter().find(|e| e.node_id == node_id)
    }
}
