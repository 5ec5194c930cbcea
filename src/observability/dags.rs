use std::fmt;

use tracing::{info_span, Span};

use super::StructuredLog;

/// System-level (DAGS) scheduling finished for a graph.
pub struct SystemScheduleCompleted {
    pub node_count: usize,
    pub total_cycles: u64,
    pub ready_queue_peak_size: usize,
}

impl fmt::Display for SystemScheduleCompleted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scheduled {} nodes over {} cycles (ready-queue peak {})",
            self.node_count, self.total_cycles, self.ready_queue_peak_size
        )
    }
}

impl StructuredLog for SystemScheduleCompleted {
    fn log(&self) {
        tracing::info!(
            node_count = self.node_count,
            total_cycles = self.total_cycles,
            ready_queue_peak_size = self.ready_queue_peak_size,
            "{}",
            self
        );
    }

    fn span(&self, name: &'static str) -> Span {
        info_span!("dags", name, node_count = self.node_count)
    }
}
