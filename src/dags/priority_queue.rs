//! A binary max-heap of ready-to-place nodes keyed on priority score, with
//! dynamic tie-breaking on hardware availability.
//!
//! A `PrioritizedTask`/`PriorityWorkQueue` pattern whose fields
//! (`topological_rank`, `is_transform`) would normally be fixed at push
//! time so its `Ord` impl could embed the full tie-break directly. Here
//! the tie-break (`hw_available_at`) changes as nodes are placed, so the
//! heap orders on `score` alone and a pop-time pass breaks ties against
//! the live `hw_available_at` table — the same fast-path/slow-path shape
//! as blocked-task storage, applied to a tie-break instead of a readiness
//! check.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

#[derive(Debug, Clone)]
pub struct ScoredTask {
    pub node_id: String,
    pub score: f64,
    pub hw_unit_id: String,
}

impl PartialEq for ScoredTask {
    fn eq(&self, other: &Self) -> bool {
        self.node_id == other.node_id
    }
}

impl Eq for ScoredTask {}

impl PartialOrd for ScoredTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredTask {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score.partial_cmp(&other.score).unwrap_or(Ordering::Equal)
    }
}

#[derive(Default)]
pub struct ReadyQueue {
    heap: BinaryHeap<ScoredTask>,
    peak_size: usize,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: ScoredTask) {
        self.heap.push(task);
        self.peak_size = self.peak_size.max(self.heap.len());
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn peak_size(&self) -> usize {
        self.peak_size
    }

    /// Pops the highest-score task, breaking ties by the lowest
    /// `hw_available_at` for the task's unit, then lexicographically by
    /// node id.
    pub fn pop_best(&mut self, hw_available_at: &HashMap<String, u64>) -> Option<ScoredTask> {
        let top_score = self.heap.peek()?.score;
        let mut tied = Vec::new();
        while let Some(t) = self.heap.peek() {
            if t.score == top_score {
                tied.push(self.heap.pop().unwrap());
            } else {
                break;
            }
        }

        tied.sort_by(|a, b| {
            let a_avail = hw_available_at.get(&a.hw_unit_id).copied().unwrap_or(0);
            let b_avail = hw_available_at.get(&b.hw_unit_id).copied().unwrap_or(0);
            a_avail.cmp(&b_avail).then_with(|| a.node_id.cmp(&b.node_id))
        });

        let winner = tied.remove(0);
        for t in tied {
            self.heap.push(t);
        }
        self.peak_size = self.peak_size.max(self.heap.len() + 1);
        Some(winner)
    }
}
