use thiserror::Error;

/// Errors surfaced by the mapping, operator-level, and system-level
/// scheduling phases.
///
/// `EmptyInput` is deliberately absent: an empty [`OperatorGraph`](crate::ir::graph::OperatorGraph)
/// is valid input and produces an empty schedule, not an error.
/// `OptimizationStrategyMissingParam` is likewise recoverable and is never
/// returned as an `Err` — see [`crate::opsched::optimization`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("no compatible hardware unit for node '{node_id}'")]
    NoCompatibleHardware { node_id: String },

    #[error("edge references unknown node '{node_id}'")]
    UnknownNode { node_id: String },

    #[error("cycle detected: {}", cycle.join(" -> "))]
    CycleDetected { cycle: Vec<String> },

    #[error("hardware unit '{hw_unit_id}' has non-positive throughput or bandwidth")]
    ZeroThroughput { hw_unit_id: String },

    #[error("node '{node_id}' has an empty or zero-dimensioned input/output shape")]
    NaNInputShape { node_id: String },

    #[error("node '{node_id}' is referenced by an edge but unreachable from any entry point")]
    UnreachableNode { node_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_display_joins_node_path() {
        let err = SchedulerError::CycleDetected {
            cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert_eq!(err.to_string(), "cycle detected: a -> b -> a");
    }
}
