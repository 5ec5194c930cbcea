use std::fmt;

use tracing::{info_span, Span};

use super::StructuredLog;

/// An optimization strategy was applicable but missing a required hint;
/// a neutral factor was substituted and the run continued.
pub struct OptimizationStrategyMissingParam<'a> {
    pub node_id: &'a str,
    pub strategy: &'a str,
    pub param: &'a str,
}

impl fmt::Display for OptimizationStrategyMissingParam<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "strategy '{}' missing param '{}' for node '{}'; applying neutral factor",
            self.strategy, self.param, self.node_id
        )
    }
}

impl StructuredLog for OptimizationStrategyMissingParam<'_> {
    fn log(&self) {
        tracing::warn!(
            node_id = self.node_id,
            strategy = self.strategy,
            param = self.param,
            "{}",
            self
        );
    }

    fn span(&self, name: &'static str) -> Span {
        info_span!("opsched", name, node_id = self.node_id, strategy = self.strategy)
    }
}

/// Operator-level scheduling finished for a graph.
pub struct OpSchedCompleted {
    pub total_operators: usize,
    pub optimized_operators: usize,
    pub geomean_speedup: f64,
}

impl fmt::Display for OpSchedCompleted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scheduled {} operators ({} optimized, {:.3}x geomean speedup)",
            self.total_operators, self.optimized_operators, self.geomean_speedup
        )
    }
}

impl StructuredLog for OpSchedCompleted {
    fn log(&self) {
        tracing::info!(
            total_operators = self.total_operators,
            optimized_operators = self.optimized_operators,
            geomean_speedup = self.geomean_speedup,
            "{}",
            self
        );
    }

    fn span(&self, name: &'static str) -> Span {
        info_span!("opsched", name, total_operators = self.total_operators)
    }
}
