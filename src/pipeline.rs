//! Wires the three scheduling phases together behind a single entry point
//! driven by a [`SchedulerConfig`], instrumenting each phase with
//! [`PhaseTimings`] when the config asks for it.

use crate::config::SchedulerConfig;
use crate::dags::DagsScheduler;
use crate::errors::SchedulerError;
use crate::ir::graph::OperatorGraph;
use crate::ir::mapped::HardwareConfig;
use crate::ir::schedule::SystemSchedule;
use crate::mapping::{MappingEngine, MappingOptions};
use crate::opsched::optimization::OptimizationLibrary;
use crate::opsched::OpLevelScheduler;
use crate::timing::PhaseTimings;

/// Runs mapping -> operator-level scheduling -> system-level scheduling for
/// one `(graph, hardware)` pair, with every phase built from `config` rather
/// than each phase's own defaults.
pub fn run(
    graph: &OperatorGraph,
    hw_config: &HardwareConfig,
    config: &SchedulerConfig,
) -> Result<(SystemSchedule, PhaseTimings), SchedulerError> {
    let mut timings = PhaseTimings::new(config.enable_timing);

    let mut mapper = MappingEngine::with_options(
        hw_config.clone(),
        MappingOptions {
            enable_hint_passthrough: config.enable_hint_passthrough,
            enable_edge_augmentation: config.enable_edge_augmentation,
        },
    );
    let mapped = timings.time("mapping", || mapper.run(graph))?;

    let op_scheduler = OpLevelScheduler::new(OptimizationLibrary::with_builtin_strategies());
    let scheduled = timings.time("opsched", || op_scheduler.schedule(&mapped, hw_config))?;

    let dags = DagsScheduler::new(config.alpha, config.beta);
    let floors = config
        .enable_memory_bandwidth_floor
        .then_some(&config.bandwidth_floors);
    let schedule =
        timings.time("dags", || dags.schedule_with_bandwidth_floors(&scheduled, floors))?;

    Ok((schedule, timings))
}
