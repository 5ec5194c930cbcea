//! End-to-end scenarios S1-S6, each checking exact expected numeric values
//! against the full mapping -> operator-scheduling -> system-scheduling
//! pipeline (or a single phase, where the scenario targets that phase
//! specifically).

use std::collections::HashMap;

use anyhow::Result;
use indexmap::IndexMap;
use nra_ppa_sim::dags::DagsScheduler;
use nra_ppa_sim::ir::mapped::{HardwareConfig, HardwareUnit, MappedNode};
use nra_ppa_sim::ir::node::{OperatorNode, OperatorTaxonomy};
use nra_ppa_sim::ir::opsched_ir::{OpSchedStats, OpScheduledIR, OpScheduledNode};
use nra_ppa_sim::ir::tensor::{DataType, TensorDescriptor};
use nra_ppa_sim::mapping::MappingEngine;
use nra_ppa_sim::opsched::optimization::OptimizationLibrary;
use nra_ppa_sim::opsched::OpLevelScheduler;
use nra_ppa_sim::OperatorGraph;

fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}

/// S1: a linear chain `A(ENCODING) -> B(FIELD_COMPUTATION)`, both operators
/// computing to `duration = 1`, giving `total_cycles = 2`.
#[test]
fn s1_linear_chain_two_unit_durations_sum_to_total_cycles() -> Result<()> {
    init_tracing();
    let mut graph = OperatorGraph::new();
    graph.add_node(
        OperatorNode::new("A", OperatorTaxonomy::Encoding)
            .with_io(vec![], vec![TensorDescriptor::with_dtype(vec![1], DataType::F32)]),
    );
    graph.add_node(
        OperatorNode::new("B", OperatorTaxonomy::FieldComputation).with_io(
            vec![TensorDescriptor::with_dtype(vec![1], DataType::F32)],
            vec![TensorDescriptor::with_dtype(vec![1], DataType::F32)],
        ),
    );
    graph.add_edge("A", "B");

    let hw = HardwareConfig::new(vec![
        HardwareUnit::new("enc0", "ENCODING", 1.0, 1000.0),
        HardwareUnit::new("fc0", "FIELD_COMPUTATION", 1.0, 1000.0),
    ]);

    let mut mapper = MappingEngine::new(hw.clone());
    let mapped = mapper.run(&graph)?;

    let op_scheduler = OpLevelScheduler::default();
    let scheduled = op_scheduler.schedule(&mapped, &hw)?;
    assert_eq!(scheduled.nodes["A"].duration, 1);
    assert_eq!(scheduled.nodes["B"].duration, 1);

    let dags = DagsScheduler::default();
    let schedule = dags.schedule(&scheduled)?;
    assert_eq!(schedule.total_cycles, 2);
    assert_eq!(schedule.entry("A").unwrap().start_cycle, 0);
    assert_eq!(schedule.entry("A").unwrap().finish_cycle, 1);
    assert_eq!(schedule.entry("B").unwrap().start_cycle, 1);
    assert_eq!(schedule.entry("B").unwrap().finish_cycle, 2);
    Ok(())
}

/// S2 literal: two parallel `FIELD_COMPUTATION` nodes with no edges between
/// them, mapped to two distinct units of the same type, both start at
/// cycle 0 and `total_cycles` is the slower of the two durations.
#[test]
fn s2_two_parallel_nodes_on_distinct_units_both_start_at_zero() -> Result<()> {
    init_tracing();
    let mut graph = OperatorGraph::new();
    graph.add_node(
        OperatorNode::new("a", OperatorTaxonomy::FieldComputation)
            .with_io(vec![], vec![TensorDescriptor::new(vec![10])]),
    );
    graph.add_node(
        OperatorNode::new("b", OperatorTaxonomy::FieldComputation)
            .with_io(vec![], vec![TensorDescriptor::new(vec![50])]),
    );
    let hw = HardwareConfig::new(vec![
        HardwareUnit::new("fc0", "FIELD_COMPUTATION", 10.0, 1_000_000.0),
        HardwareUnit::new("fc1", "FIELD_COMPUTATION", 10.0, 1_000_000.0),
    ]);

    let mut mapper = MappingEngine::new(hw.clone());
    let mapped = mapper.run(&graph)?;
    assert_ne!(mapped.nodes["a"].hw_unit_id, mapped.nodes["b"].hw_unit_id);

    let op_scheduler = OpLevelScheduler::default();
    let scheduled = op_scheduler.schedule(&mapped, &hw)?;
    assert_eq!(scheduled.nodes["a"].duration, 1);
    assert_eq!(scheduled.nodes["b"].duration, 5);

    let dags = DagsScheduler::default();
    let schedule = dags.schedule(&scheduled)?;
    assert_eq!(schedule.entry("a").unwrap().start_cycle, 0);
    assert_eq!(schedule.entry("b").unwrap().start_cycle, 0);
    assert_eq!(schedule.total_cycles, 5);
    Ok(())
}

/// S3 literal: two parallel nodes with no edges, both mapped to the same
/// unit, so one runs first and the other waits for it to finish; ties in
/// score and hardware availability break lexicographically on node id.
#[test]
fn s3_two_parallel_nodes_on_one_unit_tie_break_lexicographically() -> Result<()> {
    init_tracing();
    let mut nodes = IndexMap::new();
    nodes.insert("a".to_string(), opsched_node("a", "u0", 10));
    nodes.insert("b".to_string(), opsched_node("b", "u0", 10));
    let scheduled = OpScheduledIR {
        nodes,
        edges: Vec::new(),
        stats: OpSchedStats::default(),
        warnings: Vec::new(),
    };

    let schedule = DagsScheduler::default().schedule(&scheduled)?;
    let a = schedule.entry("a").unwrap();
    let b = schedule.entry("b").unwrap();
    assert_eq!((a.start_cycle, a.finish_cycle), (0, 10));
    assert_eq!((b.start_cycle, b.finish_cycle), (10, 20));
    assert_eq!(schedule.total_cycles, 20);
    Ok(())
}

/// Round robin spreads repeated same-type operators evenly across every
/// hardware unit declared for that type (additional coverage beyond S2).
#[test]
fn mapping_round_robin_across_compatible_units() -> Result<()> {
    init_tracing();
    let mut graph = OperatorGraph::new();
    for id in ["a", "b", "c", "d"] {
        graph.add_node(OperatorNode::new(id, OperatorTaxonomy::Mlp));
    }
    let hw = HardwareConfig::new(vec![
        HardwareUnit::new("mlp0", "MLP", 1.0, 1.0),
        HardwareUnit::new("mlp1", "MLP", 1.0, 1.0),
    ]);
    let mut mapper = MappingEngine::new(hw);
    let mapped = mapper.run(&graph)?;

    assert_eq!(mapped.nodes["a"].hw_unit_id, "mlp0");
    assert_eq!(mapped.nodes["b"].hw_unit_id, "mlp1");
    assert_eq!(mapped.nodes["c"].hw_unit_id, "mlp0");
    assert_eq!(mapped.nodes["d"].hw_unit_id, "mlp1");
    Ok(())
}

/// An empty operator graph produces an empty schedule at every phase, never
/// an error (`EmptyInput` is explicitly not an error condition).
#[test]
fn empty_graph_yields_empty_schedule_not_error() -> Result<()> {
    init_tracing();
    let graph = OperatorGraph::new();
    let hw = HardwareConfig::new(vec![HardwareUnit::new("u0", "ENCODING", 1.0, 1.0)]);

    let mut mapper = MappingEngine::new(hw.clone());
    let mapped = mapper.run(&graph)?;
    assert!(mapped.nodes.is_empty());

    let op_scheduler = OpLevelScheduler::default();
    let scheduled = op_scheduler.schedule(&mapped, &hw)?;
    assert_eq!(scheduled.stats.total_operators, 0);

    let dags = DagsScheduler::default();
    let schedule = dags.schedule(&scheduled)?;
    assert!(schedule.entries.is_empty());
    assert_eq!(schedule.total_cycles, 0);
    Ok(())
}

fn opsched_node(id: &str, hw_unit_id: &str, duration: u64) -> OpScheduledNode {
    OpScheduledNode {
        mapped: MappedNode {
            node: OperatorNode::new(id, OperatorTaxonomy::FieldComputation),
            hw_unit_id: hw_unit_id.to_string(),
            attrs: HashMap::new(),
        },
        duration,
        earliest_ready_cycle: 0,
        applied_strategies: Vec::new(),
        s_comp: 1.0,
        r_bytes: 1.0,
        is_compute_bound: true,
        memory_bytes: duration,
    }
}

/// S4: a diamond dependency (`A -> B, A -> C, B -> D, C -> D`) with
/// durations `A=10, B=20, C=30, D=5`, `B` and `C` on independent hardware
/// units so they run in parallel after `A` finishes.
#[test]
fn s4_diamond_dependency_exact_start_finish_cycles() -> Result<()> {
    init_tracing();
    let mut nodes = IndexMap::new();
    nodes.insert("A".to_string(), opsched_node("A", "u_a", 10));
    nodes.insert("B".to_string(), opsched_node("B", "u_b", 20));
    nodes.insert("C".to_string(), opsched_node("C", "u_c", 30));
    nodes.insert("D".to_string(), opsched_node("D", "u_d", 5));

    let scheduled = OpScheduledIR {
        nodes,
        edges: vec![
            ("A".to_string(), "B".to_string()),
            ("A".to_string(), "C".to_string()),
            ("B".to_string(), "D".to_string()),
            ("C".to_string(), "D".to_string()),
        ],
        stats: OpSchedStats::default(),
        warnings: Vec::new(),
    };

    let schedule = DagsScheduler::default().schedule(&scheduled)?;

    let a = schedule.entry("A").unwrap();
    assert_eq!((a.start_cycle, a.finish_cycle), (0, 10));

    let b = schedule.entry("B").unwrap();
    assert_eq!((b.start_cycle, b.finish_cycle), (10, 30));

    let c = schedule.entry("C").unwrap();
    assert_eq!((c.start_cycle, c.finish_cycle), (10, 40));

    let d = schedule.entry("D").unwrap();
    assert_eq!((d.start_cycle, d.finish_cycle), (40, 45));

    assert_eq!(schedule.total_cycles, 45);
    Ok(())
}

/// S5: `tile_culling` with `active_samples_ratio = 0.5` halves a
/// compute-bound `SAMPLING` node's duration from a 100-cycle baseline to 50.
#[test]
fn s5_tile_culling_reduces_duration_to_fifty() -> Result<()> {
    init_tracing();
    let mut graph = OperatorGraph::new();
    graph.add_node(
        OperatorNode::new("a", OperatorTaxonomy::Sampling)
            .with_io(vec![], vec![TensorDescriptor::new(vec![1000])])
            .with_hint("active_samples_ratio", 0.5),
    );
    let hw = HardwareConfig::new(vec![HardwareUnit::new("s0", "SAMPLING", 10.0, 1_000_000.0)]);

    let mut mapper = MappingEngine::new(hw.clone());
    let mapped = mapper.run(&graph)?;

    let op_scheduler = OpLevelScheduler::new(OptimizationLibrary::with_builtin_strategies());
    let scheduled = op_scheduler.schedule(&mapped, &hw)?;

    assert_eq!(scheduled.nodes["a"].duration, 50);
    // low_bit_sampling also matches SAMPLING and applies its default
    // reduction factor whether or not a hint is present.
    assert_eq!(
        scheduled.nodes["a"].applied_strategies,
        vec!["tile_culling".to_string(), "low_bit_sampling".to_string()]
    );

    // Baseline without the optimization hint would have been 100 cycles.
    let mut unoptimized_graph = OperatorGraph::new();
    unoptimized_graph.add_node(
        OperatorNode::new("a", OperatorTaxonomy::Sampling)
            .with_io(vec![], vec![TensorDescriptor::new(vec![1000])]),
    );
    let mut mapper2 = MappingEngine::new(hw.clone());
    let mapped2 = mapper2.run(&unoptimized_graph)?;
    let scheduled2 = op_scheduler.schedule(&mapped2, &hw)?;
    assert_eq!(scheduled2.nodes["a"].duration, 100);
    Ok(())
}

/// S6: a node whose memory-bound term dominates its compute-bound term
/// produces `duration = 200` and is reported as not compute-bound.
#[test]
fn s6_memory_bound_node_duration_two_hundred() -> Result<()> {
    init_tracing();
    let mut graph = OperatorGraph::new();
    graph.add_node(
        OperatorNode::new("a", OperatorTaxonomy::Encoding).with_io(
            vec![TensorDescriptor::with_dtype(vec![500], DataType::F32)],
            vec![],
        ),
    );
    let hw = HardwareConfig::new(vec![HardwareUnit::new("enc0", "ENCODING", 1000.0, 10.0)]);

    let mut mapper = MappingEngine::new(hw.clone());
    let mapped = mapper.run(&graph)?;

    let op_scheduler = OpLevelScheduler::default();
    let scheduled = op_scheduler.schedule(&mapped, &hw)?;

    assert_eq!(scheduled.nodes["a"].duration, 200);
    assert!(!scheduled.nodes["a"].is_compute_bound);
    Ok(())
}
