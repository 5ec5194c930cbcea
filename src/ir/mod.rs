//! Value-type IR layers, one per scheduling phase.
//!
//! Each phase consumes the previous layer by reference and produces the
//! next by value; nothing here is mutated across a phase boundary.

pub mod graph;
pub mod mapped;
pub mod node;
pub mod opsched_ir;
pub mod schedule;
pub mod tensor;

pub use graph::OperatorGraph;
pub use mapped::{HardwareConfig, HardwareUnit, MappedIR, MappedNode};
pub use node::{OperatorNode, OperatorTaxonomy};
pub use opsched_ir::{OpSchedStats, OpScheduledIR, OpScheduledNode};
pub use schedule::{SystemSchedule, SystemScheduleEntry, SystemScheduleStats};
pub use tensor::{DataType, TensorDescriptor};
