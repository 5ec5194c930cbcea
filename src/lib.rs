// SPDX-License-Identifier: MIT

pub mod config;
pub mod dags;
pub mod errors;
pub mod ir;
pub mod mapping;
pub mod observability;
pub mod opsched;
pub mod pipeline;
pub mod timing;

pub use config::SchedulerConfig;
pub use errors::SchedulerError;
pub use ir::graph::OperatorGraph;
pub use ir::mapped::{HardwareConfig, HardwareUnit, MappedIR};
pub use ir::node::{OperatorNode, OperatorTaxonomy};
pub use ir::opsched_ir::OpScheduledIR;
pub use ir::schedule::SystemSchedule;
pub use ir::tensor::{DataType, TensorDescriptor};
pub use mapping::MappingEngine;
pub use opsched::OpLevelScheduler;
pub use dags::DagsScheduler;
pub use pipeline::run as run_pipeline;
