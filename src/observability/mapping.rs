use std::fmt;

use tracing::{info_span, Span};

use super::StructuredLog;

/// A node was assigned to a hardware unit.
pub struct HardwareAssigned<'a> {
    pub node_id: &'a str,
    pub hw_unit_id: &'a str,
}

impl fmt::Display for HardwareAssigned<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mapped '{}' to hardware unit '{}'", self.node_id, self.hw_unit_id)
    }
}

impl StructuredLog for HardwareAssigned<'_> {
    fn log(&self) {
        tracing::debug!(node_id = self.node_id, hw_unit_id = self.hw_unit_id, "{}", self);
    }

    fn span(&self, name: &'static str) -> Span {
        info_span!("mapping", name, node_id = self.node_id, hw_unit_id = self.hw_unit_id)
    }
}
