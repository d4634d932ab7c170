// Snapshot models served by the status API

mod container;
mod cpu;
mod memory;

pub use container::ContainerRecord;
pub use cpu::{CoreUsage, CpuSnapshot};
pub use memory::{MemorySnapshot, format_gib};

/// Placeholder used for any string field that could not be collected.
pub const UNKNOWN: &str = "Unknown";

/// Placeholder for container usage fields with no matching stats entry.
pub const NOT_AVAILABLE: &str = "N/A";

/// Round to two decimal places, the precision every percentage is reported at.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
