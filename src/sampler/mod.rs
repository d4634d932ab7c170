// OS sampling capability: one method per raw OS fact the collectors parse

mod fake;
mod linux;

pub use fake::FakeSampler;
pub use linux::{LISTING_FORMAT, LinuxSampler, STATS_FORMAT};

use async_trait::async_trait;

use crate::error::SampleError;

/// Source of raw, unparsed OS state.
///
/// Implementations only fetch text; every bit of parsing, joining and caching lives in the
/// collectors and the cache, so those can be exercised against [`FakeSampler`].
#[async_trait]
pub trait SystemSampler: Send + Sync {
    /// System inventory with `Model name:` and `CPU(s):` lines (`lscpu`).
    async fn cpu_inventory(&self) -> Result<String, SampleError>;

    /// Per-CPU cumulative counters, aggregate line first (`/proc/stat`).
    async fn cpu_counters(&self) -> Result<String, SampleError>;

    /// Hardware sensor dump containing a `Package id 0` line (`sensors`).
    async fn sensor_readings(&self) -> Result<String, SampleError>;

    /// `Label: value kB` memory lines (`/proc/meminfo`).
    async fn memory_info(&self) -> Result<String, SampleError>;

    /// Running containers, one per line, tab-separated in [`LISTING_FORMAT`] order.
    async fn container_listing(&self) -> Result<String, SampleError>;

    /// One-shot container usage, one per line, tab-separated in [`STATS_FORMAT`] order.
    async fn container_stats(&self) -> Result<String, SampleError>;
}
