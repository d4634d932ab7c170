// Scripted sampler for tests: fixed outputs per source, call counting, optional latency.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::SystemSampler;
use crate::error::SampleError;

#[derive(Default)]
struct Source {
    output: Option<String>,
    calls: AtomicUsize,
}

impl Source {
    fn fetch(&self, name: &str) -> Result<String, SampleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.output
            .clone()
            .ok_or_else(|| SampleError::CommandFailed {
                program: name.to_string(),
                status: "exit status: 1".into(),
                stderr: "not scripted".into(),
            })
    }
}

/// A [`SystemSampler`] that returns canned text. Sources left unset fail like a broken
/// command, which drives the collectors onto their fallback paths.
#[derive(Default)]
pub struct FakeSampler {
    cpu_inventory: Source,
    cpu_counters: Source,
    sensor_readings: Source,
    memory_info: Source,
    container_listing: Source,
    container_stats: Source,
    latency: Option<Duration>,
}

impl FakeSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cpu_inventory(mut self, text: impl Into<String>) -> Self {
        self.cpu_inventory.output = Some(text.into());
        self
    }

    pub fn with_cpu_counters(mut self, text: impl Into<String>) -> Self {
        self.cpu_counters.output = Some(text.into());
        self
    }

    pub fn with_sensor_readings(mut self, text: impl Into<String>) -> Self {
        self.sensor_readings.output = Some(text.into());
        self
    }

    pub fn with_memory_info(mut self, text: impl Into<String>) -> Self {
        self.memory_info.output = Some(text.into());
        self
    }

    pub fn with_container_listing(mut self, text: impl Into<String>) -> Self {
        self.container_listing.output = Some(text.into());
        self
    }

    pub fn with_container_stats(mut self, text: impl Into<String>) -> Self {
        self.container_stats.output = Some(text.into());
        self
    }

    /// Sleep this long (tokio time) before answering any request.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// How many times a source was sampled: `"cpu_inventory"`, `"cpu_counters"`,
    /// `"sensor_readings"`, `"memory_info"`, `"container_listing"` or `"container_stats"`.
    pub fn calls(&self, source: &str) -> usize {
        let source = match source {
            "cpu_inventory" => &self.cpu_inventory,
            "cpu_counters" => &self.cpu_counters,
            "sensor_readings" => &self.sensor_readings,
            "memory_info" => &self.memory_info,
            "container_listing" => &self.container_listing,
            "container_stats" => &self.container_stats,
            _ => return 0,
        };
        source.calls.load(Ordering::SeqCst)
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl SystemSampler for FakeSampler {
    async fn cpu_inventory(&self) -> Result<String, SampleError> {
        self.delay().await;
        self.cpu_inventory.fetch("lscpu")
    }

    async fn cpu_counters(&self) -> Result<String, SampleError> {
        self.delay().await;
        self.cpu_counters.fetch("stat")
    }

    async fn sensor_readings(&self) -> Result<String, SampleError> {
        self.delay().await;
        self.sensor_readings.fetch("sensors")
    }

    async fn memory_info(&self) -> Result<String, SampleError> {
        self.delay().await;
        self.memory_info.fetch("meminfo")
    }

    async fn container_listing(&self) -> Result<String, SampleError> {
        self.delay().await;
        self.container_listing.fetch("docker ps")
    }

    async fn container_stats(&self) -> Result<String, SampleError> {
        self.delay().await;
        self.container_stats.fetch("docker stats")
    }
}
