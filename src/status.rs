// Host status service: one cached query per metric class.

use std::fmt;
use std::sync::Arc;
use tokio::time::Duration;

use crate::cache::RefreshCache;
use crate::collectors::{self, MemoryStrategy};
use crate::config::AppConfig;
use crate::models::{ContainerRecord, CpuSnapshot, MemorySnapshot};
use crate::sampler::SystemSampler;

/// The independently cached data domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricClass {
    Cpu,
    Memory,
    Containers,
    ContainersDetailed,
}

impl MetricClass {
    /// Cache key name.
    pub fn key(self) -> &'static str {
        match self {
            MetricClass::Cpu => "cpuStatus",
            MetricClass::Memory => "ramStatus",
            MetricClass::Containers => "dockerStatus",
            MetricClass::ContainersDetailed => "dockerDetailStatus",
        }
    }
}

impl fmt::Display for MetricClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A cached value. `collect` always stores the variant matching its class; only a holder of
/// the shared `StatusCache` calling `set` with the wrong variant can break that, and the
/// accessors then log and answer with the class's fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    Cpu(CpuSnapshot),
    Memory(MemorySnapshot),
    Containers(Vec<ContainerRecord>),
}

pub type StatusCache = RefreshCache<MetricClass, Snapshot>;

/// Serves the latest snapshot per metric class, collecting through the sampler at most once
/// per TTL window. Cloning is cheap and clones share the cache.
#[derive(Clone)]
pub struct HostStatus {
    sampler: Arc<dyn SystemSampler>,
    cache: StatusCache,
    ttl: Duration,
    memory_strategy: MemoryStrategy,
}

impl HostStatus {
    pub fn new(
        sampler: Arc<dyn SystemSampler>,
        cache: StatusCache,
        ttl: Duration,
        memory_strategy: MemoryStrategy,
    ) -> Self {
        Self {
            sampler,
            cache,
            ttl,
            memory_strategy,
        }
    }

    pub fn from_config(sampler: Arc<dyn SystemSampler>, config: &AppConfig) -> Self {
        Self::new(
            sampler,
            StatusCache::new(),
            Duration::from_secs(config.cache.ttl_secs),
            config.collection.memory_strategy,
        )
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn cpu(&self) -> CpuSnapshot {
        match self.query(MetricClass::Cpu).await {
            Snapshot::Cpu(s) => s,
            other => {
                mismatch(MetricClass::Cpu, &other);
                CpuSnapshot::unknown()
            }
        }
    }

    pub async fn ram(&self) -> MemorySnapshot {
        match self.query(MetricClass::Memory).await {
            Snapshot::Memory(s) => s,
            other => {
                mismatch(MetricClass::Memory, &other);
                MemorySnapshot::unknown(self.memory_strategy.tracks_cached())
            }
        }
    }

    pub async fn docker(&self) -> Vec<ContainerRecord> {
        self.containers(MetricClass::Containers).await
    }

    pub async fn docker_details(&self) -> Vec<ContainerRecord> {
        self.containers(MetricClass::ContainersDetailed).await
    }

    async fn containers(&self, class: MetricClass) -> Vec<ContainerRecord> {
        match self.query(class).await {
            Snapshot::Containers(records) => records,
            other => {
                mismatch(class, &other);
                vec![]
            }
        }
    }

    async fn query(&self, class: MetricClass) -> Snapshot {
        let sampler = Arc::clone(&self.sampler);
        let strategy = self.memory_strategy;
        self.cache
            .get_or_compute(class, self.ttl, move || collect(sampler, class, strategy))
            .await
    }
}

async fn collect(
    sampler: Arc<dyn SystemSampler>,
    class: MetricClass,
    memory_strategy: MemoryStrategy,
) -> Snapshot {
    let sampler = sampler.as_ref();
    match class {
        MetricClass::Cpu => Snapshot::Cpu(collectors::collect_cpu(sampler).await),
        MetricClass::Memory => {
            Snapshot::Memory(collectors::collect_memory(sampler, memory_strategy).await)
        }
        MetricClass::Containers => {
            Snapshot::Containers(collectors::list_containers(sampler).await)
        }
        MetricClass::ContainersDetailed => {
            Snapshot::Containers(collectors::list_containers_detailed(sampler).await)
        }
    }
}

// Reached only through an external `StatusCache::set`.
fn mismatch(class: MetricClass, found: &Snapshot) {
    tracing::error!(
        key = %class,
        found = ?std::mem::discriminant(found),
        "cached snapshot does not match its metric class"
    );
}
