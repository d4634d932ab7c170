// Memory collector: /proc/meminfo with a configurable used-memory strategy.

use serde::Deserialize;
use tracing::instrument;

use crate::error::SampleError;
use crate::models::MemorySnapshot;
use crate::sampler::SystemSampler;

/// How "used" memory is derived from meminfo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryStrategy {
    /// `used = MemTotal - MemAvailable - Cached`; the snapshot carries the cached figures.
    #[default]
    AvailableAndCached,
    /// `used = MemTotal - MemFree`; no cached figures.
    TotalMinusFree,
}

impl MemoryStrategy {
    pub fn tracks_cached(self) -> bool {
        matches!(self, MemoryStrategy::AvailableAndCached)
    }
}

/// Value of a `Label:   1234 kB` line, converted to bytes.
fn meminfo_bytes(text: &str, label: &'static str) -> Result<u64, SampleError> {
    text.lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name != label {
                return None;
            }
            value.split_whitespace().next()?.parse::<u64>().ok()
        })
        .map(|kib| kib.saturating_mul(1024))
        .ok_or(SampleError::MissingField(label))
}

pub fn parse_meminfo(text: &str, strategy: MemoryStrategy) -> Result<MemorySnapshot, SampleError> {
    let total = meminfo_bytes(text, "MemTotal")?;
    let free = meminfo_bytes(text, "MemFree")?;

    let snapshot = match strategy {
        MemoryStrategy::AvailableAndCached => {
            let available = meminfo_bytes(text, "MemAvailable")?;
            let cached = meminfo_bytes(text, "Cached")?;
            let used = total.saturating_sub(available).saturating_sub(cached);
            MemorySnapshot::from_bytes(total, free, used, Some(cached))
        }
        MemoryStrategy::TotalMinusFree => {
            MemorySnapshot::from_bytes(total, free, total.saturating_sub(free), None)
        }
    };
    Ok(snapshot)
}

/// One memory collection pass. Never fails: any error yields [`MemorySnapshot::unknown`].
#[instrument(skip(sampler), fields(collector = "memory", operation = "collect_memory"))]
pub async fn collect_memory(
    sampler: &dyn SystemSampler,
    strategy: MemoryStrategy,
) -> MemorySnapshot {
    let result = sampler
        .memory_info()
        .await
        .and_then(|text| parse_meminfo(&text, strategy));
    result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, operation = "collect_memory", "RAM status failed");
        MemorySnapshot::unknown(strategy.tracks_cached())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEMINFO: &str = "MemTotal:       16000000 kB
MemFree:         2000000 kB
MemAvailable:    9000000 kB
Buffers:          300000 kB
Cached:          5000000 kB
SwapCached:            0 kB
";

    #[test]
    fn available_and_cached_subtracts_cache() {
        let s = parse_meminfo(MEMINFO, MemoryStrategy::AvailableAndCached).unwrap();
        assert_eq!(s.total_bytes, 16_000_000 * 1024);
        assert_eq!(s.free_bytes, 2_000_000 * 1024);
        assert_eq!(s.used_bytes, 2_000_000 * 1024);
        assert_eq!(s.cached_bytes, Some(5_000_000 * 1024));
        assert_eq!(s.usage_percent, 12.5);
        assert_eq!(s.total_memory, "15.26 G");
        assert_eq!(s.cached_memory.as_deref(), Some("4.77 G"));
    }

    #[test]
    fn total_minus_free_ignores_cache() {
        let s = parse_meminfo(MEMINFO, MemoryStrategy::TotalMinusFree).unwrap();
        assert_eq!(s.used_bytes, 14_000_000 * 1024);
        assert_eq!(s.usage_percent, 87.5);
        assert_eq!(s.cached_bytes, None);
        assert_eq!(s.cached_memory, None);
    }

    #[test]
    fn used_memory_never_goes_negative() {
        let text = "MemTotal: 100 kB\nMemFree: 10 kB\nMemAvailable: 80 kB\nCached: 50 kB\n";
        let s = parse_meminfo(text, MemoryStrategy::AvailableAndCached).unwrap();
        assert_eq!(s.used_bytes, 0);
        assert_eq!(s.usage_percent, 0.0);
    }

    #[test]
    fn zero_total_reports_zero_percent() {
        let text = "MemTotal: 0 kB\nMemFree: 0 kB\n";
        let s = parse_meminfo(text, MemoryStrategy::TotalMinusFree).unwrap();
        assert_eq!(s.usage_percent, 0.0);
    }

    #[test]
    fn swap_cached_is_not_cached() {
        let text = "MemTotal: 100 kB\nMemFree: 10 kB\nMemAvailable: 50 kB\nSwapCached: 5 kB\n";
        let err = parse_meminfo(text, MemoryStrategy::AvailableAndCached).unwrap_err();
        assert!(matches!(err, SampleError::MissingField("Cached")));
    }

    #[test]
    fn missing_available_only_matters_when_tracked() {
        let text = "MemTotal: 100 kB\nMemFree: 10 kB\n";
        assert!(parse_meminfo(text, MemoryStrategy::AvailableAndCached).is_err());
        assert!(parse_meminfo(text, MemoryStrategy::TotalMinusFree).is_ok());
    }
}
