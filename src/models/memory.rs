// Memory snapshot models

use serde::{Deserialize, Serialize};

use super::UNKNOWN;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Render a byte count as gigabytes with two decimals, e.g. `"15.52 G"`.
pub fn format_gib(bytes: u64) -> String {
    format!("{:.2} G", bytes as f64 / GIB)
}

/// One memory collection pass.
///
/// Raw byte counts sit alongside the display strings the popup renders. `cached_*` is only
/// present when the active strategy tracks the page cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySnapshot {
    pub total_bytes: u64,
    pub free_bytes: u64,
    pub used_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_bytes: Option<u64>,
    pub total_memory: String,
    pub free_memory: String,
    pub used_memory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_memory: Option<String>,
    #[serde(rename = "usagePercentage")]
    pub usage_percent: f64,
}

impl MemorySnapshot {
    /// Build a snapshot from byte counts, deriving display strings and the usage percentage.
    pub fn from_bytes(total: u64, free: u64, used: u64, cached: Option<u64>) -> Self {
        let usage_percent = if total > 0 {
            super::round2(used as f64 / total as f64 * 100.0)
        } else {
            0.0
        };
        Self {
            total_bytes: total,
            free_bytes: free,
            used_bytes: used,
            cached_bytes: cached,
            total_memory: format_gib(total),
            free_memory: format_gib(free),
            used_memory: format_gib(used),
            cached_memory: cached.map(format_gib),
            usage_percent,
        }
    }

    /// Fallback returned when meminfo cannot be read or parsed.
    pub fn unknown(with_cached: bool) -> Self {
        Self {
            total_bytes: 0,
            free_bytes: 0,
            used_bytes: 0,
            cached_bytes: with_cached.then_some(0),
            total_memory: UNKNOWN.into(),
            free_memory: UNKNOWN.into(),
            used_memory: UNKNOWN.into(),
            cached_memory: with_cached.then(|| UNKNOWN.into()),
            usage_percent: 0.0,
        }
    }
}
