// CPU snapshot models

use serde::{Deserialize, Serialize};

use super::UNKNOWN;

/// Utilization of one logical core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreUsage {
    #[serde(rename = "number")]
    pub core_index: u32,
    #[serde(rename = "usagePercentage")]
    pub usage_percent: f64,
}

/// One CPU collection pass. Field names on the wire match the existing popup client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuSnapshot {
    pub model: String,
    #[serde(rename = "cores")]
    pub core_count: u32,
    #[serde(rename = "coreInfo")]
    pub per_core: Vec<CoreUsage>,
    #[serde(rename = "averageUsagePercentage")]
    pub average_usage_percent: f64,
    /// Package temperature in degrees Celsius; 0 when no sensor reading is available.
    #[serde(rename = "temperature")]
    pub temperature_celsius: f64,
}

impl CpuSnapshot {
    /// Fallback returned when the CPU pass fails outright.
    pub fn unknown() -> Self {
        Self {
            model: UNKNOWN.into(),
            core_count: 0,
            per_core: vec![],
            average_usage_percent: 0.0,
            temperature_celsius: 0.0,
        }
    }
}
