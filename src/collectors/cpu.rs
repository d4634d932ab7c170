// CPU collector: lscpu inventory, /proc/stat utilization, sensors package temperature.

use tracing::instrument;

use crate::error::SampleError;
use crate::models::{CoreUsage, CpuSnapshot, UNKNOWN, round2};
use crate::sampler::SystemSampler;

const MODEL_LABEL: &str = "Model name:";
const CPUS_LABEL: &str = "CPU(s)";
const PACKAGE_LABEL: &str = "Package id 0";

/// Position of the idle counter among the values of a stat line (label excluded).
const IDLE_FIELD: usize = 3;

/// Extract `(model, logical core count)` from lscpu output. Absent fields become
/// `"Unknown"` and `0`.
pub fn parse_inventory(text: &str) -> (String, u32) {
    let model = text
        .lines()
        .find_map(|line| line.split_once(MODEL_LABEL).map(|(_, rest)| rest.trim()))
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string();

    let cores = text
        .lines()
        .find_map(|line| {
            let (label, value) = line.split_once(':')?;
            if label.trim() != CPUS_LABEL {
                return None;
            }
            let digits: String = value
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse::<u32>().ok()
        })
        .unwrap_or(0);

    (model, cores)
}

/// Utilization of one `/proc/stat` cpu line: `100 * (sum - idle) / sum`, two decimals.
///
/// The counters are cumulative since boot and no previous sample is subtracted, so this is
/// the average load since boot rather than the current load.
pub fn stat_line_usage(line: &str) -> Option<f64> {
    let values = line
        .split_whitespace()
        .skip(1)
        .map(|v| v.parse::<u64>().ok())
        .collect::<Option<Vec<u64>>>()?;
    let idle = *values.get(IDLE_FIELD)?;
    let total = values.iter().fold(0u64, |acc, v| acc.saturating_add(*v));
    if total == 0 {
        return Some(0.0);
    }
    Some(round2(
        total.saturating_sub(idle) as f64 / total as f64 * 100.0,
    ))
}

fn find_stat_line<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    text.lines()
        .find(|line| line.split_whitespace().next() == Some(label))
}

/// Aggregate and per-core utilization for cores `0..core_count`. A core without a usable
/// line is left out; a missing aggregate line is an error.
pub fn parse_counters(
    text: &str,
    core_count: u32,
) -> Result<(f64, Vec<CoreUsage>), SampleError> {
    let average = find_stat_line(text, "cpu")
        .and_then(stat_line_usage)
        .ok_or(SampleError::MissingField("cpu"))?;

    let per_core = (0..core_count)
        .filter_map(|core_index| {
            let line = find_stat_line(text, &format!("cpu{}", core_index))?;
            Some(CoreUsage {
                core_index,
                usage_percent: stat_line_usage(line)?,
            })
        })
        .collect();

    Ok((average, per_core))
}

/// Package temperature from `sensors` output, e.g. `Package id 0:  +45.0°C  (high = ...)`.
pub fn parse_package_temperature(text: &str) -> Option<f64> {
    let line = text.lines().find(|line| line.contains(PACKAGE_LABEL))?;
    let (_, readings) = line.split_once(':')?;
    let token = readings
        .split_whitespace()
        .find(|t| t.chars().any(|c| c.is_ascii_digit()))?;
    let numeric: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    numeric.parse().ok()
}

async fn package_temperature(sampler: &dyn SystemSampler) -> f64 {
    match sampler.sensor_readings().await {
        Ok(text) => parse_package_temperature(&text).unwrap_or_else(|| {
            tracing::debug!(operation = "sensor_readings", "no Package id 0 reading");
            0.0
        }),
        Err(e) => {
            tracing::warn!(
                error = %e,
                operation = "sensor_readings",
                "CPU temperature unavailable"
            );
            0.0
        }
    }
}

async fn try_collect_cpu(sampler: &dyn SystemSampler) -> Result<CpuSnapshot, SampleError> {
    let inventory = sampler.cpu_inventory().await?;
    let (model, core_count) = parse_inventory(&inventory);

    let counters = sampler.cpu_counters().await?;
    let (average_usage_percent, per_core) = parse_counters(&counters, core_count)?;

    let temperature_celsius = package_temperature(sampler).await;

    Ok(CpuSnapshot {
        model,
        core_count,
        per_core,
        average_usage_percent,
        temperature_celsius,
    })
}

/// One CPU collection pass. Never fails: any error yields [`CpuSnapshot::unknown`].
#[instrument(skip(sampler), fields(collector = "cpu", operation = "collect_cpu"))]
pub async fn collect_cpu(sampler: &dyn SystemSampler) -> CpuSnapshot {
    match try_collect_cpu(sampler).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(error = %e, operation = "collect_cpu", "CPU status failed");
            CpuSnapshot::unknown()
        }
    }
}
