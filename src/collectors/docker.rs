// Container collector: `docker ps` listing, optionally joined with `docker stats --no-stream`.

use std::collections::HashMap;
use tracing::instrument;

use crate::models::{ContainerRecord, NOT_AVAILABLE};
use crate::sampler::SystemSampler;

/// Usage figures for one container, as printed by the stats command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerUsage {
    pub cpu_percent: String,
    pub memory_usage: String,
}

fn data_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
}

/// Parse listing output. Each line holds id, name, image, status, ports and created,
/// tab-separated; missing trailing fields are left empty.
pub fn parse_listing(text: &str) -> Vec<ContainerRecord> {
    data_lines(text)
        .map(|line| {
            let mut fields = line.splitn(6, '\t').map(str::to_string);
            let mut next = || fields.next().unwrap_or_default();
            ContainerRecord {
                id: next(),
                name: next(),
                image: next(),
                status: next(),
                ports: next(),
                created_at: next(),
                cpu_usage: None,
                memory_usage: None,
            }
        })
        .collect()
}

/// Parse stats output into a lookup keyed by container id. A repeated id keeps the last line.
pub fn parse_stats(text: &str) -> HashMap<String, ContainerUsage> {
    data_lines(text)
        .filter_map(|line| {
            let mut fields = line.splitn(3, '\t');
            let id = fields.next()?.trim();
            if id.is_empty() {
                return None;
            }
            let cpu_percent = fields.next().unwrap_or_default().trim().to_string();
            let memory_usage = fields.next().unwrap_or_default().trim().to_string();
            Some((
                id.to_string(),
                ContainerUsage {
                    cpu_percent,
                    memory_usage,
                },
            ))
        })
        .collect()
}

/// Attach usage to each record by id. Records without a stats entry (the container exited
/// between the two commands) get `"N/A"`.
pub fn join_stats(
    records: Vec<ContainerRecord>,
    stats: &HashMap<String, ContainerUsage>,
) -> Vec<ContainerRecord> {
    records
        .into_iter()
        .map(|record| {
            let (cpu_usage, memory_usage) = match stats.get(&record.id) {
                Some(usage) => (usage.cpu_percent.clone(), usage.memory_usage.clone()),
                None => (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()),
            };
            ContainerRecord {
                cpu_usage: Some(cpu_usage),
                memory_usage: Some(memory_usage),
                ..record
            }
        })
        .collect()
}

/// Running containers without usage figures. Command failure yields an empty list.
#[instrument(skip(sampler), fields(collector = "docker", operation = "list_containers"))]
pub async fn list_containers(sampler: &dyn SystemSampler) -> Vec<ContainerRecord> {
    match sampler.container_listing().await {
        Ok(text) => parse_listing(&text),
        Err(e) => {
            tracing::warn!(error = %e, operation = "list_containers", "Docker status failed");
            vec![]
        }
    }
}

/// Running containers joined with one-shot usage stats.
///
/// If either the listing or the stats command fails the result is empty. A container missing
/// from an otherwise successful stats run gets `"N/A"` usage.
#[instrument(
    skip(sampler),
    fields(collector = "docker", operation = "list_containers_detailed")
)]
pub async fn list_containers_detailed(sampler: &dyn SystemSampler) -> Vec<ContainerRecord> {
    let records = list_containers(sampler).await;
    if records.is_empty() {
        return records;
    }

    let stats = match sampler.container_stats().await {
        Ok(text) => parse_stats(&text),
        Err(e) => {
            tracing::warn!(error = %e, operation = "container_stats", "Docker stats failed");
            return vec![];
        }
    };
    join_stats(records, &stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_splits_tab_fields() {
        let text = "3f1c2a9b8d7e\tplex\tplexinc/pms-docker:latest\tUp 3 days\t0.0.0.0:32400->32400/tcp\t2024-05-01 10:00:00 +0000 UTC\n\
                    9a8b7c6d5e4f\tsyncthing\tsyncthing/syncthing\tUp 2 hours\t\t2024-05-03 08:30:00 +0000 UTC\n";
        let records = parse_listing(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "3f1c2a9b8d7e");
        assert_eq!(records[0].name, "plex");
        assert_eq!(records[0].ports, "0.0.0.0:32400->32400/tcp");
        assert_eq!(records[1].ports, "");
        assert_eq!(records[1].created_at, "2024-05-03 08:30:00 +0000 UTC");
        assert!(records.iter().all(|r| r.cpu_usage.is_none()));
    }

    #[test]
    fn listing_of_empty_output_is_empty() {
        assert!(parse_listing("").is_empty());
        assert!(parse_listing("\n\n").is_empty());
    }

    #[test]
    fn listing_tolerates_short_lines() {
        let records = parse_listing("abc\tweb\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "web");
        assert_eq!(records[0].image, "");
        assert_eq!(records[0].created_at, "");
    }

    #[test]
    fn stats_last_duplicate_wins() {
        let stats = parse_stats("a\t1.00%\t10MiB / 1GiB\na\t2.00%\t20MiB / 1GiB\n");
        assert_eq!(stats.len(), 1);
        assert_eq!(stats["a"].cpu_percent, "2.00%");
        assert_eq!(stats["a"].memory_usage, "20MiB / 1GiB");
    }

    #[test]
    fn join_fills_missing_entries_with_na() {
        let records = vec![
            ContainerRecord {
                id: "a".into(),
                ..Default::default()
            },
            ContainerRecord {
                id: "b".into(),
                ..Default::default()
            },
        ];
        let stats = parse_stats("a\t1%\t10MiB\n");
        let joined = join_stats(records, &stats);
        assert_eq!(joined[0].cpu_usage.as_deref(), Some("1%"));
        assert_eq!(joined[0].memory_usage.as_deref(), Some("10MiB"));
        assert_eq!(joined[1].cpu_usage.as_deref(), Some("N/A"));
        assert_eq!(joined[1].memory_usage.as_deref(), Some("N/A"));
    }

    #[test]
    fn join_ignores_stats_for_unlisted_containers() {
        let records = vec![ContainerRecord {
            id: "a".into(),
            ..Default::default()
        }];
        let stats = parse_stats("z\t5%\t1MiB\na\t1%\t2MiB\n");
        let joined = join_stats(records, &stats);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].memory_usage.as_deref(), Some("2MiB"));
    }
}
