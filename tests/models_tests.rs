// Model serialization tests (wire names the popup client reads)

use nas_status::models::*;

#[test]
fn test_cpu_snapshot_wire_names() {
    let cpu = CpuSnapshot {
        model: "Intel(R) Celeron(R) N5105".into(),
        core_count: 2,
        per_core: vec![CoreUsage {
            core_index: 0,
            usage_percent: 12.5,
        }],
        average_usage_percent: 12.5,
        temperature_celsius: 48.0,
    };
    let json = serde_json::to_value(&cpu).unwrap();
    assert_eq!(json["model"], "Intel(R) Celeron(R) N5105");
    assert_eq!(json["cores"], 2);
    assert_eq!(json["coreInfo"][0]["number"], 0);
    assert_eq!(json["coreInfo"][0]["usagePercentage"], 12.5);
    assert_eq!(json["averageUsagePercentage"], 12.5);
    assert_eq!(json["temperature"], 48.0);

    let back: CpuSnapshot = serde_json::from_value(json).unwrap();
    assert_eq!(back, cpu);
}

#[test]
fn test_cpu_unknown_snapshot() {
    let cpu = CpuSnapshot::unknown();
    assert_eq!(cpu.model, "Unknown");
    assert_eq!(cpu.core_count, 0);
    assert!(cpu.per_core.is_empty());
    assert_eq!(cpu.average_usage_percent, 0.0);
    assert_eq!(cpu.temperature_celsius, 0.0);
}

#[test]
fn test_memory_snapshot_wire_names() {
    let gib = 1024 * 1024 * 1024;
    let ram = MemorySnapshot::from_bytes(8 * gib, gib, 2 * gib, Some(2 * gib));
    let json = serde_json::to_value(&ram).unwrap();
    assert_eq!(json["totalMemory"], "8.00 G");
    assert_eq!(json["freeMemory"], "1.00 G");
    assert_eq!(json["usedMemory"], "2.00 G");
    assert_eq!(json["cachedMemory"], "2.00 G");
    assert_eq!(json["usagePercentage"], 25.0);
    assert_eq!(json["totalBytes"], 8 * gib);
    assert_eq!(json["cachedBytes"], 2 * gib);
}

#[test]
fn test_memory_snapshot_omits_cached_when_untracked() {
    let ram = MemorySnapshot::from_bytes(100, 40, 60, None);
    let json = serde_json::to_value(&ram).unwrap();
    assert!(json.get("cachedMemory").is_none());
    assert!(json.get("cachedBytes").is_none());
    assert_eq!(json["usagePercentage"], 60.0);
}

#[test]
fn test_memory_snapshot_zero_total_has_zero_usage() {
    let ram = MemorySnapshot::from_bytes(0, 0, 0, None);
    assert_eq!(ram.usage_percent, 0.0);
}

#[test]
fn test_memory_unknown_snapshot() {
    let ram = MemorySnapshot::unknown(true);
    assert_eq!(ram.total_memory, "Unknown");
    assert_eq!(ram.free_memory, "Unknown");
    assert_eq!(ram.used_memory, "Unknown");
    assert_eq!(ram.cached_memory.as_deref(), Some("Unknown"));
    assert_eq!(ram.usage_percent, 0.0);

    let ram = MemorySnapshot::unknown(false);
    assert_eq!(ram.cached_memory, None);
}

#[test]
fn test_format_gib() {
    assert_eq!(format_gib(0), "0.00 G");
    assert_eq!(format_gib(1536 * 1024 * 1024), "1.50 G");
}

#[test]
fn test_round2() {
    assert_eq!(round2(66.666_666), 66.67);
    assert_eq!(round2(12.344), 12.34);
}

#[test]
fn test_container_record_basic_omits_usage() {
    let record = ContainerRecord {
        id: "a1b2c3d4e5f6".into(),
        name: "jellyfin".into(),
        image: "jellyfin/jellyfin".into(),
        status: "Up 5 days".into(),
        ports: String::new(),
        created_at: "2024-04-01 12:00:00 +0000 UTC".into(),
        cpu_usage: None,
        memory_usage: None,
    };
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["created"], "2024-04-01 12:00:00 +0000 UTC");
    assert_eq!(json["ports"], "");
    assert!(json.get("cpuUsage").is_none());
    assert!(json.get("memoryUsage").is_none());
}

#[test]
fn test_container_record_detailed_includes_usage() {
    let record = ContainerRecord {
        id: "a".into(),
        cpu_usage: Some("N/A".into()),
        memory_usage: Some("N/A".into()),
        ..Default::default()
    };
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["cpuUsage"], "N/A");
    assert_eq!(json["memoryUsage"], "N/A");
}
