// Shared test helpers: canned OS output and a fully scripted sampler

#![allow(dead_code)]

use nas_status::sampler::FakeSampler;

pub const LSCPU: &str = "Architecture:             x86_64
CPU(s):                   2
  On-line CPU(s) list:    0,1
Vendor ID:                GenuineIntel
  Model name:             Intel(R) Celeron(R) N5105 @ 2.00GHz
";

pub const PROC_STAT: &str = "cpu  300 0 0 100 0 0 0 0 0 0
cpu0 100 0 0 50 0 0 0 0 0 0
cpu1 200 0 0 50 0 0 0 0 0 0
intr 12345 0 0
ctxt 678
btime 1700000000
";

pub const SENSORS: &str = "coretemp-isa-0000
Adapter: ISA adapter
Package id 0:  +52.0°C  (high = +105.0°C, crit = +105.0°C)
Core 0:        +50.0°C  (high = +105.0°C, crit = +105.0°C)
";

pub const MEMINFO: &str = "MemTotal:        8388608 kB
MemFree:         1048576 kB
MemAvailable:    4194304 kB
Buffers:          131072 kB
Cached:          2097152 kB
SwapCached:            0 kB
";

pub const DOCKER_PS: &str = "a1b2c3d4e5f6\tjellyfin\tjellyfin/jellyfin:latest\tUp 5 days\t0.0.0.0:8096->8096/tcp\t2024-04-01 12:00:00 +0000 UTC
b2c3d4e5f6a1\tpihole\tpihole/pihole\tUp 5 days (healthy)\t53/udp\t2024-04-01 12:05:00 +0000 UTC
";

pub const DOCKER_STATS: &str = "a1b2c3d4e5f6\t3.25%\t512MiB / 7.6GiB
";

pub fn full_sampler() -> FakeSampler {
    FakeSampler::new()
        .with_cpu_inventory(LSCPU)
        .with_cpu_counters(PROC_STAT)
        .with_sensor_readings(SENSORS)
        .with_memory_info(MEMINFO)
        .with_container_listing(DOCKER_PS)
        .with_container_stats(DOCKER_STATS)
}
