// Real sampler: kernel pseudo-files under proc_path plus lscpu, sensors and the docker CLI.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use super::SystemSampler;
use crate::config::CollectionConfig;
use crate::error::SampleError;

/// `docker ps` template: id, names, image, status, ports, createdAt.
pub const LISTING_FORMAT: &str =
    "{{.ID}}\t{{.Names}}\t{{.Image}}\t{{.Status}}\t{{.Ports}}\t{{.CreatedAt}}";

/// `docker stats` template: id, cpu percent, memory usage.
pub const STATS_FORMAT: &str = "{{.ID}}\t{{.CPUPerc}}\t{{.MemUsage}}";

pub struct LinuxSampler {
    proc_path: PathBuf,
    lscpu_bin: String,
    sensors_bin: String,
    docker_bin: String,
    command_timeout: Duration,
}

impl LinuxSampler {
    pub fn new(config: &CollectionConfig) -> Self {
        Self {
            proc_path: PathBuf::from(&config.proc_path),
            lscpu_bin: config.lscpu_bin.clone(),
            sensors_bin: config.sensors_bin.clone(),
            docker_bin: config.docker_bin.clone(),
            command_timeout: Duration::from_millis(config.command_timeout_ms),
        }
    }

    async fn read_proc(&self, name: &str) -> Result<String, SampleError> {
        let path = self.proc_path.join(name);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| SampleError::Io {
                path: path.display().to_string(),
                source,
            })
    }

    /// Run a command to completion and return its stdout. Non-zero exit, spawn failure and
    /// exceeding the command timeout are all errors; the child is killed on timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<String, SampleError> {
        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::null()).kill_on_drop(true);

        let output = match timeout(self.command_timeout, cmd.output()).await {
            Ok(result) => result.map_err(|source| SampleError::Spawn {
                program: program.to_string(),
                source,
            })?,
            Err(_) => {
                return Err(SampleError::Timeout {
                    program: program.to_string(),
                    after: self.command_timeout,
                });
            }
        };

        if !output.status.success() {
            return Err(SampleError::CommandFailed {
                program: program.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl SystemSampler for LinuxSampler {
    async fn cpu_inventory(&self) -> Result<String, SampleError> {
        self.run(&self.lscpu_bin, &[]).await
    }

    async fn cpu_counters(&self) -> Result<String, SampleError> {
        self.read_proc("stat").await
    }

    async fn sensor_readings(&self) -> Result<String, SampleError> {
        self.run(&self.sensors_bin, &[]).await
    }

    async fn memory_info(&self) -> Result<String, SampleError> {
        self.read_proc("meminfo").await
    }

    async fn container_listing(&self) -> Result<String, SampleError> {
        self.run(&self.docker_bin, &["ps", "--format", LISTING_FORMAT])
            .await
    }

    async fn container_stats(&self) -> Result<String, SampleError> {
        self.run(
            &self.docker_bin,
            &["stats", "--no-stream", "--format", STATS_FORMAT],
        )
        .await
    }
}
