use serde::Deserialize;

use crate::collectors::memory::MemoryStrategy;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub collection: CollectionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// How long a collected snapshot is served before the next request recollects it.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    /// Upper bound for any external command (lscpu, sensors, docker); a timeout counts as a failed collection.
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,
    #[serde(default = "default_proc_path")]
    pub proc_path: String,
    #[serde(default = "default_lscpu_bin")]
    pub lscpu_bin: String,
    #[serde(default = "default_sensors_bin")]
    pub sensors_bin: String,
    #[serde(default = "default_docker_bin")]
    pub docker_bin: String,
    #[serde(default)]
    pub memory_strategy: MemoryStrategy,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            command_timeout_ms: default_command_timeout_ms(),
            proc_path: default_proc_path(),
            lscpu_bin: default_lscpu_bin(),
            sensors_bin: default_sensors_bin(),
            docker_bin: default_docker_bin(),
            memory_strategy: MemoryStrategy::default(),
        }
    }
}

fn default_command_timeout_ms() -> u64 {
    5000
}

fn default_proc_path() -> String {
    "/proc".into()
}

fn default_lscpu_bin() -> String {
    "lscpu".into()
}

fn default_sensors_bin() -> String {
    "sensors".into()
}

fn default_docker_bin() -> String {
    "docker".into()
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("reading {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        anyhow::ensure!(
            self.cache.ttl_secs > 0,
            "cache.ttl_secs must be > 0, got {}",
            self.cache.ttl_secs
        );
        anyhow::ensure!(
            self.collection.command_timeout_ms > 0,
            "collection.command_timeout_ms must be > 0, got {}",
            self.collection.command_timeout_ms
        );
        anyhow::ensure!(
            !self.collection.proc_path.is_empty(),
            "collection.proc_path must be non-empty"
        );
        anyhow::ensure!(
            !self.collection.lscpu_bin.is_empty(),
            "collection.lscpu_bin must be non-empty"
        );
        anyhow::ensure!(
            !self.collection.sensors_bin.is_empty(),
            "collection.sensors_bin must be non-empty"
        );
        anyhow::ensure!(
            !self.collection.docker_bin.is_empty(),
            "collection.docker_bin must be non-empty"
        );
        Ok(())
    }
}
