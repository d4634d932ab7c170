// Docker container models

use serde::{Deserialize, Serialize};

/// One running container as printed by `docker ps`.
///
/// All fields are opaque strings formatted by the container runtime. `cpu_usage` and
/// `memory_usage` are only filled in by the detailed listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRecord {
    pub id: String,
    pub name: String,
    pub image: String,
    pub status: String,
    pub ports: String,
    #[serde(rename = "created")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_usage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_usage: Option<String>,
}
