//! Record types shared by the retention store and the telemetry client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::config::AuthConfig;

/// A collected shell command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub id: i64,
    pub command: String,
    pub directory: String,
    pub recorded_at: DateTime<Utc>,
}

/// A collected process sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub id: i64,
    pub pid: i64,
    pub name: String,
    pub cpu: f64,
    pub memory: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Credentials attached to every outbound batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthContext {
    pub token: Option<String>,
    pub workspace_id: Option<String>,
}

impl From<&AuthConfig> for AuthContext {
    fn from(cfg: &AuthConfig) -> Self {
        Self {
            token: cfg.token.clone(),
            workspace_id: cfg.workspace_id.clone(),
        }
    }
}
