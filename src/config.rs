//! Service configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP API port
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Populate the store with demo users, skills and endorsements on start
    #[serde(default = "default_true")]
    pub seed_demo_data: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Whether a user may endorse their own skill
    #[serde(default = "default_true")]
    pub allow_self_endorsement: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    /// Entries returned when the caller gives no limit
    #[serde(default = "default_leaderboard_limit")]
    pub default_limit: usize,

    /// Upper bound on a caller-supplied limit
    #[serde(default = "default_leaderboard_max")]
    pub max_limit: usize,
}

impl LeaderboardConfig {
    /// Resolve a requested limit into `1..=max_limit`
    pub fn resolve_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit.max(1))
    }
}

// Defaults
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_http_port() -> u16 { 5000 }
fn default_true() -> bool { true }
fn default_leaderboard_limit() -> usize { 10 }
fn default_leaderboard_max() -> usize { 100 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: true,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            allow_self_endorsement: true,
        }
    }
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            default_limit: default_leaderboard_limit(),
            max_limit: default_leaderboard_max(),
        }
    }
}

impl Config {
    /// Load from a TOML file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }
}
