//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the admin
//! service. All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the admin service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AdminServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Location and naming rules of the editable config files.
    pub sites: SitesConfig,

    /// External reload command.
    pub reload: ReloadConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Admin API authentication.
    pub admin: AdminConfig,

    /// Request hardening.
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Config file directory layout.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SitesConfig {
    /// Directory holding every addressable config file.
    pub root: PathBuf,

    /// The single subdirectory that is also listed and addressable.
    pub subdirectory: String,

    /// File name suffix recognized as a config file.
    pub suffix: String,

    /// Hold a per-file lock for the duration of each write.
    pub serialize_writes: bool,
}

impl Default for SitesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/etc/nginx/conf.d"),
            subdirectory: "locations".to_string(),
            suffix: ".conf".to_string(),
            serialize_writes: true,
        }
    }
}

/// External reload command configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReloadConfig {
    /// Executable to run.
    pub program: String,

    /// Arguments passed to the executable.
    pub args: Vec<String>,

    /// Working directory of the spawned process.
    pub working_dir: PathBuf,

    /// Deadline for the process to exit, in seconds.
    pub timeout_secs: u64,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            program: "docker".to_string(),
            args: ["compose", "exec", "-T", "nginx", "nginx", "-s", "reload"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            working_dir: PathBuf::from("."),
            timeout_secs: 15,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format ("pretty" or "json").
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AdminConfig {
    /// Bearer token required on `/api/admin/*`. Unset disables authentication.
    pub api_key: Option<String>,
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}
