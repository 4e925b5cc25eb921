//! Type definitions for the sleep blocker MCP server

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::modes::SleepMode;

// ============================================================================
// Configuration Types
// ============================================================================

/// Server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub inhibitor: InhibitorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InhibitorConfig {
    /// Path of the sleep-inhibiting executable
    #[serde(default = "default_command")]
    pub command: String,

    /// Seconds to wait after SIGTERM before escalating to SIGKILL
    #[serde(default = "default_grace_period")]
    pub grace_period_secs: u64,
}

fn default_command() -> String {
    "/usr/bin/caffeinate".to_string()
}

fn default_grace_period() -> u64 {
    2
}

impl Default for InhibitorConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            grace_period_secs: default_grace_period(),
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Successful `start_sleep_prevention` payload
#[derive(Debug, Serialize, Deserialize)]
pub struct StartedReport {
    pub success: bool,
    pub message: String,
    pub mode: SleepMode,
    pub duration_minutes: Option<u64>,
    pub process_id: u32,
    pub start_time: String,
}

/// Structured failure carrying an `error` message (spawn failure,
/// unknown preset)
#[derive(Debug, Serialize, Deserialize)]
pub struct OpFailure {
    pub success: bool,
    pub error: String,
}

impl OpFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Successful `stop_sleep_prevention` payload
#[derive(Debug, Serialize, Deserialize)]
pub struct StopReport {
    pub success: bool,
    pub message: String,
    pub duration_active: Option<String>,
}

/// Expected idle-call outcome, surfaced with a `message` rather than an
/// `error` (stop with nothing running)
#[derive(Debug, Serialize, Deserialize)]
pub struct IdleReport {
    pub success: bool,
    pub message: String,
}

/// `get_sleep_status` payload. `process_id` is always present (null when
/// inactive); the timing fields appear only while a session is active.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusReport {
    pub active: bool,
    pub process_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl StatusReport {
    pub fn inactive() -> Self {
        Self {
            active: false,
            process_id: None,
            elapsed_seconds: None,
            start_time: None,
            remaining_seconds: None,
            remaining_time: None,
            status: None,
        }
    }
}

/// One entry of the `list_sleep_modes` catalog
#[derive(Debug, Serialize, Deserialize)]
pub struct ModeInfo {
    pub id: SleepMode,
    pub name: String,
    pub description: String,
}

/// `list_sleep_modes` payload
#[derive(Debug, Serialize, Deserialize)]
pub struct ModeListing {
    pub modes: Vec<ModeInfo>,
    pub default_mode: SleepMode,
}

/// Successful `set_duration_preset` payload. `duration_minutes` is null
/// for the indefinite preset but the key is always present.
#[derive(Debug, Serialize, Deserialize)]
pub struct PresetReport {
    pub success: bool,
    pub preset: String,
    pub duration_minutes: Option<u64>,
    pub message: String,
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("{0}")]
    Spawn(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.inhibitor.command, "/usr/bin/caffeinate");
        assert_eq!(config.inhibitor.grace_period_secs, 2);
    }

    #[test]
    fn test_config_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [inhibitor]
            command = "/opt/bin/caffeinate"
            "#,
        )
        .unwrap();
        assert_eq!(config.inhibitor.command, "/opt/bin/caffeinate");
        assert_eq!(config.inhibitor.grace_period_secs, 2);
    }

    #[test]
    fn test_status_report_omits_idle_fields() {
        let json = serde_json::to_value(StatusReport::inactive()).unwrap();
        assert_eq!(json["active"], false);
        assert!(json["process_id"].is_null());
        assert!(json.get("elapsed_seconds").is_none());
        assert!(json.get("remaining_seconds").is_none());
    }
}
