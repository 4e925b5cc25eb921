//! Tool handlers for the sleep blocker MCP server
//!
//! Each handler translates a supervisor or catalog outcome into the tool's
//! JSON payload. Expected failures (spawn errors, idle stop, unknown preset)
//! are structured `success: false` results, never protocol-level errors.

use rmcp::{
    model::{CallToolResult, Content},
    ErrorData as McpError,
};
use serde::Serialize;

use crate::modes::{preset_minutes, preset_names, SleepMode};
use crate::params::{SetDurationPresetParams, StartSleepPreventionParams};
use crate::supervisor::{SleepSupervisor, StopOutcome};
use crate::types::{IdleReport, ModeInfo, ModeListing, OpFailure, PresetReport, StartedReport, StopReport};

/// Wrap any serializable payload as pretty-printed text content.
pub fn json_success<T: Serialize>(data: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

pub async fn start_sleep_prevention(
    supervisor: &SleepSupervisor,
    params: StartSleepPreventionParams,
) -> Result<CallToolResult, McpError> {
    let mode = params.mode.unwrap_or(SleepMode::DEFAULT);
    let duration_minutes = params.duration_minutes.filter(|&minutes| minutes > 0);

    match supervisor.start(mode, duration_minutes).await {
        Ok(started) => json_success(&StartedReport {
            success: true,
            message: format!("Sleep prevention started with mode: {}", mode),
            mode,
            duration_minutes: started.duration_minutes,
            process_id: started.process_id,
            start_time: started.start_time,
        }),
        Err(e) => json_success(&OpFailure::new(format!(
            "Failed to start sleep prevention: {}",
            e
        ))),
    }
}

pub async fn stop_sleep_prevention(
    supervisor: &SleepSupervisor,
) -> Result<CallToolResult, McpError> {
    match supervisor.stop().await {
        StopOutcome::Stopped { duration_active } => json_success(&StopReport {
            success: true,
            message: "Sleep prevention stopped".to_string(),
            duration_active,
        }),
        StopOutcome::NotRunning => json_success(&IdleReport {
            success: false,
            message: "No active sleep prevention to stop".to_string(),
        }),
    }
}

pub async fn get_sleep_status(supervisor: &SleepSupervisor) -> Result<CallToolResult, McpError> {
    json_success(&supervisor.status().await)
}

pub fn list_sleep_modes() -> Result<CallToolResult, McpError> {
    let modes = SleepMode::ALL_MODES
        .iter()
        .map(|&mode| ModeInfo {
            id: mode,
            name: mode.display_name().to_string(),
            description: mode.description().to_string(),
        })
        .collect();

    json_success(&ModeListing {
        modes,
        default_mode: SleepMode::DEFAULT,
    })
}

pub fn set_duration_preset(params: SetDurationPresetParams) -> Result<CallToolResult, McpError> {
    match preset_minutes(&params.preset) {
        Some(duration_minutes) => json_success(&PresetReport {
            success: true,
            preset: params.preset.clone(),
            duration_minutes,
            message: format!("Duration preset set to: {}", params.preset),
        }),
        None => json_success(&OpFailure::new(format!(
            "Unknown preset: {}. Available: {}",
            params.preset,
            preset_names()
        ))),
    }
}
