//! Parameter types for sleep blocker MCP tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::modes::SleepMode;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StartSleepPreventionParams {
    #[schemars(description = "Sleep prevention mode (defaults to idle)")]
    #[serde(default)]
    pub mode: Option<SleepMode>,

    #[schemars(description = "Duration in minutes. Omit for indefinite.", range(min = 1))]
    #[serde(default)]
    pub duration_minutes: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SetDurationPresetParams {
    #[schemars(description = "Duration preset: 30min, 1hr, 2hr, 4hr, or indefinite")]
    pub preset: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_params_all_optional() {
        let params: StartSleepPreventionParams = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(params.mode.is_none());
        assert!(params.duration_minutes.is_none());
    }

    #[test]
    fn test_start_params_with_values() {
        let params: StartSleepPreventionParams =
            serde_json::from_value(serde_json::json!({"mode": "display", "duration_minutes": 30}))
                .unwrap();
        assert_eq!(params.mode, Some(SleepMode::Display));
        assert_eq!(params.duration_minutes, Some(30));
    }

    #[test]
    fn test_start_params_unknown_mode_degrades() {
        let params: StartSleepPreventionParams =
            serde_json::from_value(serde_json::json!({"mode": "hibernate"})).unwrap();
        assert_eq!(params.mode, Some(SleepMode::Idle));
    }

    #[test]
    fn test_preset_param_required() {
        assert!(serde_json::from_value::<SetDurationPresetParams>(serde_json::json!({})).is_err());
        let params: SetDurationPresetParams =
            serde_json::from_value(serde_json::json!({"preset": "2hr"})).unwrap();
        assert_eq!(params.preset, "2hr");
    }
}
