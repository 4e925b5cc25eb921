//! MCP Server implementation for sleep prevention control
//!
//! Defines the server struct, tool registration, and request dispatch.
//! Handler implementations are in the handlers module; the process
//! supervision itself lives in the supervisor module.

use std::path::PathBuf;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult,
        PaginatedRequestParam, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router, ErrorData as McpError,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::handlers;
use crate::params::{SetDurationPresetParams, StartSleepPreventionParams};
use crate::supervisor::SleepSupervisor;
use crate::types::Config;

/// The Sleep Blocker MCP Server
#[derive(Clone)]
pub struct SleepBlockerServer {
    supervisor: SleepSupervisor,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Tool Router - Each tool delegates to its handler
// ============================================================================

#[tool_router]
impl SleepBlockerServer {
    /// Create a new server, loading config from standard locations
    ///
    /// Config is searched in order:
    /// 1. `SLEEP_BLOCKER_CONFIG_PATH` env var
    /// 2. `$XDG_CONFIG_HOME/sleep-blocker-mcp/config.toml`
    /// 3. `~/.sleep-blocker-mcp.toml`
    /// 4. Default config if none found
    pub fn new() -> Self {
        Self::with_config(Self::load_config())
    }

    /// Create a new server with explicit config
    pub fn with_config(config: Config) -> Self {
        Self {
            supervisor: SleepSupervisor::new(config.inhibitor),
            tool_router: Self::tool_router(),
        }
    }

    /// The supervisor handle, shared with the shutdown path in main
    pub fn supervisor(&self) -> &SleepSupervisor {
        &self.supervisor
    }

    /// Load config from standard file locations
    fn load_config() -> Config {
        let mut config_paths = Vec::new();

        if let Ok(env_path) = std::env::var("SLEEP_BLOCKER_CONFIG_PATH") {
            config_paths.push(PathBuf::from(env_path));
        }
        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("sleep-blocker-mcp").join("config.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            config_paths.push(home.join(".sleep-blocker-mcp.toml"));
        }

        for path in config_paths {
            if path.exists() {
                if let Ok(content) = std::fs::read_to_string(&path) {
                    match toml::from_str::<Config>(&content) {
                        Ok(config) => {
                            tracing::info!("Loaded config from {}", path.display());
                            return config;
                        }
                        Err(e) => {
                            tracing::warn!("Failed to parse config {}: {}", path.display(), e);
                        }
                    }
                }
            }
        }

        tracing::info!("Using default configuration");
        Config::default()
    }

    #[tool(description = "Start preventing system sleep with specified mode and duration")]
    async fn start_sleep_prevention(
        &self,
        Parameters(params): Parameters<StartSleepPreventionParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::start_sleep_prevention(&self.supervisor, params).await
    }

    #[tool(description = "Stop active sleep prevention")]
    async fn stop_sleep_prevention(&self) -> Result<CallToolResult, McpError> {
        handlers::stop_sleep_prevention(&self.supervisor).await
    }

    #[tool(description = "Get current sleep prevention status and remaining time")]
    async fn get_sleep_status(&self) -> Result<CallToolResult, McpError> {
        handlers::get_sleep_status(&self.supervisor).await
    }

    #[tool(description = "List all available sleep prevention modes with descriptions")]
    async fn list_sleep_modes(&self) -> Result<CallToolResult, McpError> {
        handlers::list_sleep_modes()
    }

    #[tool(description = "Set duration using preset values (30min, 1hr, 2hr, 4hr, indefinite)")]
    async fn set_duration_preset(
        &self,
        Parameters(params): Parameters<SetDurationPresetParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::set_duration_preset(params)
    }
}

impl SleepBlockerServer {
    /// Dispatch a tool call by name. An unrecognized name is a valid call
    /// with an error-shaped result, not a protocol error.
    pub async fn dispatch(&self, name: &str, arguments: Value) -> Result<CallToolResult, McpError> {
        match name {
            "start_sleep_prevention" => {
                let params = parse_params(arguments)?;
                self.start_sleep_prevention(Parameters(params)).await
            }
            "stop_sleep_prevention" => self.stop_sleep_prevention().await,
            "get_sleep_status" => self.get_sleep_status().await,
            "list_sleep_modes" => self.list_sleep_modes().await,
            "set_duration_preset" => {
                let params = parse_params(arguments)?;
                self.set_duration_preset(Parameters(params)).await
            }
            _ => handlers::json_success(&serde_json::json!({
                "error": format!("Unknown tool: {}", name)
            })),
        }
    }
}

fn parse_params<T: DeserializeOwned>(arguments: Value) -> Result<T, McpError> {
    serde_json::from_value(arguments).map_err(|e| McpError::invalid_params(e.to_string(), None))
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

impl rmcp::ServerHandler for SleepBlockerServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Sleep prevention MCP server. Supervises a single caffeinate \
                 process: start it with a mode and optional duration, query \
                 elapsed and remaining time, and stop it again."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "sleep-blocker-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            next_cursor: None,
            tools: self.tool_router.list_all(),
            meta: Default::default(),
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let arguments = request
            .arguments
            .map(Value::Object)
            .unwrap_or_else(|| serde_json::json!({}));
        self.dispatch(&request.name, arguments).await
    }
}

impl Default for SleepBlockerServer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InhibitorConfig;

    fn test_server() -> SleepBlockerServer {
        // The catalog and preset tools never touch the inhibitor binary.
        SleepBlockerServer::with_config(Config {
            inhibitor: InhibitorConfig {
                command: "/nonexistent/inhibitor-binary".to_string(),
                grace_period_secs: 1,
            },
        })
    }

    fn result_text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            rmcp::model::RawContent::Text(text) => text.text.as_str(),
            other => panic!("expected text content, got {:?}", other),
        }
    }

    #[test]
    fn test_router_lists_five_tools() {
        let server = test_server();
        let tools = server.tool_router.list_all();
        assert_eq!(tools.len(), 5);

        let names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"start_sleep_prevention"));
        assert!(names.contains(&"stop_sleep_prevention"));
        assert!(names.contains(&"get_sleep_status"));
        assert!(names.contains(&"list_sleep_modes"));
        assert!(names.contains(&"set_duration_preset"));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool_is_not_a_protocol_error() {
        let server = test_server();
        let result = server
            .dispatch("nonexistent", serde_json::json!({}))
            .await
            .unwrap();
        assert!(result_text(&result).contains("Unknown tool: nonexistent"));
    }

    #[tokio::test]
    async fn test_dispatch_list_sleep_modes() {
        let server = test_server();
        let result = server
            .dispatch("list_sleep_modes", serde_json::json!({}))
            .await
            .unwrap();

        let payload: Value = serde_json::from_str(result_text(&result)).unwrap();
        assert_eq!(payload["modes"].as_array().unwrap().len(), 5);
        assert_eq!(payload["default_mode"], "idle");
        for mode in payload["modes"].as_array().unwrap() {
            assert!(!mode["description"].as_str().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_dispatch_preset_lookup() {
        let server = test_server();

        let result = server
            .dispatch("set_duration_preset", serde_json::json!({"preset": "2hr"}))
            .await
            .unwrap();
        let payload: Value = serde_json::from_str(result_text(&result)).unwrap();
        assert_eq!(payload["success"], true);
        assert_eq!(payload["duration_minutes"], 120);

        let result = server
            .dispatch("set_duration_preset", serde_json::json!({"preset": "bogus"}))
            .await
            .unwrap();
        let payload: Value = serde_json::from_str(result_text(&result)).unwrap();
        assert_eq!(payload["success"], false);
        assert!(payload["error"].as_str().unwrap().contains("Unknown preset"));
    }

    #[tokio::test]
    async fn test_dispatch_spawn_failure_is_structured() {
        let server = test_server();
        let result = server
            .dispatch("start_sleep_prevention", serde_json::json!({"mode": "idle"}))
            .await
            .unwrap();

        let payload: Value = serde_json::from_str(result_text(&result)).unwrap();
        assert_eq!(payload["success"], false);
        assert!(payload["error"]
            .as_str()
            .unwrap()
            .contains("Failed to start sleep prevention"));
    }

    #[tokio::test]
    async fn test_dispatch_stop_when_idle() {
        let server = test_server();
        let result = server
            .dispatch("stop_sleep_prevention", serde_json::json!({}))
            .await
            .unwrap();

        let payload: Value = serde_json::from_str(result_text(&result)).unwrap();
        assert_eq!(payload["success"], false);
        assert_eq!(payload["message"], "No active sleep prevention to stop");
    }

    #[tokio::test]
    async fn test_dispatch_status_when_idle() {
        let server = test_server();
        let result = server
            .dispatch("get_sleep_status", serde_json::json!({}))
            .await
            .unwrap();

        let payload: Value = serde_json::from_str(result_text(&result)).unwrap();
        assert_eq!(payload["active"], false);
        assert!(payload["process_id"].is_null());
    }
}
