//! Sleep Blocker MCP Library
//!
//! MCP tools for controlling system sleep prevention by supervising a single
//! caffeinate process: start it with a mode and optional duration, inspect
//! elapsed/remaining time, and stop it again. The supervisor guarantees the
//! child is terminated on every shutdown path.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use sleep_blocker_mcp::SleepBlockerServer;
//!
//! let server = SleepBlockerServer::new();
//! // Serve via stdio, or drive server.dispatch(..) directly
//! ```
//!
//! # Usage as Binary
//!
//! Run directly: `sleep-blocker-mcp`
//!
//! Or configure in `.mcp.json`:
//! ```json
//! { "mcpServers": { "sleep-blocker": { "command": "./sleep-blocker-mcp" } } }
//! ```

pub mod handlers;
pub mod modes;
pub mod params;
pub mod server;
pub mod supervisor;
pub mod types;

// Re-export main server and supervisor types
pub use server::SleepBlockerServer;
pub use supervisor::{SleepSupervisor, StartedSession, StopOutcome};

// Re-export parameter and catalog types for direct API usage
pub use modes::SleepMode;
pub use params::{SetDurationPresetParams, StartSleepPreventionParams};
pub use types::Config;
