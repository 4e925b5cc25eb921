//! Sleep Blocker MCP Server
//!
//! Controls system sleep prevention over MCP by supervising a caffeinate
//! child process.
//!
//! # Usage
//!
//! Run directly: `sleep-blocker-mcp`
//!
//! Or configure in `.mcp.json`:
//! ```json
//! { "mcpServers": { "sleep-blocker": { "command": "./sleep-blocker-mcp" } } }
//! ```

use rmcp::ServiceExt;
use tokio::signal::unix::{signal, SignalKind};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sleep_blocker_mcp::SleepBlockerServer;

/// Logging goes to stderr; stdout is reserved for the MCP protocol.
/// Set `LOG_FORMAT=json` for structured output.
fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("sleep_blocker_mcp=info".parse()?);

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    tracing::info!("Starting sleep-blocker MCP Server");

    let server = SleepBlockerServer::new();
    let supervisor = server.supervisor().clone();
    let service = server.serve(rmcp::transport::stdio()).await?;

    tracing::info!("Server running, waiting for requests...");

    // Signals are consumed as streams on the async control path; cleanup
    // never runs inside a raw signal handler.
    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        res = service.waiting() => {
            res?;
            tracing::info!("Input closed, shutting down");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupt received, shutting down");
        }
        _ = sigterm.recv() => {
            tracing::info!("Termination signal received, shutting down");
        }
    }

    // The child must never outlive the supervisor, whichever path exits.
    supervisor.shutdown().await;

    tracing::info!("Server shut down");
    Ok(())
}
