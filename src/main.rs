//! linkding-mcp: MCP server for the Linkding bookmark manager
//!
//! This tool exposes bookmark search, bookmark creation and tag listing
//! from a Linkding instance as MCP tools, over stdio or HTTP.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use linkding_mcp::config::{self, Overrides, Settings};
use linkding_mcp::error::ConfigError;
use linkding_mcp::linkding::{LinkdingApi, LinkdingClient};
use linkding_mcp::mcp::http::{serve_http, shutdown_signal};
use linkding_mcp::mcp::server::McpServer;

/// Transport the server speaks MCP over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    /// Newline-delimited JSON-RPC on stdin/stdout
    Stdio,
    /// JSON-RPC over HTTP POST on /mcp
    Http,
}

/// MCP server for the Linkding bookmark manager.
///
/// Exposes bookmark search, bookmark creation and tag listing as tools
/// for AI assistants.
#[derive(Parser, Debug)]
#[command(name = "linkding-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Base URL of the Linkding instance
    #[arg(long, env = "LINKDING_URL")]
    url: Option<String>,

    /// Linkding REST API token
    #[arg(long, env = "LINKDING_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Transport to serve MCP over
    #[arg(long, value_enum, env = "LINKDING_MCP_TRANSPORT", default_value_t = Transport::Stdio)]
    transport: Transport,

    /// Listen address for the HTTP transport
    #[arg(long, value_name = "ADDR", env = "LINKDING_MCP_BIND")]
    bind: Option<String>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN, // Default to warn for unknown levels
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the file, layers flags and environment on top, and validates.
///
/// On failure, also reports whether the default config location was used.
fn load_settings(args: &Args) -> Result<(Settings, String), (ConfigError, bool)> {
    let config_path = args.config.as_deref();
    let mut cfg = config::load_config(config_path).map_err(|e| (e, config_path.is_none()))?;

    cfg.apply_overrides(Overrides {
        url: args.url.clone(),
        api_token: args.token.clone(),
        bind_address: args.bind.clone(),
    });

    let settings = cfg.resolve().map_err(|e| (e, false))?;
    Ok((settings, cfg.logging.level))
}

/// Runs the selected transport to completion.
fn run(transport: Transport, server: McpServer, settings: &Settings) -> Result<(), String> {
    match transport {
        Transport::Stdio => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| format!("failed to create Tokio runtime: {e}"))?;

            info!("MCP server ready, waiting for client connection...");
            runtime.block_on(server.serve_stdio()).map_err(|e| e.to_string())
        }
        Transport::Http => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .map_err(|e| format!("failed to create Tokio runtime: {e}"))?;

            runtime
                .block_on(serve_http(
                    Arc::new(server),
                    settings.bind_address,
                    shutdown_signal(),
                ))
                .map_err(|e| e.to_string())
        }
    }
}

/// Entry point for the linkding-mcp server.
fn main() -> ExitCode {
    let args = Args::parse();

    let (settings, config_level) = match load_settings(&args) {
        Ok(loaded) => loaded,
        Err((e, used_default_path)) => {
            eprintln!("Configuration error: {e}");
            if used_default_path {
                if let Some(default_path) = config::default_config_path() {
                    eprintln!("\nConfig file read from: {}", default_path.display());
                }
            }
            return ExitCode::FAILURE;
        }
    };

    // Initialise logging
    let log_level = get_log_level(args.verbose, args.quiet, &config_level);
    init_tracing(log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        transport = ?args.transport,
        url = %settings.url,
        "Starting linkding-mcp server"
    );

    let client = match LinkdingClient::new(&settings.url, &settings.api_token) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to create Linkding client");
            return ExitCode::FAILURE;
        }
    };
    let server = McpServer::new(Arc::new(client) as Arc<dyn LinkdingApi>);

    match run(args.transport, server, &settings) {
        Ok(()) => {
            info!("Server shut down gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}
