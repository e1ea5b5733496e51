//! gopkg: vanity import paths for Go packages.
//!
//! ```text
//!   go get example.com/pkg/sub          browser visits example.com/pkg/sub
//!            │                                      │
//!            ▼                                      ▼
//!   ┌────────────────────────────────────────────────────────┐
//!   │  http (request ID, timeout, trace)                     │
//!   │    → routing (package by mount path / host)            │
//!   │    → package (longest submodule match)                 │
//!   │    → response: go-import page │ 307 to repository      │
//!   └────────────────────────────────────────────────────────┘
//!            ▲
//!   config file ── loader ── validation ── watcher (hot reload)
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use gopkg::config::watcher::ConfigWatcher;
use gopkg::config::{load_config_with, ServerConfig};
use gopkg::lifecycle::{wait_for_signal, Shutdown};
use gopkg::observability::{logging, metrics};
use gopkg::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "gopkg", version, about = "Vanity import path server for Go packages")]
struct Cli {
    /// Configuration file (.toml, .json, or gopkg directives)
    #[arg(short, long)]
    config: PathBuf,

    /// Socket address to listen on, overriding the config file
    #[arg(short, long)]
    listen: Option<String>,

    /// Reload packages when the configuration file changes
    #[arg(short, long)]
    watch: bool,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,

    /// Logging verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let listen = cli.listen.clone();
    let loaded = load_config_with(&cli.config, |config| {
        if let Some(listen) = listen {
            config.listener.bind_address = listen;
        }
    });
    let log_level = match &loaded {
        Ok(config) => config.observability.log_level.as_str(),
        Err(_) => "info",
    };
    logging::init(log_level, cli.verbose);

    let config: ServerConfig = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(path = ?cli.config, error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    tracing::info!(
        path = ?cli.config,
        packages = config.packages.len(),
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if cli.check {
        HttpServer::new(config)?;
        tracing::info!("Configuration OK");
        return Ok(());
    }

    // Installed before the server so startup gauges reach the exporter.
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = HttpServer::new(config.clone())?;

    // The watcher stops when dropped, so keep it for the whole run.
    let (_watcher, config_updates) = if cli.watch {
        let (watcher, updates) = ConfigWatcher::new(&cli.config);
        (Some(watcher.with_bind_address(cli.listen).run()?), updates)
    } else {
        let (_, updates) = mpsc::unbounded_channel();
        (None, updates)
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
