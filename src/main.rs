//! cors-relay
//!
//! A forwarding proxy that lets browser code reach any HTTP(S) endpoint by
//! naming it in `?url=`, with permissive CORS headers on every response, plus
//! an optional static file server for the page doing the calling.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                  cors-relay                  │
//!   Browser            │  ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//!   ───────────────────┼─▶│preflight │──▶│ routing  │──▶│ request  │  │
//!   GET /?url=...      │  │(OPTIONS) │   │ (?url=)  │   │ builder  │  │
//!                      │  └──────────┘   └──────────┘   └────┬─────┘  │
//!                      │                                     ▼        │
//!   ◀──────────────────┼──┌──────────┐   ┌──────────┐   ┌──────────┐  │
//!   status + body      │  │ response │◀──│ forward  │◀──│connector │◀─┼── Target
//!   + CORS headers     │  │  relay   │   │ (hyper)  │   │ tcp/tls  │  │
//!                      │  └──────────┘   └──────────┘   └──────────┘  │
//!                      │                                              │
//!   ───────────────────┼─▶ static_files (separate listener)           │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;

use cors_relay::config::{load_config, validate_config, ProxyConfig};
use cors_relay::lifecycle::{signals, Shutdown};
use cors_relay::observability::{logging, metrics};
use cors_relay::{HttpServer, StaticServer};

#[derive(Parser, Debug)]
#[command(name = "cors-relay")]
#[command(version, about = "CORS forwarding proxy and static file server", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Proxy port (overrides the configured bind address port).
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1024..))]
    port: Option<u16>,

    /// Directory served by the static file server.
    #[arg(long)]
    static_root: Option<PathBuf>,

    /// Static file server port.
    #[arg(long, value_parser = clap::value_parser!(u16).range(1024..))]
    static_port: Option<u16>,

    /// Do not start the static file server.
    #[arg(long)]
    no_static: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    fn apply(&self, config: &mut ProxyConfig) {
        if let Some(port) = self.port {
            config.listener.bind_address = with_port(&config.listener.bind_address, port);
        }
        if let Some(root) = &self.static_root {
            config.static_files.root = root.clone();
        }
        if let Some(port) = self.static_port {
            config.static_files.bind_address = with_port(&config.static_files.bind_address, port);
        }
        if self.no_static {
            config.static_files.enabled = false;
        }
    }
}

/// Replace the port of a `host:port` address, keeping the host.
fn with_port(address: &str, port: u16) -> String {
    match address.rsplit_once(':') {
        Some((host, _)) => format!("{}:{}", host, port),
        None => format!("0.0.0.0:{}", port),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => ProxyConfig::default(),
    };
    cli.apply(&mut config);

    if let Err(errors) = validate_config(&config) {
        for e in errors {
            eprintln!("Invalid configuration: {}", e);
        }
        return ExitCode::FAILURE;
    }

    logging::init(&config.observability.log_level);
    tracing::info!("cors-relay v{} starting", env!("CARGO_PKG_VERSION"));

    match run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ProxyConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        static_enabled = config.static_files.enabled,
        static_root = %config.static_files.root.display(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();

    let static_task = if config.static_files.enabled {
        let listener = bind(&config.static_files.bind_address).await?;
        let server = StaticServer::new(&config.static_files);
        let rx = shutdown.subscribe();
        Some(tokio::spawn(async move { server.run(listener, rx).await }))
    } else {
        None
    };

    let listener = bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;
    let proxy_rx = shutdown.subscribe();

    signals::spawn_signal_listener(shutdown.clone());

    let proxy_result = server.run(listener, proxy_rx).await;

    // The proxy may have stopped on an error rather than a signal.
    shutdown.trigger();
    if let Some(task) = static_task {
        task.await??;
    }
    proxy_result?;
    Ok(())
}

/// Bind a listener, with a hint when the address is taken.
async fn bind(address: &str) -> Result<TcpListener, std::io::Error> {
    match TcpListener::bind(address).await {
        Ok(listener) => {
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");
            Ok(listener)
        }
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
            tracing::error!(
                address = %address,
                "Address already in use; pick another port with --port or --static-port"
            );
            Err(e)
        }
        Err(e) => Err(e),
    }
}
