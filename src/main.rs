//! procmem-exporter entry point.
//!
//! Initializes logging, resolves configuration, registers the Prometheus
//! metrics, spawns the background sampling task, and serves the scrape
//! endpoint until SIGINT/SIGTERM.

use anyhow::Result;
use axum::{routing::get, Router};
use clap::Parser;
use prometheus::{Gauge, Registry};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::{net::TcpListener, signal};
use tracing::{debug, error, info, Level};

use procmem_exporter::cli::{Args, LogLevel};
use procmem_exporter::config::{
    resolve_config, show_config, validate_effective_config, DEFAULT_BIND_ADDR, DEFAULT_PORT,
};
use procmem_exporter::handlers::{metrics_handler, root_handler};
use procmem_exporter::metrics::ProcessMetrics;
use procmem_exporter::scheduler;
use procmem_exporter::state::AppState;

/// Initializes tracing logging subsystem with configured log level.
fn setup_logging(args: &Args) {
    let log_level = match args.log_level {
        LogLevel::Off => Level::ERROR,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    info!("Logging initialized with level: {:?}", args.log_level);
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format);
    }

    let config = resolve_config(&args)?;

    if let Err(e) = validate_effective_config(&config) {
        eprintln!("Configuration invalid: {}", e);
        std::process::exit(1);
    }

    setup_logging(&args);

    info!("Starting procmem-exporter");

    let bind_ip_str = config
        .bind
        .as_deref()
        .unwrap_or(DEFAULT_BIND_ADDR)
        .to_string();
    let port = config.port.unwrap_or(DEFAULT_PORT);

    // Initialize Prometheus metrics registry
    let registry = Registry::new();
    debug!("Prometheus registry initialized");

    let metrics = ProcessMetrics::new(&registry)?;
    let scrape_duration = Gauge::new(
        "procmem_exporter_scrape_duration_seconds",
        "Time spent serving the last /metrics request",
    )?;
    let pass_duration = Gauge::new(
        "procmem_exporter_pass_duration_seconds",
        "Duration of the last sampling pass",
    )?;
    let pass_success = Gauge::new(
        "procmem_exporter_pass_success",
        "Whether the last sampling pass succeeded (1) or failed (0)",
    )?;

    registry.register(Box::new(scrape_duration.clone()))?;
    registry.register(Box::new(pass_duration.clone()))?;
    registry.register(Box::new(pass_success.clone()))?;

    debug!("All metrics registered successfully");

    let state = Arc::new(AppState {
        registry,
        metrics,
        scrape_duration,
        pass_duration,
        pass_success,
        config: Arc::new(config),
        start_time: Instant::now(),
    });

    // Background sampling task; runs one pass immediately, then once per
    // interval for the lifetime of the process.
    tokio::spawn(scheduler::run_sampler(state.clone()));

    // Setup graceful shutdown signal handlers
    let shutdown_signal = async {
        let ctrl_c = async {
            signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("Failed to install signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT (Ctrl+C), shutting down gracefully...");
            }
            _ = terminate => {
                info!("Received SIGTERM, shutting down gracefully...");
            }
        }
    };

    let addr: SocketAddr = format!("{}:{}", bind_ip_str, port).parse()?;

    let app = Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state.clone());

    let listener = TcpListener::bind(addr).await?;
    info!(
        "procmem-exporter listening on http://{}:{}",
        bind_ip_str, port
    );

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
                return Err(e.into());
            }
        }
        _ = shutdown_signal => {
            info!("Shutdown signal received, exiting...");
        }
    }

    info!("procmem-exporter stopped gracefully");
    Ok(())
}
