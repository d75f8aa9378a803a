// Framework bootstrap for the geofence worker runtime.

use crate::frameworks::config;
use crate::frameworks::rules::{Config, ServerConfig};
use crate::interface_adapters::clients::rcon::RconClient;
use crate::use_cases::{Worker, WorkerSettings};

use std::io::Result;
use std::path::Path;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::Instrument;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Runs one worker per configured server until `shutdown` flips to true.
pub async fn run(
    config: &Config,
    settings: WorkerSettings,
    request_timeout: Duration,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    settings
        .validate()
        .map_err(|e| std::io::Error::other(format!("invalid worker settings: {e}")))?;

    let mut workers = JoinSet::new();
    for server in &config.servers {
        let Some(client) = build_client(server, request_timeout) else {
            continue;
        };
        let worker = Worker::new(client, server.enforcement(), settings);
        let span = tracing::info_span!("worker", host = %server.host, port = server.port);
        let shutdown = shutdown.clone();
        workers.spawn(async move { worker.run(shutdown).await }.instrument(span));
    }

    if workers.is_empty() {
        tracing::warn!("no servers configured, nothing to enforce");
    } else {
        tracing::info!(workers = workers.len(), "workers started");
    }

    while let Some(result) = workers.join_next().await {
        // Worker errors are already logged inside the worker span.
        if let Err(e) = result {
            tracing::error!(error = %e, "worker task failed");
        }
    }
    Ok(())
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("shutdown requested");
        shutdown_tx.send_replace(true);
    });

    run_from_file(
        &config::config_path(),
        config::worker_settings(),
        config::rcon_request_timeout(),
        shutdown_rx,
    )
    .await
}

/// Loads the rules file, runs the workers, and writes the rules back on the way out.
///
/// The file is also rewritten right after loading so it always reflects the
/// effective configuration, defaults included.
pub async fn run_from_file(
    path: &Path,
    settings: WorkerSettings,
    request_timeout: Duration,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let rules = Config::load_or_create(path).await.inspect_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "failed to load config");
    });
    let rules = rules.map_err(|e| std::io::Error::other(format!("failed to load config: {e}")))?;
    tracing::debug!(
        path = %path.display(),
        servers = rules.servers.len(),
        ?settings,
        rcon_request_timeout_ms = request_timeout.as_millis(),
        "config loaded"
    );
    save_rules(&rules, path).await?;

    let result = run(&rules, settings, request_timeout, shutdown).await;
    save_rules(&rules, path).await?;
    result
}

async fn save_rules(rules: &Config, path: &Path) -> Result<()> {
    rules.save(path).await.map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "failed to save config");
        std::io::Error::other(format!("failed to save config: {e}"))
    })
}

fn build_client(server: &ServerConfig, timeout: Duration) -> Option<RconClient> {
    match RconClient::new(server.base_url(), server.password.clone(), timeout) {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::error!(
                host = %server.host,
                port = server.port,
                error = %e,
                "failed to initialize rcon client, skipping server"
            );
            None
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for sigterm");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
