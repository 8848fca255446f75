#![forbid(unsafe_code)]

//! `guildlog` — Discord audit router binary.
//!
//! Bootstraps configuration and the guild settings database, then connects
//! to the Discord gateway and routes events until shutdown.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use guildlog::config::GlobalConfig;
use guildlog::discord::DiscordService;
use guildlog::persistence::db;
use guildlog::persistence::guild_config_repo::GuildConfigRepo;
use guildlog::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "guildlog", about = "Discord audit log router", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("guildlog bootstrap");

    // Events interleave cooperatively on one thread.
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────
    let mut config = GlobalConfig::load_from_path(&args.config)?;
    config.load_credentials().await?;
    info!("configuration loaded");

    // ── Initialize database ─────────────────────────────
    let db = Arc::new(db::connect(config.db_path()).await?);
    let store = GuildConfigRepo::new(db);
    info!(path = %config.db_path().display(), "database connected");

    // ── Connect to Discord ──────────────────────────────
    let service = DiscordService::start(&config, store).await?;
    let ct = CancellationToken::new();
    let service_ct = ct.clone();
    let mut service_handle = tokio::spawn(async move {
        if let Err(err) = service.run(service_ct).await {
            error!(%err, "discord service failed");
        }
    });

    info!("guildlog ready");

    // ── Wait for shutdown signal or gateway exit ────────
    let gateway_exited = tokio::select! {
        () = shutdown_signal() => {
            info!("shutdown signal received");
            false
        }
        result = &mut service_handle => {
            if let Err(err) = result {
                error!(%err, "discord service task panicked");
            }
            true
        }
    };

    if !gateway_exited {
        ct.cancel();
        if let Err(err) = service_handle.await {
            error!(%err, "discord service task panicked");
        }
    }
    info!("guildlog shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
