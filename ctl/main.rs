#![forbid(unsafe_code)]

//! `guildlog-ctl` — local CLI companion for `guildlog`.
//!
//! Reads and writes per-guild log destinations directly in the settings
//! database named by the server's config file. Changes are visible to a
//! running server on its next event.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use guildlog::config::GlobalConfig;
use guildlog::models::destination::Destination;
use guildlog::models::guild_config::GuildLogConfig;
use guildlog::models::ids::{ChannelId, GuildId};
use guildlog::persistence::db;
use guildlog::persistence::guild_config_repo::GuildConfigRepo;
use guildlog::{AppError, Result};

#[derive(Debug, Parser)]
#[command(
    name = "guildlog-ctl",
    about = "Local CLI for guildlog log destinations",
    version,
    long_about = None
)]
struct Cli {
    /// Path to the server's TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Point a destination at a channel.
    SetChannel {
        /// Guild ID.
        #[arg(long)]
        guild: u64,
        /// Destination: member, voice (vc), nickname, or message.
        #[arg(long)]
        destination: String,
        /// Channel ID.
        #[arg(long)]
        channel: u64,
    },

    /// Print the channel configured for a destination.
    GetChannel {
        /// Guild ID.
        #[arg(long)]
        guild: u64,
        /// Destination: member, voice (vc), nickname, or message.
        #[arg(long)]
        destination: String,
    },

    /// Print every destination of a guild as JSON.
    Show {
        /// Guild ID.
        #[arg(long)]
        guild: u64,
    },
}

fn main() {
    let args = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Error: failed to build tokio runtime: {err}");
            std::process::exit(1);
        }
    };

    match runtime.block_on(run(args)) {
        Ok(output) => println!("{output}"),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}

async fn run(args: Cli) -> Result<String> {
    let config = GlobalConfig::load_from_path(&args.config)?;
    let repo = GuildConfigRepo::new(Arc::new(db::connect(config.db_path()).await?));

    match args.command {
        Command::SetChannel {
            guild,
            destination,
            channel,
        } => {
            repo.set_channel_by_key(GuildId(guild), &destination, ChannelId(channel))
                .await?;
            Ok("OK".to_owned())
        }
        Command::GetChannel { guild, destination } => {
            let channel = repo.get_channel_by_key(GuildId(guild), &destination).await?;
            Ok(channel.map_or_else(|| "not configured".to_owned(), |id| id.to_string()))
        }
        Command::Show { guild } => {
            let config = repo
                .get_config(GuildId(guild))
                .await?
                .unwrap_or_else(|| GuildLogConfig::empty(GuildId(guild)));
            render_config(&config)
        }
    }
}

fn render_config(config: &GuildLogConfig) -> Result<String> {
    let destinations: serde_json::Map<String, serde_json::Value> = Destination::ALL
        .iter()
        .map(|destination| {
            let value = config
                .channel(*destination)
                .map_or(serde_json::Value::Null, |id| id.to_string().into());
            (destination.as_str().to_owned(), value)
        })
        .collect();
    let body = serde_json::json!({
        "guild_id": config.guild_id.to_string(),
        "destinations": destinations,
    });
    serde_json::to_string_pretty(&body)
        .map_err(|err| AppError::Io(format!("failed to render config: {err}")))
}
