//! Global configuration parsing, validation, and credential loading.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::models::attribution::DEFAULT_LOOKBACK_LIMIT;
use crate::{AppError, Result};

/// Keychain service name under which the bot token is stored.
const KEYRING_SERVICE: &str = "guildlog";

/// Discord API ceiling for a single audit-log page.
const MAX_LOOKBACK_LIMIT: u8 = 100;

/// Nested Discord configuration.
///
/// The bot token is loaded at runtime via OS keychain or environment
/// variable, never from the TOML config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DiscordConfig {
    /// Register the `set_*_log` slash commands when the bot becomes ready.
    #[serde(default = "default_true")]
    pub register_commands: bool,
    /// Bot token used for the gateway and HTTP API (populated at runtime).
    #[serde(skip)]
    pub token: String,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            register_commands: true,
            token: String::new(),
        }
    }
}

/// Audit-trail correlation settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AuditConfig {
    /// How many of the most recent audit entries are scanned per event.
    #[serde(default = "default_lookback_limit")]
    pub lookback_limit: u8,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            lookback_limit: default_lookback_limit(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_lookback_limit() -> u8 {
    DEFAULT_LOOKBACK_LIMIT
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Path to the `SQLite` file holding per-guild log destinations.
    pub db_path: PathBuf,
    /// Discord connectivity settings.
    #[serde(default)]
    pub discord: DiscordConfig,
    /// Attribution lookup settings.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the Discord bot token from OS keychain with env-var fallback.
    ///
    /// A `.env` file in the working directory is read first, if present,
    /// so `DISCORD_TOKEN` may live there during development.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if neither keychain nor env var provide
    /// the token.
    pub async fn load_credentials(&mut self) -> Result<()> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                warn!(%err, "failed to read .env file");
            }
        }
        self.discord.token = load_credential("discord_token", "DISCORD_TOKEN").await?;
        Ok(())
    }

    /// Path of the guild settings database.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn validate(&self) -> Result<()> {
        if self.db_path.as_os_str().is_empty() {
            return Err(AppError::Config("db_path must not be empty".into()));
        }

        if self.audit.lookback_limit == 0 || self.audit.lookback_limit > MAX_LOOKBACK_LIMIT {
            return Err(AppError::Config(format!(
                "audit.lookback_limit must be between 1 and {MAX_LOOKBACK_LIMIT}"
            )));
        }

        Ok(())
    }
}

/// Load a single credential from OS keychain with env-var fallback.
async fn load_credential(keyring_key: &str, env_key: &str) -> Result<String> {
    let key = keyring_key.to_owned();

    // keyring is synchronous I/O.
    let keychain_result = tokio::task::spawn_blocking(move || {
        keyring::Entry::new(KEYRING_SERVICE, &key).and_then(|entry| entry.get_password())
    })
    .await
    .map_err(|err| AppError::Config(format!("keychain task panicked: {err}")))?;

    match keychain_result {
        Ok(value) if !value.is_empty() => return Ok(value),
        Ok(_) => {
            warn!(key = keyring_key, "keychain entry is empty, trying env var");
        }
        Err(err) => {
            warn!(
                key = keyring_key,
                ?err,
                "keychain lookup failed, trying env var"
            );
        }
    }

    env::var(env_key).map_err(|_| {
        AppError::Config(format!(
            "credential {keyring_key} not found in keychain or {env_key} env var"
        ))
    })
}
