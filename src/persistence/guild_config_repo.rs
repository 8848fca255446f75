//! Guild log destination repository for `SQLite` persistence.
//!
//! One row per guild with one nullable channel column per destination.
//! Writes are single-statement upserts, so concurrent writers to the same
//! guild resolve as last-write-wins without explicit locking.

use std::sync::Arc;

use crate::models::destination::Destination;
use crate::models::guild_config::GuildLogConfig;
use crate::models::ids::{ChannelId, GuildId};
use crate::{AppError, Result};

use super::db::Database;

/// Repository for per-guild destination settings.
#[derive(Clone)]
pub struct GuildConfigRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct GuildSettingsRow {
    guild_id: i64,
    member_channel_id: Option<i64>,
    voice_channel_id: Option<i64>,
    nickname_channel_id: Option<i64>,
    message_channel_id: Option<i64>,
}

impl GuildSettingsRow {
    fn into_config(self) -> Result<GuildLogConfig> {
        Ok(GuildLogConfig {
            guild_id: GuildId(from_sql_id(self.guild_id)?),
            member_channel: optional_channel(self.member_channel_id)?,
            voice_channel: optional_channel(self.voice_channel_id)?,
            nickname_channel: optional_channel(self.nickname_channel_id)?,
            message_channel: optional_channel(self.message_channel_id)?,
        })
    }
}

fn to_sql_id(id: u64) -> Result<i64> {
    i64::try_from(id).map_err(|_| AppError::Db(format!("snowflake out of range: {id}")))
}

fn from_sql_id(id: i64) -> Result<u64> {
    u64::try_from(id).map_err(|_| AppError::Db(format!("invalid stored snowflake: {id}")))
}

fn optional_channel(id: Option<i64>) -> Result<Option<ChannelId>> {
    id.map(|raw| from_sql_id(raw).map(ChannelId)).transpose()
}

fn upsert_sql(destination: Destination) -> &'static str {
    match destination {
        Destination::Member => {
            "INSERT INTO guild_settings (guild_id, member_channel_id) VALUES (?1, ?2)
             ON CONFLICT(guild_id) DO UPDATE SET member_channel_id = excluded.member_channel_id"
        }
        Destination::Voice => {
            "INSERT INTO guild_settings (guild_id, voice_channel_id) VALUES (?1, ?2)
             ON CONFLICT(guild_id) DO UPDATE SET voice_channel_id = excluded.voice_channel_id"
        }
        Destination::Nickname => {
            "INSERT INTO guild_settings (guild_id, nickname_channel_id) VALUES (?1, ?2)
             ON CONFLICT(guild_id) DO UPDATE SET nickname_channel_id = excluded.nickname_channel_id"
        }
        Destination::Message => {
            "INSERT INTO guild_settings (guild_id, message_channel_id) VALUES (?1, ?2)
             ON CONFLICT(guild_id) DO UPDATE SET message_channel_id = excluded.message_channel_id"
        }
    }
}

impl GuildConfigRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Point `destination` of `guild_id` at `channel_id`, replacing any
    /// previous channel. The write is committed before this returns.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the upsert fails.
    pub async fn set_channel(
        &self,
        guild_id: GuildId,
        destination: Destination,
        channel_id: ChannelId,
    ) -> Result<()> {
        sqlx::query(upsert_sql(destination))
            .bind(to_sql_id(guild_id.get())?)
            .bind(to_sql_id(channel_id.get())?)
            .execute(self.db.as_ref())
            .await?;
        Ok(())
    }

    /// Untyped variant of [`Self::set_channel`] for command surfaces.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidDestination` if `key` names no destination,
    /// or `AppError::Db` if the upsert fails.
    pub async fn set_channel_by_key(
        &self,
        guild_id: GuildId,
        key: &str,
        channel_id: ChannelId,
    ) -> Result<()> {
        let destination = Destination::parse(key)?;
        self.set_channel(guild_id, destination, channel_id).await
    }

    /// Channel configured for `destination` of `guild_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn get_channel(
        &self,
        guild_id: GuildId,
        destination: Destination,
    ) -> Result<Option<ChannelId>> {
        Ok(self
            .get_config(guild_id)
            .await?
            .and_then(|config| config.channel(destination)))
    }

    /// Untyped variant of [`Self::get_channel`]. Unknown keys yield `None`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn get_channel_by_key(
        &self,
        guild_id: GuildId,
        key: &str,
    ) -> Result<Option<ChannelId>> {
        match Destination::parse(key) {
            Ok(destination) => self.get_channel(guild_id, destination).await,
            Err(_) => Ok(None),
        }
    }

    /// All destination settings of `guild_id`, or `None` if the guild was
    /// never configured.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails or a stored id is invalid.
    pub async fn get_config(&self, guild_id: GuildId) -> Result<Option<GuildLogConfig>> {
        let row: Option<GuildSettingsRow> = sqlx::query_as(
            "SELECT guild_id, member_channel_id, voice_channel_id, nickname_channel_id, message_channel_id
             FROM guild_settings
             WHERE guild_id = ?1",
        )
        .bind(to_sql_id(guild_id.get())?)
        .fetch_optional(self.db.as_ref())
        .await?;

        row.map(GuildSettingsRow::into_config).transpose()
    }
}
