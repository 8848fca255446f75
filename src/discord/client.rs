//! Discord HTTP gateway and gateway-connection lifecycle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serenity::all::{
    ChannelId as DiscordChannelId, Client, CreateEmbed, CreateEmbedFooter, CreateMessage,
    GatewayIntents, GuildId as DiscordGuildId, Http, Timestamp,
};
use serenity::model::guild::audit_log::{Action, AuditLogEntry, MemberAction};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::GlobalConfig;
use crate::gateway::{ChannelHandle, Gateway, GatewayFuture};
use crate::models::attribution::{AuditActionKind, AuditTrailEntry};
use crate::models::ids::{ChannelId, GuildId, UserId};
use crate::models::notification::NotificationRecord;
use crate::persistence::guild_config_repo::GuildConfigRepo;
use crate::router::Router;
use crate::{AppError, Result};

use super::handler::DiscordHandler;

/// [`Gateway`] implementation over the Discord REST API.
#[derive(Clone)]
pub struct DiscordGateway {
    http: Arc<Http>,
}

impl DiscordGateway {
    /// Wrap an authenticated HTTP client.
    #[must_use]
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    async fn fetch_audit_entries(
        &self,
        guild_id: GuildId,
        action: AuditActionKind,
        limit: u8,
    ) -> Result<Vec<AuditTrailEntry>> {
        let guild = discord_guild(guild_id)?;
        let logs = guild
            .audit_logs(&self.http, Some(audit_action(action)), None, None, Some(limit))
            .await?;
        Ok(logs.entries.iter().map(trail_entry).collect())
    }

    async fn fetch_channel(&self, channel_id: ChannelId) -> Option<ChannelHandle> {
        let id = discord_channel(channel_id).ok()?;
        match self.http.get_channel(id).await {
            Ok(_) => Some(ChannelHandle { id: channel_id }),
            Err(err) => {
                debug!(%channel_id, %err, "channel lookup failed");
                None
            }
        }
    }

    async fn post(&self, channel: ChannelHandle, record: NotificationRecord) -> Result<()> {
        let id = discord_channel(channel.id)?;
        let message = CreateMessage::new().embed(build_embed(record));
        id.send_message(self.http.as_ref(), message).await?;
        Ok(())
    }
}

impl Gateway for DiscordGateway {
    fn query_audit_trail(
        &self,
        guild_id: GuildId,
        action: AuditActionKind,
        limit: u8,
    ) -> GatewayFuture<'_, Result<Vec<AuditTrailEntry>>> {
        Box::pin(self.fetch_audit_entries(guild_id, action, limit))
    }

    fn resolve_channel(&self, channel_id: ChannelId) -> GatewayFuture<'_, Option<ChannelHandle>> {
        Box::pin(self.fetch_channel(channel_id))
    }

    fn send_message(
        &self,
        channel: ChannelHandle,
        record: NotificationRecord,
    ) -> GatewayFuture<'_, Result<()>> {
        Box::pin(self.post(channel, record))
    }
}

fn discord_guild(id: GuildId) -> Result<DiscordGuildId> {
    if id.get() == 0 {
        return Err(AppError::Discord("guild id must be non-zero".into()));
    }
    Ok(DiscordGuildId::new(id.get()))
}

fn discord_channel(id: ChannelId) -> Result<DiscordChannelId> {
    if id.get() == 0 {
        return Err(AppError::Discord("channel id must be non-zero".into()));
    }
    Ok(DiscordChannelId::new(id.get()))
}

fn audit_action(kind: AuditActionKind) -> Action {
    match kind {
        AuditActionKind::MemberMove => Action::Member(MemberAction::MemberMove),
        AuditActionKind::MemberUpdate => Action::Member(MemberAction::Update),
    }
}

fn trail_entry(entry: &AuditLogEntry) -> AuditTrailEntry {
    let created = entry.id.created_at().unix_timestamp();
    AuditTrailEntry {
        target_user_id: entry.target_id.map(|target| UserId(target.get())),
        actor_id: UserId(entry.user_id.get()),
        timestamp: DateTime::from_timestamp(created, 0).unwrap_or_else(Utc::now),
    }
}

fn build_embed(record: NotificationRecord) -> CreateEmbed {
    let footer = CreateEmbedFooter::new(record.footer_text());
    let mut embed = CreateEmbed::new()
        .title(record.title)
        .description(record.description)
        .colour(record.color.rgb())
        .footer(footer);
    if let Ok(ts) = Timestamp::from_unix_timestamp(record.timestamp.timestamp()) {
        embed = embed.timestamp(ts);
    }
    for field in record.fields {
        embed = embed.field(field.name, field.value, false);
    }
    embed
}

/// Gateway intents the router depends on.
#[must_use]
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_VOICE_STATES
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
}

/// Owns the Discord gateway connection.
pub struct DiscordService {
    client: Client,
}

impl DiscordService {
    /// Build the HTTP gateway, router and event handler, and connect the
    /// client.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if no token is loaded, or
    /// `AppError::Discord` if the client cannot be built.
    pub async fn start(config: &GlobalConfig, store: GuildConfigRepo) -> Result<Self> {
        let token = config.discord.token.as_str();
        if token.is_empty() {
            return Err(AppError::Config("discord token not loaded".into()));
        }

        let gateway: Arc<dyn Gateway> = Arc::new(DiscordGateway::new(Arc::new(Http::new(token))));
        let router = Arc::new(Router::new(
            store.clone(),
            gateway,
            config.audit.lookback_limit,
        ));
        let handler = DiscordHandler::new(router, store, config.discord.register_commands);

        let client = Client::builder(token, intents())
            .event_handler(handler)
            .await?;

        info!("discord client built");
        Ok(Self { client })
    }

    /// Run the gateway connection until it ends or `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Discord` if the gateway connection fails.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<()> {
        let shard_manager = Arc::clone(&self.client.shard_manager);
        tokio::select! {
            result = self.client.start() => {
                result?;
                info!("discord gateway connection ended");
            }
            () = cancel.cancelled() => {
                info!("shutting down discord shards");
                shard_manager.shutdown_all().await;
            }
        }
        Ok(())
    }
}
