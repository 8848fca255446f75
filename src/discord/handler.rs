//! Serenity event handler feeding the router.
//!
//! Converts gateway callbacks into [`PlatformEvent`]s and hands each one to
//! [`Router::spawn`]. Events outside a guild are ignored.

use std::sync::Arc;

use serenity::all::{
    Command, Context, EventHandler, GuildId as DiscordGuildId, GuildMemberUpdateEvent,
    Interaction, Member, Message, Ready, User, VoiceState,
};
use serenity::async_trait;
use tracing::{debug, info, warn};

use crate::models::event::PlatformEvent;
use crate::models::ids::{ChannelId, GuildId, UserId};
use crate::persistence::guild_config_repo::GuildConfigRepo;
use crate::router::Router;

use super::commands;

/// Gateway event handler.
pub struct DiscordHandler {
    router: Arc<Router>,
    store: GuildConfigRepo,
    register_commands: bool,
}

impl DiscordHandler {
    /// Create a handler routing events through `router` and serving
    /// configuration commands against `store`.
    #[must_use]
    pub fn new(router: Arc<Router>, store: GuildConfigRepo, register_commands: bool) -> Self {
        Self {
            router,
            store,
            register_commands,
        }
    }

    fn route(&self, event: PlatformEvent) {
        // Each event owns its task; the handle is intentionally detached.
        drop(self.router.spawn(event));
    }
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, guilds = ready.guilds.len(), "discord gateway ready");

        if !self.register_commands {
            return;
        }
        match Command::set_global_commands(&ctx.http, commands::definitions()).await {
            Ok(registered) => info!(count = registered.len(), "slash commands registered"),
            Err(err) => warn!(%err, "failed to register slash commands"),
        }
    }

    async fn guild_member_addition(&self, _ctx: Context, new_member: Member) {
        self.route(PlatformEvent::MemberJoin {
            guild_id: GuildId(new_member.guild_id.get()),
            user_id: UserId(new_member.user.id.get()),
        });
    }

    async fn guild_member_removal(
        &self,
        _ctx: Context,
        guild_id: DiscordGuildId,
        user: User,
        _member_data_if_available: Option<Member>,
    ) {
        self.route(PlatformEvent::MemberLeave {
            guild_id: GuildId(guild_id.get()),
            user_id: UserId(user.id.get()),
        });
    }

    async fn voice_state_update(&self, _ctx: Context, old: Option<VoiceState>, new: VoiceState) {
        let Some(guild_id) = new.guild_id else {
            return;
        };
        self.route(PlatformEvent::VoiceStateChange {
            guild_id: GuildId(guild_id.get()),
            user_id: UserId(new.user_id.get()),
            previous_channel: old
                .and_then(|state| state.channel_id)
                .map(|id| ChannelId(id.get())),
            new_channel: new.channel_id.map(|id| ChannelId(id.get())),
        });
    }

    async fn guild_member_update(
        &self,
        _ctx: Context,
        old_if_available: Option<Member>,
        _new: Option<Member>,
        event: GuildMemberUpdateEvent,
    ) {
        // Without the cached snapshot the previous nickname is unknowable.
        let Some(old) = old_if_available else {
            debug!(
                guild_id = %event.guild_id,
                user_id = %event.user.id,
                "member update without cached snapshot; skipped"
            );
            return;
        };
        self.route(PlatformEvent::MemberProfileUpdate {
            guild_id: GuildId(event.guild_id.get()),
            user_id: UserId(event.user.id.get()),
            previous_nick: old.nick,
            new_nick: event.nick,
        });
    }

    async fn message(&self, ctx: Context, new_message: Message) {
        let Some(guild_id) = new_message.guild_id else {
            return;
        };
        let is_self = new_message.author.id == ctx.cache.current_user().id;
        self.route(PlatformEvent::MessageCreate {
            guild_id: GuildId(guild_id.get()),
            user_id: UserId(new_message.author.id.get()),
            channel_id: ChannelId(new_message.channel_id.get()),
            content: new_message.content,
            is_self,
        });
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            commands::handle_command(&ctx, &command, &self.store).await;
        }
    }
}
