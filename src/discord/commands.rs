//! `set_*_log` slash commands.
//!
//! Each command points one destination of the invoking guild at a text
//! channel. Replies are ephemeral.

use serenity::all::{
    ChannelType, CommandDataOptionValue, CommandInteraction, CommandOptionType, Context,
    CreateCommand, CreateCommandOption, CreateInteractionResponse,
    CreateInteractionResponseMessage, Permissions,
};
use tracing::{info, warn};

use crate::models::destination::Destination;
use crate::models::ids::{ChannelId, GuildId};
use crate::persistence::guild_config_repo::GuildConfigRepo;
use crate::{AppError, Result};

/// Name of the channel option shared by every command.
const CHANNEL_OPTION: &str = "channel";

/// Slash command names with their destinations and descriptions.
const COMMANDS: [(&str, Destination, &str); 4] = [
    (
        "set_member_log",
        Destination::Member,
        "Set the log channel for member events",
    ),
    (
        "set_vc_log",
        Destination::Voice,
        "Set the log channel for VC events",
    ),
    (
        "set_nickname_log",
        Destination::Nickname,
        "Set the log channel for nickname changes",
    ),
    (
        "set_message_log",
        Destination::Message,
        "Set the log channel for messages sent",
    ),
];

/// Destination configured by the command called `name`.
#[must_use]
pub fn destination_for_command(name: &str) -> Option<Destination> {
    COMMANDS
        .iter()
        .find(|(command, _, _)| *command == name)
        .map(|(_, destination, _)| *destination)
}

/// Slash command definitions to register globally.
#[must_use]
pub fn definitions() -> Vec<CreateCommand> {
    COMMANDS
        .iter()
        .map(|(name, _, description)| {
            CreateCommand::new(*name)
                .description(*description)
                .default_member_permissions(Permissions::MANAGE_GUILD)
                .add_option(
                    CreateCommandOption::new(
                        CommandOptionType::Channel,
                        CHANNEL_OPTION,
                        "Channel the notifications are posted in",
                    )
                    .channel_types(vec![ChannelType::Text])
                    .required(true),
                )
        })
        .collect()
}

/// Persist the destination and produce the confirmation text.
///
/// # Errors
///
/// Returns `AppError::Db` if the upsert fails.
pub async fn apply_set_channel(
    store: &GuildConfigRepo,
    guild_id: GuildId,
    destination: Destination,
    channel_id: ChannelId,
) -> Result<String> {
    store.set_channel(guild_id, destination, channel_id).await?;
    info!(%guild_id, %destination, %channel_id, "log destination configured");
    Ok(format!(
        "{} log channel set to {}",
        destination.label(),
        channel_id.mention()
    ))
}

/// Handle a slash command interaction.
pub async fn handle_command(ctx: &Context, command: &CommandInteraction, store: &GuildConfigRepo) {
    let Some(destination) = destination_for_command(&command.data.name) else {
        warn!(name = %command.data.name, "unknown slash command");
        return;
    };

    let reply = match resolve_and_apply(command, store, destination).await {
        Ok(text) => text,
        Err(err) => {
            warn!(name = %command.data.name, %err, "slash command failed");
            user_facing_error(&err)
        }
    };

    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(reply)
            .ephemeral(true),
    );
    if let Err(err) = command.create_response(ctx, response).await {
        warn!(%err, "failed to respond to slash command");
    }
}

async fn resolve_and_apply(
    command: &CommandInteraction,
    store: &GuildConfigRepo,
    destination: Destination,
) -> Result<String> {
    let guild_id = command
        .guild_id
        .ok_or_else(|| AppError::NotFound("command used outside a guild".into()))?;
    let channel_id = command
        .data
        .options
        .iter()
        .find(|option| option.name == CHANNEL_OPTION)
        .and_then(|option| match option.value {
            CommandDataOptionValue::Channel(id) => Some(id),
            _ => None,
        })
        .ok_or_else(|| AppError::NotFound("channel option missing".into()))?;

    apply_set_channel(
        store,
        GuildId(guild_id.get()),
        destination,
        ChannelId(channel_id.get()),
    )
    .await
}

fn user_facing_error(err: &AppError) -> String {
    match err {
        AppError::NotFound(msg) => format!("Could not update the log channel: {msg}."),
        _ => "Could not update the log channel. Please try again later.".to_owned(),
    }
}
