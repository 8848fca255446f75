//! Raw platform events and the logical log events they classify into.

use serde::{Deserialize, Serialize};

use super::destination::LogCategory;
use super::ids::{ChannelId, GuildId, UserId};

/// Maximum length, in characters, of a message snippet carried by a
/// [`LogEvent::MessageSent`].
pub const SNIPPET_MAX_CHARS: usize = 1024;

/// An event as delivered by the gateway, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformEvent {
    /// A user joined a guild.
    MemberJoin {
        /// Guild the user joined.
        guild_id: GuildId,
        /// Joining user.
        user_id: UserId,
    },
    /// A user left or was removed from a guild.
    MemberLeave {
        /// Guild the user left.
        guild_id: GuildId,
        /// Departing user.
        user_id: UserId,
    },
    /// A member's voice connection changed.
    VoiceStateChange {
        /// Guild of the voice state.
        guild_id: GuildId,
        /// Member whose voice state changed.
        user_id: UserId,
        /// Voice channel before the change, if connected.
        previous_channel: Option<ChannelId>,
        /// Voice channel after the change, if connected.
        new_channel: Option<ChannelId>,
    },
    /// A member's guild profile changed.
    MemberProfileUpdate {
        /// Guild of the member.
        guild_id: GuildId,
        /// Member whose profile changed.
        user_id: UserId,
        /// Nickname before the update.
        previous_nick: Option<String>,
        /// Nickname after the update.
        new_nick: Option<String>,
    },
    /// A message was posted in a guild channel.
    MessageCreate {
        /// Guild of the channel.
        guild_id: GuildId,
        /// Author of the message.
        user_id: UserId,
        /// Channel the message was posted in.
        channel_id: ChannelId,
        /// Full message content.
        content: String,
        /// Whether the bot itself authored the message.
        is_self: bool,
    },
}

impl PlatformEvent {
    /// Short event name for log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MemberJoin { .. } => "member_join",
            Self::MemberLeave { .. } => "member_leave",
            Self::VoiceStateChange { .. } => "voice_state_change",
            Self::MemberProfileUpdate { .. } => "member_profile_update",
            Self::MessageCreate { .. } => "message_create",
        }
    }
}

/// A classified, immutable log event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogEvent {
    /// A member joined the guild.
    MemberJoined {
        /// Guild the member joined.
        guild_id: GuildId,
        /// Joining member.
        user_id: UserId,
    },
    /// A member left the guild.
    MemberLeft {
        /// Guild the member left.
        guild_id: GuildId,
        /// Departing member.
        user_id: UserId,
    },
    /// A member connected to voice.
    VoiceJoined {
        /// Guild of the voice channel.
        guild_id: GuildId,
        /// Connecting member.
        user_id: UserId,
        /// Channel joined.
        to_channel: ChannelId,
    },
    /// A member disconnected from voice.
    VoiceLeft {
        /// Guild of the voice channel.
        guild_id: GuildId,
        /// Disconnecting member.
        user_id: UserId,
        /// Channel left.
        from_channel: ChannelId,
    },
    /// A member switched voice channels, by themselves or by someone else.
    VoiceMoved {
        /// Guild of the voice channels.
        guild_id: GuildId,
        /// Moved member.
        user_id: UserId,
        /// Channel before the move.
        from_channel: ChannelId,
        /// Channel after the move.
        to_channel: ChannelId,
    },
    /// A member's nickname changed, by themselves or by someone else.
    NicknameChanged {
        /// Guild of the member.
        guild_id: GuildId,
        /// Member whose nickname changed.
        user_id: UserId,
        /// Nickname before the change.
        old_nick: Option<String>,
        /// Nickname after the change.
        new_nick: Option<String>,
    },
    /// A member posted a message.
    MessageSent {
        /// Guild of the channel.
        guild_id: GuildId,
        /// Message author.
        user_id: UserId,
        /// Channel the message was posted in.
        channel_id: ChannelId,
        /// Content truncated to [`SNIPPET_MAX_CHARS`].
        content_snippet: String,
    },
}

impl LogEvent {
    /// Category of this event.
    #[must_use]
    pub const fn category(&self) -> LogCategory {
        match self {
            Self::MemberJoined { .. } => LogCategory::MemberJoin,
            Self::MemberLeft { .. } => LogCategory::MemberLeave,
            Self::VoiceJoined { .. } => LogCategory::VoiceJoin,
            Self::VoiceLeft { .. } => LogCategory::VoiceLeave,
            Self::VoiceMoved { .. } => LogCategory::VoiceMove,
            Self::NicknameChanged { .. } => LogCategory::NicknameChange,
            Self::MessageSent { .. } => LogCategory::MessageSent,
        }
    }

    /// Guild the event happened in.
    #[must_use]
    pub const fn guild_id(&self) -> GuildId {
        match self {
            Self::MemberJoined { guild_id, .. }
            | Self::MemberLeft { guild_id, .. }
            | Self::VoiceJoined { guild_id, .. }
            | Self::VoiceLeft { guild_id, .. }
            | Self::VoiceMoved { guild_id, .. }
            | Self::NicknameChanged { guild_id, .. }
            | Self::MessageSent { guild_id, .. } => *guild_id,
        }
    }

    /// User the event is about.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        match self {
            Self::MemberJoined { user_id, .. }
            | Self::MemberLeft { user_id, .. }
            | Self::VoiceJoined { user_id, .. }
            | Self::VoiceLeft { user_id, .. }
            | Self::VoiceMoved { user_id, .. }
            | Self::NicknameChanged { user_id, .. }
            | Self::MessageSent { user_id, .. } => *user_id,
        }
    }
}
