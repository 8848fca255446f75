//! Per-guild log destination settings.

use serde::{Deserialize, Serialize};

use super::destination::Destination;
use super::ids::{ChannelId, GuildId};

/// Destination channels configured for one guild.
///
/// A `None` channel means the destination is not configured and its
/// notifications are suppressed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuildLogConfig {
    /// Guild these settings belong to.
    pub guild_id: GuildId,
    /// Channel for member join/leave notifications.
    pub member_channel: Option<ChannelId>,
    /// Channel for voice notifications.
    pub voice_channel: Option<ChannelId>,
    /// Channel for nickname notifications.
    pub nickname_channel: Option<ChannelId>,
    /// Channel for message notifications.
    pub message_channel: Option<ChannelId>,
}

impl GuildLogConfig {
    /// Settings with no destination configured.
    #[must_use]
    pub const fn empty(guild_id: GuildId) -> Self {
        Self {
            guild_id,
            member_channel: None,
            voice_channel: None,
            nickname_channel: None,
            message_channel: None,
        }
    }

    /// Channel configured for `destination`.
    #[must_use]
    pub const fn channel(&self, destination: Destination) -> Option<ChannelId> {
        match destination {
            Destination::Member => self.member_channel,
            Destination::Voice => self.voice_channel,
            Destination::Nickname => self.nickname_channel,
            Destination::Message => self.message_channel,
        }
    }
}
