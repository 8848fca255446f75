//! Log categories and the four configurable destinations they collapse to.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AppError;

/// Configurable notification destination for a guild.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// Member join and leave notifications.
    Member,
    /// Voice channel join, leave, and move notifications.
    Voice,
    /// Nickname change notifications.
    Nickname,
    /// Message sent notifications.
    Message,
}

impl Destination {
    /// Every destination, in storage column order.
    pub const ALL: [Self; 4] = [Self::Member, Self::Voice, Self::Nickname, Self::Message];

    /// Parse a destination key.
    ///
    /// Accepts `member`, `voice`, `vc`, `nickname` and `message`, each
    /// optionally suffixed with `_log`, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidDestination` for any other key.
    pub fn parse(key: &str) -> crate::Result<Self> {
        let normalized = key.trim().to_ascii_lowercase();
        let base = normalized.strip_suffix("_log").unwrap_or(&normalized);
        match base {
            "member" => Ok(Self::Member),
            "voice" | "vc" => Ok(Self::Voice),
            "nickname" => Ok(Self::Nickname),
            "message" => Ok(Self::Message),
            _ => Err(AppError::InvalidDestination(key.to_owned())),
        }
    }

    /// Stable lowercase key used in CLI output and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Voice => "voice",
            Self::Nickname => "nickname",
            Self::Message => "message",
        }
    }

    /// Human-readable label used in command confirmations.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::Voice => "VC",
            Self::Nickname => "Nickname",
            Self::Message => "Message",
        }
    }
}

impl Display for Destination {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Destination {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Fine-grained category of a classified log event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    /// A member joined the guild.
    MemberJoin,
    /// A member left the guild.
    MemberLeave,
    /// A member connected to a voice channel.
    VoiceJoin,
    /// A member disconnected from voice.
    VoiceLeave,
    /// A member switched voice channels.
    VoiceMove,
    /// A member's nickname changed.
    NicknameChange,
    /// A member posted a message.
    MessageSent,
}

impl LogCategory {
    /// Destination this category is delivered to.
    #[must_use]
    pub const fn destination(self) -> Destination {
        match self {
            Self::MemberJoin | Self::MemberLeave => Destination::Member,
            Self::VoiceJoin | Self::VoiceLeave | Self::VoiceMove => Destination::Voice,
            Self::NicknameChange => Destination::Nickname,
            Self::MessageSent => Destination::Message,
        }
    }
}
