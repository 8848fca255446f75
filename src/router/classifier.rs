//! Event classification.
//!
//! Maps a raw [`PlatformEvent`] to zero or one [`LogEvent`]. Classification
//! is a pure function of the event snapshot: no I/O, no hidden state, no
//! failure modes.

use crate::models::event::{LogEvent, PlatformEvent, SNIPPET_MAX_CHARS};

/// Classify a platform event.
///
/// Returns `None` for events that carry nothing worth logging: voice
/// updates that do not change the channel, profile updates that leave the
/// nickname alone, and messages authored by the bot itself.
#[must_use]
pub fn classify(event: &PlatformEvent) -> Option<LogEvent> {
    match event {
        PlatformEvent::MemberJoin { guild_id, user_id } => Some(LogEvent::MemberJoined {
            guild_id: *guild_id,
            user_id: *user_id,
        }),
        PlatformEvent::MemberLeave { guild_id, user_id } => Some(LogEvent::MemberLeft {
            guild_id: *guild_id,
            user_id: *user_id,
        }),
        PlatformEvent::VoiceStateChange {
            guild_id,
            user_id,
            previous_channel,
            new_channel,
        } => match (*previous_channel, *new_channel) {
            (None, Some(to_channel)) => Some(LogEvent::VoiceJoined {
                guild_id: *guild_id,
                user_id: *user_id,
                to_channel,
            }),
            (Some(from_channel), None) => Some(LogEvent::VoiceLeft {
                guild_id: *guild_id,
                user_id: *user_id,
                from_channel,
            }),
            (Some(from_channel), Some(to_channel)) if from_channel != to_channel => {
                Some(LogEvent::VoiceMoved {
                    guild_id: *guild_id,
                    user_id: *user_id,
                    from_channel,
                    to_channel,
                })
            }
            // Mute, deafen, stream toggles and the like.
            _ => None,
        },
        PlatformEvent::MemberProfileUpdate {
            guild_id,
            user_id,
            previous_nick,
            new_nick,
        } => (previous_nick != new_nick).then(|| LogEvent::NicknameChanged {
            guild_id: *guild_id,
            user_id: *user_id,
            old_nick: previous_nick.clone(),
            new_nick: new_nick.clone(),
        }),
        PlatformEvent::MessageCreate {
            guild_id,
            user_id,
            channel_id,
            content,
            is_self,
        } => (!is_self).then(|| LogEvent::MessageSent {
            guild_id: *guild_id,
            user_id: *user_id,
            channel_id: *channel_id,
            content_snippet: snippet(content),
        }),
    }
}

/// Truncate `content` to [`SNIPPET_MAX_CHARS`] characters without
/// splitting a character.
fn snippet(content: &str) -> String {
    match content.char_indices().nth(SNIPPET_MAX_CHARS) {
        Some((cut, _)) => content[..cut].to_owned(),
        None => content.to_owned(),
    }
}
