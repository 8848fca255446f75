//! Notification record builders.
//!
//! Turns a classified [`LogEvent`] plus its attribution outcome into the
//! [`NotificationRecord`] the dispatcher posts.

use crate::models::attribution::AttributionResult;
use crate::models::event::LogEvent;
use crate::models::notification::{ColorClass, NotificationRecord};

/// Placeholder for an absent nickname.
const NO_NICKNAME: &str = "None";
/// Placeholder for an attribution miss.
const UNKNOWN_ACTOR: &str = "Unknown";
/// Placeholder for a message with no text content.
const NO_CONTENT: &str = "No content";

/// Build the notification for `event`.
///
/// `attribution` is only consulted for voice moves and nickname changes;
/// pass [`AttributionResult::NotFound`] for other events.
#[must_use]
pub fn render(event: &LogEvent, attribution: AttributionResult) -> NotificationRecord {
    let user = event.user_id();
    let mention = user.mention();

    match event {
        LogEvent::MemberJoined { .. } => NotificationRecord::new(
            "Member Joined",
            format!("{mention} joined the server."),
            ColorClass::Success,
            user,
        ),
        LogEvent::MemberLeft { .. } => NotificationRecord::new(
            "Member Left",
            format!("{mention} left the server."),
            ColorClass::Danger,
            user,
        ),
        LogEvent::VoiceJoined { to_channel, .. } => NotificationRecord::new(
            "Voice Channel Join",
            format!(
                "{mention} joined the voice channel {}.",
                to_channel.mention()
            ),
            ColorClass::Success,
            user,
        ),
        LogEvent::VoiceLeft { from_channel, .. } => NotificationRecord::new(
            "Voice Channel Leave",
            format!(
                "{mention} left the voice channel {}.",
                from_channel.mention()
            ),
            ColorClass::Danger,
            user,
        ),
        LogEvent::VoiceMoved {
            from_channel,
            to_channel,
            ..
        } => {
            // No audit entry: the moved member stands in as the actor. This
            // cannot tell a self-move from an unlogged drag.
            let description = match attribution.actor() {
                Some(actor) => format!(
                    "{mention} was moved from {} to {} by {}.",
                    from_channel.mention(),
                    to_channel.mention(),
                    actor.mention()
                ),
                None => format!(
                    "{mention} was dragged from {} to {} by {mention}.",
                    from_channel.mention(),
                    to_channel.mention()
                ),
            };
            NotificationRecord::new("Voice Channel Moved", description, ColorClass::Info, user)
        }
        LogEvent::NicknameChanged {
            old_nick, new_nick, ..
        } => {
            let changed_by = attribution
                .actor()
                .map_or_else(|| UNKNOWN_ACTOR.to_owned(), |actor| actor.mention());
            NotificationRecord::new(
                "Nickname Changed",
                format!("{mention}'s nickname has been updated."),
                ColorClass::Info,
                user,
            )
            .with_field("Old Nickname", old_nick.as_deref().unwrap_or(NO_NICKNAME))
            .with_field("New Nickname", new_nick.as_deref().unwrap_or(NO_NICKNAME))
            .with_field("Changed By", changed_by)
        }
        LogEvent::MessageSent {
            channel_id,
            content_snippet,
            ..
        } => {
            let content = if content_snippet.is_empty() {
                NO_CONTENT
            } else {
                content_snippet.as_str()
            };
            NotificationRecord::new(
                "Message Sent",
                format!("{mention} sent a message in {}.", channel_id.mention()),
                ColorClass::Info,
                user,
            )
            .with_field("Message Content", content)
        }
    }
}
