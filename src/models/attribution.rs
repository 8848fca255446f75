//! Audit-trail attribution requests and outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::LogEvent;
use super::ids::{GuildId, UserId};

/// Default number of recent audit entries scanned per query.
pub const DEFAULT_LOOKBACK_LIMIT: u8 = 10;

/// Kind of administrative action recorded in the guild audit trail.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AuditActionKind {
    /// A member was moved between voice channels.
    MemberMove,
    /// A member's profile (nickname, roles) was edited.
    MemberUpdate,
}

/// One audit-trail record as returned by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditTrailEntry {
    /// User the action targeted; absent for target-less actions.
    pub target_user_id: Option<UserId>,
    /// User who performed the action.
    pub actor_id: UserId,
    /// When the action was recorded.
    pub timestamp: DateTime<Utc>,
}

/// Read-only request to attribute an event to an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributionQuery {
    /// Guild whose audit trail is scanned.
    pub guild_id: GuildId,
    /// User the matching entry must target.
    pub target_user_id: UserId,
    /// Audit action kind to filter on.
    pub action: AuditActionKind,
    /// Maximum number of recent entries scanned.
    pub lookback_limit: u8,
}

impl AttributionQuery {
    /// Build the attribution query an event needs, if it needs one.
    ///
    /// Only voice moves and nickname changes are attribution-ambiguous.
    #[must_use]
    pub fn for_event(event: &LogEvent, lookback_limit: u8) -> Option<Self> {
        let action = match event {
            LogEvent::VoiceMoved { .. } => AuditActionKind::MemberMove,
            LogEvent::NicknameChanged { .. } => AuditActionKind::MemberUpdate,
            _ => return None,
        };
        Some(Self {
            guild_id: event.guild_id(),
            target_user_id: event.user_id(),
            action,
            lookback_limit,
        })
    }
}

/// Outcome of an attribution lookup. `NotFound` is a valid terminal outcome.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttributionResult {
    /// An audit entry targeting the user was found.
    Found {
        /// User responsible for the action.
        actor_id: UserId,
    },
    /// No matching entry within the scanned window, or the query failed.
    NotFound,
}

impl AttributionResult {
    /// Responsible actor, if one was found.
    #[must_use]
    pub const fn actor(self) -> Option<UserId> {
        match self {
            Self::Found { actor_id } => Some(actor_id),
            Self::NotFound => None,
        }
    }

    /// Whether an actor was found.
    #[must_use]
    pub const fn is_found(self) -> bool {
        matches!(self, Self::Found { .. })
    }
}
