//! Platform-agnostic gateway abstraction.
//!
//! The [`Gateway`] trait is the only surface through which the routing
//! core talks to the chat platform: audit-trail queries, channel
//! resolution, and outbound sends. The Discord implementation lives in
//! [`crate::discord::client`]; tests substitute a recording fake.

use std::future::Future;
use std::pin::Pin;

use crate::models::attribution::{AuditActionKind, AuditTrailEntry};
use crate::models::ids::{ChannelId, GuildId};
use crate::models::notification::NotificationRecord;
use crate::Result;

/// Boxed future returned by gateway calls.
pub type GatewayFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A live, reachable channel resolved by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelHandle {
    /// Resolved channel identifier.
    pub id: ChannelId,
}

/// Outbound interface to the chat platform.
pub trait Gateway: Send + Sync {
    /// Fetch up to `limit` most recent audit entries of `action`, most
    /// recent first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Discord`](crate::AppError::Discord) on transport
    /// or permission failures.
    fn query_audit_trail(
        &self,
        guild_id: GuildId,
        action: AuditActionKind,
        limit: u8,
    ) -> GatewayFuture<'_, Result<Vec<AuditTrailEntry>>>;

    /// Resolve a channel id to a live handle. Deleted or inaccessible
    /// channels resolve to `None`.
    fn resolve_channel(&self, channel_id: ChannelId) -> GatewayFuture<'_, Option<ChannelHandle>>;

    /// Post `record` into `channel` exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Discord`](crate::AppError::Discord) if the send
    /// is rejected or the transport fails.
    fn send_message(
        &self,
        channel: ChannelHandle,
        record: NotificationRecord,
    ) -> GatewayFuture<'_, Result<()>>;
}
