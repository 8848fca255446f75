//! Best-effort notification delivery.
//!
//! Resolves the configured destination channel for a guild and posts the
//! record once. Unconfigured destinations and deleted channels are silent
//! no-ops; send failures are logged and dropped. Nothing is retried or
//! queued.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::gateway::Gateway;
use crate::models::destination::Destination;
use crate::models::ids::{ChannelId, GuildId};
use crate::models::notification::NotificationRecord;
use crate::persistence::guild_config_repo::GuildConfigRepo;

/// Delivers notification records to per-guild destination channels.
#[derive(Clone)]
pub struct Dispatcher {
    store: GuildConfigRepo,
    gateway: Arc<dyn Gateway>,
}

impl Dispatcher {
    /// Create a dispatcher over the given store and gateway.
    #[must_use]
    pub fn new(store: GuildConfigRepo, gateway: Arc<dyn Gateway>) -> Self {
        Self { store, gateway }
    }

    /// Channel configured for `destination`, treating lookup failures as
    /// unconfigured.
    pub async fn destination_channel(
        &self,
        guild_id: GuildId,
        destination: Destination,
    ) -> Option<ChannelId> {
        match self.store.get_channel(guild_id, destination).await {
            Ok(channel) => channel,
            Err(err) => {
                warn!(
                    %guild_id,
                    %destination,
                    %err,
                    "destination lookup failed; skipping notification"
                );
                None
            }
        }
    }

    /// Post `record` to the channel configured for `destination`.
    ///
    /// Makes at most one send call. Every failure is absorbed here.
    pub async fn dispatch(
        &self,
        guild_id: GuildId,
        destination: Destination,
        record: NotificationRecord,
    ) {
        let Some(channel_id) = self.destination_channel(guild_id, destination).await else {
            debug!(%guild_id, %destination, "destination not configured");
            return;
        };
        self.deliver(guild_id, destination, channel_id, record).await;
    }

    /// Post `record` to an already-resolved destination channel.
    ///
    /// Same delivery rules as [`Self::dispatch`] without the settings
    /// lookup; the router uses it after its own destination check.
    pub async fn deliver(
        &self,
        guild_id: GuildId,
        destination: Destination,
        channel_id: ChannelId,
        record: NotificationRecord,
    ) {
        let Some(channel) = self.gateway.resolve_channel(channel_id).await else {
            debug!(
                %guild_id,
                %destination,
                %channel_id,
                "destination channel unavailable; dropping notification"
            );
            return;
        };

        match self.gateway.send_message(channel, record).await {
            Ok(()) => {
                info!(%guild_id, %destination, %channel_id, "notification sent");
            }
            Err(err) => {
                warn!(
                    %guild_id,
                    %destination,
                    %channel_id,
                    %err,
                    "notification send failed; dropped"
                );
            }
        }
    }
}
