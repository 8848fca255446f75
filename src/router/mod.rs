//! Event routing pipeline.
//!
//! Each inbound [`PlatformEvent`] runs independently through
//! classify → correlate (when ambiguous) → render → dispatch. The only
//! state shared between events is the guild configuration store.

pub mod classifier;
pub mod correlator;
pub mod dispatcher;
pub mod render;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use crate::gateway::Gateway;
use crate::models::attribution::{AttributionQuery, AttributionResult};
use crate::models::event::PlatformEvent;
use crate::persistence::guild_config_repo::GuildConfigRepo;

use self::correlator::{Correlator, RecentAuditCorrelator};
use self::dispatcher::Dispatcher;

/// Composition root wiring classifier, correlator and dispatcher.
pub struct Router {
    dispatcher: Dispatcher,
    correlator: Arc<dyn Correlator>,
    lookback_limit: u8,
}

impl Router {
    /// Build a router using the recent-audit first-match correlator.
    #[must_use]
    pub fn new(store: GuildConfigRepo, gateway: Arc<dyn Gateway>, lookback_limit: u8) -> Self {
        let correlator = Arc::new(RecentAuditCorrelator::new(Arc::clone(&gateway)));
        Self::with_correlator(store, gateway, correlator, lookback_limit)
    }

    /// Build a router with a custom attribution strategy.
    #[must_use]
    pub fn with_correlator(
        store: GuildConfigRepo,
        gateway: Arc<dyn Gateway>,
        correlator: Arc<dyn Correlator>,
        lookback_limit: u8,
    ) -> Self {
        Self {
            dispatcher: Dispatcher::new(store, gateway),
            correlator,
            lookback_limit,
        }
    }

    /// Route one event to completion. Never fails; every error is logged
    /// and absorbed inside the pipeline.
    pub async fn handle(&self, event: PlatformEvent) {
        let span = info_span!("route_event", event_id = %Uuid::new_v4(), kind = event.kind());
        self.route(event).instrument(span).await;
    }

    /// Route `event` on its own task so it cannot delay or fail other
    /// events.
    pub fn spawn(self: &Arc<Self>, event: PlatformEvent) -> JoinHandle<()> {
        let router = Arc::clone(self);
        tokio::spawn(async move { router.handle(event).await })
    }

    async fn route(&self, event: PlatformEvent) {
        let Some(log_event) = classifier::classify(&event) else {
            debug!("event produced no log entry");
            return;
        };

        let guild_id = log_event.guild_id();
        let destination = log_event.category().destination();

        // Skip the audit query entirely for guilds that would drop the result.
        let Some(channel_id) = self
            .dispatcher
            .destination_channel(guild_id, destination)
            .await
        else {
            debug!(%guild_id, %destination, "destination not configured");
            return;
        };

        let attribution = match AttributionQuery::for_event(&log_event, self.lookback_limit) {
            Some(query) => self.correlator.correlate(query).await,
            None => AttributionResult::NotFound,
        };

        let record = render::render(&log_event, attribution);
        self.dispatcher
            .deliver(guild_id, destination, channel_id, record)
            .await;
    }
}
