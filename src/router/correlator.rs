//! Audit-trail attribution for ambiguous events.
//!
//! Voice moves and nickname changes can be performed by the member or by a
//! moderator, and the gateway event does not say which. The [`Correlator`]
//! trait resolves an actor from the guild audit trail; callers depend only
//! on the trait so the matching heuristic can be replaced.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::gateway::{Gateway, GatewayFuture};
use crate::models::attribution::{AttributionQuery, AttributionResult, AuditTrailEntry};

/// Attributes an event to the actor responsible for it.
pub trait Correlator: Send + Sync {
    /// Resolve the actor for `query`. Never fails: lookup errors resolve to
    /// [`AttributionResult::NotFound`].
    fn correlate(&self, query: AttributionQuery) -> GatewayFuture<'_, AttributionResult>;
}

/// First-match correlator over the most recent audit entries.
///
/// Scans up to `lookback_limit` entries of the relevant action kind in the
/// platform's native most-recent-first order and attributes the first one
/// targeting the user. The window is bounded by count, not time, so a
/// stale entry for the same user can win.
#[derive(Clone)]
pub struct RecentAuditCorrelator {
    gateway: Arc<dyn Gateway>,
}

impl RecentAuditCorrelator {
    /// Create a correlator backed by `gateway`.
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    async fn lookup(&self, query: AttributionQuery) -> AttributionResult {
        let entries = match self
            .gateway
            .query_audit_trail(query.guild_id, query.action, query.lookback_limit)
            .await
        {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    guild_id = %query.guild_id,
                    user_id = %query.target_user_id,
                    action = ?query.action,
                    %err,
                    "audit trail query failed; attributing as unknown"
                );
                return AttributionResult::NotFound;
            }
        };

        let result = first_match(&entries, query);
        debug!(
            guild_id = %query.guild_id,
            user_id = %query.target_user_id,
            scanned = entries.len(),
            found = result.is_found(),
            "audit trail correlated"
        );
        result
    }
}

impl Correlator for RecentAuditCorrelator {
    fn correlate(&self, query: AttributionQuery) -> GatewayFuture<'_, AttributionResult> {
        Box::pin(self.lookup(query))
    }
}

/// First entry, in the given order and within the lookback window, whose
/// target is the queried user.
#[must_use]
pub fn first_match(entries: &[AuditTrailEntry], query: AttributionQuery) -> AttributionResult {
    entries
        .iter()
        .take(usize::from(query.lookback_limit))
        .find(|entry| entry.target_user_id == Some(query.target_user_id))
        .map_or(AttributionResult::NotFound, |entry| AttributionResult::Found {
            actor_id: entry.actor_id,
        })
}
