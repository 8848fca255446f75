//! Shared test helpers for routing integration tests.
//!
//! Provides an in-memory settings store and a recording fake [`Gateway`]
//! whose audit trail, channel availability and send outcome can be
//! scripted per test.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use guildlog::gateway::{ChannelHandle, Gateway, GatewayFuture};
use guildlog::models::attribution::{
    AuditActionKind, AuditTrailEntry, DEFAULT_LOOKBACK_LIMIT,
};
use guildlog::models::ids::{ChannelId, GuildId, UserId};
use guildlog::models::notification::NotificationRecord;
use guildlog::persistence::db;
use guildlog::persistence::guild_config_repo::GuildConfigRepo;
use guildlog::router::Router;
use guildlog::AppError;

/// Audit-trail query observed by the fake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditCall {
    pub guild_id: GuildId,
    pub action: AuditActionKind,
    pub limit: u8,
}

/// Recording, scriptable gateway.
#[derive(Default)]
pub struct FakeGateway {
    audit_entries: Mutex<Vec<AuditTrailEntry>>,
    audit_fails: Mutex<bool>,
    audit_delay: Mutex<Option<Duration>>,
    missing_channels: Mutex<HashSet<ChannelId>>,
    send_fails: Mutex<bool>,
    audit_calls: Mutex<Vec<AuditCall>>,
    send_attempts: Mutex<usize>,
    sent: Mutex<Vec<(ChannelId, NotificationRecord)>>,
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Replace the audit trail returned by every query (most recent first).
    pub fn set_audit_entries(&self, entries: Vec<AuditTrailEntry>) {
        *self.audit_entries.lock().unwrap() = entries;
    }

    pub fn fail_audit_queries(&self) {
        *self.audit_fails.lock().unwrap() = true;
    }

    pub fn delay_audit_queries(&self, delay: Duration) {
        *self.audit_delay.lock().unwrap() = Some(delay);
    }

    pub fn remove_channel(&self, channel_id: ChannelId) {
        self.missing_channels.lock().unwrap().insert(channel_id);
    }

    pub fn fail_sends(&self) {
        *self.send_fails.lock().unwrap() = true;
    }

    pub fn audit_calls(&self) -> Vec<AuditCall> {
        self.audit_calls.lock().unwrap().clone()
    }

    pub fn send_attempts(&self) -> usize {
        *self.send_attempts.lock().unwrap()
    }

    pub fn sent(&self) -> Vec<(ChannelId, NotificationRecord)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Gateway for FakeGateway {
    fn query_audit_trail(
        &self,
        guild_id: GuildId,
        action: AuditActionKind,
        limit: u8,
    ) -> GatewayFuture<'_, guildlog::Result<Vec<AuditTrailEntry>>> {
        Box::pin(async move {
            self.audit_calls.lock().unwrap().push(AuditCall {
                guild_id,
                action,
                limit,
            });
            let delay = *self.audit_delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if *self.audit_fails.lock().unwrap() {
                return Err(AppError::Discord("audit log unavailable".into()));
            }
            let entries = self.audit_entries.lock().unwrap().clone();
            Ok(entries.into_iter().take(usize::from(limit)).collect())
        })
    }

    fn resolve_channel(&self, channel_id: ChannelId) -> GatewayFuture<'_, Option<ChannelHandle>> {
        Box::pin(async move {
            if self.missing_channels.lock().unwrap().contains(&channel_id) {
                None
            } else {
                Some(ChannelHandle { id: channel_id })
            }
        })
    }

    fn send_message(
        &self,
        channel: ChannelHandle,
        record: NotificationRecord,
    ) -> GatewayFuture<'_, guildlog::Result<()>> {
        Box::pin(async move {
            *self.send_attempts.lock().unwrap() += 1;
            if *self.send_fails.lock().unwrap() {
                return Err(AppError::Discord("Unknown Channel".into()));
            }
            self.sent.lock().unwrap().push((channel.id, record));
            Ok(())
        })
    }
}

/// Audit entry targeting `target`, performed by `actor`.
pub fn audit_entry(target: u64, actor: u64) -> AuditTrailEntry {
    AuditTrailEntry {
        target_user_id: Some(UserId(target)),
        actor_id: UserId(actor),
        timestamp: Utc::now(),
    }
}

/// Fresh in-memory settings store.
pub async fn test_store() -> GuildConfigRepo {
    let db = db::connect_memory().await.expect("in-memory db");
    GuildConfigRepo::new(Arc::new(db))
}

/// Router over `store` and `gateway` with the default lookback window.
pub fn test_router(store: &GuildConfigRepo, gateway: &Arc<FakeGateway>) -> Arc<Router> {
    let gateway: Arc<dyn Gateway> = gateway.clone();
    Arc::new(Router::new(store.clone(), gateway, DEFAULT_LOOKBACK_LIMIT))
}
