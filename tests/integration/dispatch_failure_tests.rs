//! Best-effort delivery: stale channels and failed sends are absorbed.

use std::sync::Arc;

use guildlog::gateway::Gateway;
use guildlog::models::destination::Destination;
use guildlog::models::event::PlatformEvent;
use guildlog::models::ids::{ChannelId, GuildId, UserId};
use guildlog::models::notification::{ColorClass, NotificationRecord};
use guildlog::router::dispatcher::Dispatcher;

use super::test_helpers::{test_router, test_store, FakeGateway};

const GUILD: GuildId = GuildId(100);
const LOGS: ChannelId = ChannelId(900);

fn record() -> NotificationRecord {
    NotificationRecord::new(
        "Member Joined",
        "<@1> joined the server.",
        ColorClass::Success,
        UserId(1),
    )
}

#[tokio::test]
async fn dispatch_to_unconfigured_destination_is_noop() {
    let store = test_store().await;
    let gateway = FakeGateway::new();
    let dyn_gateway: Arc<dyn Gateway> = gateway.clone();
    let dispatcher = Dispatcher::new(store, dyn_gateway);

    dispatcher.dispatch(GUILD, Destination::Member, record()).await;

    assert_eq!(gateway.send_attempts(), 0);
}

#[tokio::test]
async fn dispatch_to_deleted_channel_is_noop() {
    let store = test_store().await;
    store
        .set_channel(GUILD, Destination::Member, LOGS)
        .await
        .unwrap();
    let gateway = FakeGateway::new();
    gateway.remove_channel(LOGS);
    let dyn_gateway: Arc<dyn Gateway> = gateway.clone();
    let dispatcher = Dispatcher::new(store, dyn_gateway);

    dispatcher.dispatch(GUILD, Destination::Member, record()).await;

    assert_eq!(gateway.send_attempts(), 0);
}

#[tokio::test]
async fn dispatch_sends_exactly_once() {
    let store = test_store().await;
    store
        .set_channel(GUILD, Destination::Member, LOGS)
        .await
        .unwrap();
    let gateway = FakeGateway::new();
    let dyn_gateway: Arc<dyn Gateway> = gateway.clone();
    let dispatcher = Dispatcher::new(store, dyn_gateway);

    dispatcher.dispatch(GUILD, Destination::Member, record()).await;

    assert_eq!(gateway.send_attempts(), 1);
    assert_eq!(gateway.sent()[0].0, LOGS);
}

#[tokio::test]
async fn failed_send_is_attempted_once_and_swallowed() {
    let store = test_store().await;
    store
        .set_channel(GUILD, Destination::Member, LOGS)
        .await
        .unwrap();
    let gateway = FakeGateway::new();
    gateway.fail_sends();
    let router = test_router(&store, &gateway);

    // Completes without panicking; the failure is only logged.
    router
        .spawn(PlatformEvent::MemberJoin {
            guild_id: GUILD,
            user_id: UserId(1),
        })
        .await
        .unwrap();

    assert_eq!(gateway.send_attempts(), 1, "no retry after a failed send");
    assert!(gateway.sent().is_empty());
}

#[tokio::test]
async fn failed_send_does_not_affect_other_guilds() {
    let store = test_store().await;
    store
        .set_channel(GuildId(1), Destination::Member, LOGS)
        .await
        .unwrap();
    store
        .set_channel(GuildId(2), Destination::Member, ChannelId(901))
        .await
        .unwrap();
    let gateway = FakeGateway::new();
    gateway.remove_channel(LOGS);
    let router = test_router(&store, &gateway);

    let first = router.spawn(PlatformEvent::MemberJoin {
        guild_id: GuildId(1),
        user_id: UserId(1),
    });
    let second = router.spawn(PlatformEvent::MemberJoin {
        guild_id: GuildId(2),
        user_id: UserId(2),
    });
    first.await.unwrap();
    second.await.unwrap();

    let sent = gateway.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, ChannelId(901));
}

#[tokio::test]
async fn deliver_uses_the_resolved_channel_without_a_settings_lookup() {
    // Nothing configured: a second settings read would drop the record.
    let store = test_store().await;
    let gateway = FakeGateway::new();
    let dyn_gateway: Arc<dyn Gateway> = gateway.clone();
    let dispatcher = Dispatcher::new(store, dyn_gateway);

    dispatcher
        .deliver(GUILD, Destination::Member, LOGS, record())
        .await;

    assert_eq!(gateway.send_attempts(), 1);
    assert_eq!(gateway.sent()[0].0, LOGS);
}

#[tokio::test]
async fn deliver_to_deleted_channel_is_noop() {
    let store = test_store().await;
    let gateway = FakeGateway::new();
    gateway.remove_channel(LOGS);
    let dyn_gateway: Arc<dyn Gateway> = gateway.clone();
    let dispatcher = Dispatcher::new(store, dyn_gateway);

    dispatcher
        .deliver(GUILD, Destination::Member, LOGS, record())
        .await;

    assert_eq!(gateway.send_attempts(), 0);
}
