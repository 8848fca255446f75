//! End-to-end routing scenarios through `Router::handle` against an
//! in-memory store and the recording fake gateway.

use guildlog::models::attribution::AuditActionKind;
use guildlog::models::destination::Destination;
use guildlog::models::event::PlatformEvent;
use guildlog::models::ids::{ChannelId, GuildId, UserId};
use guildlog::models::notification::ColorClass;

use super::test_helpers::{audit_entry, test_router, test_store, FakeGateway};

const GUILD: GuildId = GuildId(100);
const LOGS: ChannelId = ChannelId(900);
const USER: u64 = 42;
const MOD: u64 = 7;

fn voice_move(user: u64, from: u64, to: u64) -> PlatformEvent {
    PlatformEvent::VoiceStateChange {
        guild_id: GUILD,
        user_id: UserId(user),
        previous_channel: Some(ChannelId(from)),
        new_channel: Some(ChannelId(to)),
    }
}

fn nick_change(old: Option<&str>, new: Option<&str>) -> PlatformEvent {
    PlatformEvent::MemberProfileUpdate {
        guild_id: GUILD,
        user_id: UserId(USER),
        previous_nick: old.map(str::to_owned),
        new_nick: new.map(str::to_owned),
    }
}

// ─── Voice move attribution ──────────────────────────────────────────

#[tokio::test]
async fn voice_move_attributed_to_moderator_from_audit_trail() {
    let store = test_store().await;
    store
        .set_channel(GUILD, Destination::Voice, LOGS)
        .await
        .unwrap();
    let gateway = FakeGateway::new();
    gateway.set_audit_entries(vec![audit_entry(5, 9), audit_entry(USER, MOD)]);
    let router = test_router(&store, &gateway);

    router.handle(voice_move(USER, 1, 2)).await;

    let sent = gateway.sent();
    assert_eq!(sent.len(), 1);
    let (channel, record) = &sent[0];
    assert_eq!(*channel, LOGS);
    assert_eq!(record.title, "Voice Channel Moved");
    assert_eq!(record.color, ColorClass::Info);
    assert_eq!(
        record.description,
        "<@42> was moved from <#1> to <#2> by <@7>."
    );

    let calls = gateway.audit_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].action, AuditActionKind::MemberMove);
    assert_eq!(calls[0].limit, 10);
    assert_eq!(calls[0].guild_id, GUILD);
}

#[tokio::test]
async fn voice_move_without_audit_match_names_the_moved_user() {
    let store = test_store().await;
    store
        .set_channel(GUILD, Destination::Voice, LOGS)
        .await
        .unwrap();
    let gateway = FakeGateway::new();
    gateway.set_audit_entries(vec![audit_entry(5, MOD)]);
    let router = test_router(&store, &gateway);

    router.handle(voice_move(USER, 1, 2)).await;

    let sent = gateway.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].1.description,
        "<@42> was dragged from <#1> to <#2> by <@42>."
    );
}

#[tokio::test]
async fn voice_move_audit_failure_still_notifies() {
    let store = test_store().await;
    store
        .set_channel(GUILD, Destination::Voice, LOGS)
        .await
        .unwrap();
    let gateway = FakeGateway::new();
    gateway.fail_audit_queries();
    let router = test_router(&store, &gateway);

    router.handle(voice_move(USER, 1, 2)).await;

    let sent = gateway.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].1.description.ends_with("by <@42>."));
}

#[tokio::test]
async fn match_beyond_lookback_window_is_ignored() {
    let store = test_store().await;
    store
        .set_channel(GUILD, Destination::Voice, LOGS)
        .await
        .unwrap();
    let gateway = FakeGateway::new();
    let mut entries: Vec<_> = (0..10).map(|i| audit_entry(1000 + i, MOD)).collect();
    entries.push(audit_entry(USER, MOD));
    gateway.set_audit_entries(entries);
    let router = test_router(&store, &gateway);

    router.handle(voice_move(USER, 1, 2)).await;

    assert!(gateway.sent()[0].1.description.contains("dragged"));
}

// ─── Nickname attribution ────────────────────────────────────────────

#[tokio::test]
async fn nickname_change_shows_old_new_and_actor() {
    let store = test_store().await;
    store
        .set_channel(GUILD, Destination::Nickname, LOGS)
        .await
        .unwrap();
    let gateway = FakeGateway::new();
    gateway.set_audit_entries(vec![audit_entry(USER, 3)]);
    let router = test_router(&store, &gateway);

    router.handle(nick_change(Some("Alex"), Some("Lex"))).await;

    let sent = gateway.sent();
    assert_eq!(sent.len(), 1);
    let record = &sent[0].1;
    assert_eq!(record.title, "Nickname Changed");
    assert_eq!(record.field("Old Nickname"), Some("Alex"));
    assert_eq!(record.field("New Nickname"), Some("Lex"));
    assert_eq!(record.field("Changed By"), Some("<@3>"));
    assert_eq!(
        gateway.audit_calls()[0].action,
        AuditActionKind::MemberUpdate
    );
}

#[tokio::test]
async fn nickname_change_without_match_is_unknown() {
    let store = test_store().await;
    store
        .set_channel(GUILD, Destination::Nickname, LOGS)
        .await
        .unwrap();
    let gateway = FakeGateway::new();
    let router = test_router(&store, &gateway);

    router.handle(nick_change(None, Some("Lex"))).await;

    let record = &gateway.sent()[0].1;
    assert_eq!(record.field("Old Nickname"), Some("None"));
    assert_eq!(record.field("Changed By"), Some("Unknown"));
}

#[tokio::test]
async fn unconfigured_nickname_destination_sends_nothing() {
    let store = test_store().await;
    store
        .set_channel(GUILD, Destination::Voice, LOGS)
        .await
        .unwrap();
    let gateway = FakeGateway::new();
    gateway.set_audit_entries(vec![audit_entry(USER, 3)]);
    let router = test_router(&store, &gateway);

    router.handle(nick_change(Some("Alex"), Some("Lex"))).await;

    assert_eq!(gateway.send_attempts(), 0);
    assert!(
        gateway.audit_calls().is_empty(),
        "no audit query for an unconfigured destination"
    );
}

// ─── Non-attributed events ───────────────────────────────────────────

#[tokio::test]
async fn member_join_and_leave_route_to_member_destination() {
    let store = test_store().await;
    store
        .set_channel(GUILD, Destination::Member, LOGS)
        .await
        .unwrap();
    let gateway = FakeGateway::new();
    let router = test_router(&store, &gateway);

    router
        .handle(PlatformEvent::MemberJoin {
            guild_id: GUILD,
            user_id: UserId(USER),
        })
        .await;
    router
        .handle(PlatformEvent::MemberLeave {
            guild_id: GUILD,
            user_id: UserId(USER),
        })
        .await;

    let sent = gateway.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].1.title, "Member Joined");
    assert_eq!(sent[0].1.color, ColorClass::Success);
    assert_eq!(sent[1].1.title, "Member Left");
    assert_eq!(sent[1].1.color, ColorClass::Danger);
    assert!(gateway.audit_calls().is_empty());
}

#[tokio::test]
async fn self_authored_message_is_never_dispatched() {
    let store = test_store().await;
    store
        .set_channel(GUILD, Destination::Message, LOGS)
        .await
        .unwrap();
    let gateway = FakeGateway::new();
    let router = test_router(&store, &gateway);

    router
        .handle(PlatformEvent::MessageCreate {
            guild_id: GUILD,
            user_id: UserId(1),
            channel_id: LOGS,
            content: "Member Joined".into(),
            is_self: true,
        })
        .await;

    assert_eq!(gateway.send_attempts(), 0);
}

#[tokio::test]
async fn message_is_logged_with_content_field() {
    let store = test_store().await;
    store
        .set_channel(GUILD, Destination::Message, LOGS)
        .await
        .unwrap();
    let gateway = FakeGateway::new();
    let router = test_router(&store, &gateway);

    router
        .handle(PlatformEvent::MessageCreate {
            guild_id: GUILD,
            user_id: UserId(USER),
            channel_id: ChannelId(55),
            content: "hello there".into(),
            is_self: false,
        })
        .await;

    let record = &gateway.sent()[0].1;
    assert_eq!(record.description, "<@42> sent a message in <#55>.");
    assert_eq!(record.field("Message Content"), Some("hello there"));
}

#[tokio::test]
async fn destinations_are_isolated_per_guild() {
    let store = test_store().await;
    store
        .set_channel(GuildId(1), Destination::Member, ChannelId(11))
        .await
        .unwrap();
    store
        .set_channel(GuildId(2), Destination::Member, ChannelId(22))
        .await
        .unwrap();
    let gateway = FakeGateway::new();
    let router = test_router(&store, &gateway);

    for guild in [1, 2, 3] {
        router
            .handle(PlatformEvent::MemberJoin {
                guild_id: GuildId(guild),
                user_id: UserId(USER),
            })
            .await;
    }

    let channels: Vec<ChannelId> = gateway.sent().iter().map(|(c, _)| *c).collect();
    assert_eq!(channels, vec![ChannelId(11), ChannelId(22)]);
}
