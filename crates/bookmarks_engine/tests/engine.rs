use std::sync::Arc;
use std::time::Duration;

use bookmarks_engine::{
    BookmarkDraft, EngineCommand, EngineEvent, EngineEvents, EngineHandle, FailureKind,
    InMemoryBookmarkStore, StaticAuthGateway, UserIdentity,
};

const WAIT: Duration = Duration::from_secs(5);

fn next(events: &EngineEvents) -> EngineEvent {
    events.recv_timeout(WAIT).expect("engine event")
}

fn demo_user() -> UserIdentity {
    UserIdentity {
        id: "demo".to_string(),
        email: Some("demo@example.com".to_string()),
    }
}

#[test]
fn resolves_session_from_gateway() {
    bookmarks_logging::initialize_for_tests();
    let store = Arc::new(InMemoryBookmarkStore::new());
    let (engine, events) =
        EngineHandle::spawn(store, Arc::new(StaticAuthGateway::signed_in(demo_user())));

    engine.submit(EngineCommand::ResolveSession);
    assert_eq!(next(&events), EngineEvent::SessionResolved(Some(demo_user())));
}

#[test]
fn insert_then_fetch_round_trip() {
    bookmarks_logging::initialize_for_tests();
    let store = Arc::new(InMemoryBookmarkStore::new());
    let (engine, events) = EngineHandle::spawn(
        store.clone(),
        Arc::new(StaticAuthGateway::signed_in(demo_user())),
    );

    engine.submit(EngineCommand::Insert {
        user_id: "demo".to_string(),
        draft: BookmarkDraft::new("T", "https://t.com"),
    });
    assert_eq!(next(&events), EngineEvent::Inserted { result: Ok(()) });

    engine.submit(EngineCommand::Fetch {
        user_id: "demo".to_string(),
        seq: 4,
    });
    match next(&events) {
        EngineEvent::Fetched {
            user_id,
            seq,
            result,
        } => {
            assert_eq!(user_id, "demo");
            assert_eq!(seq, 4);
            let rows = result.expect("fetch ok");
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].url, "https://t.com");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn subscription_delivers_remote_changes_until_released() {
    bookmarks_logging::initialize_for_tests();
    let store = Arc::new(InMemoryBookmarkStore::new());
    let (engine, events) = EngineHandle::spawn(
        store.clone(),
        Arc::new(StaticAuthGateway::signed_in(demo_user())),
    );

    engine.submit(EngineCommand::Subscribe);
    let subscription = match next(&events) {
        EngineEvent::Subscribed(id) => id,
        other => panic!("unexpected event {other:?}"),
    };

    assert_eq!(store.notify_remote_change(), 1);
    assert_eq!(next(&events), EngineEvent::RemoteChange);

    engine.submit(EngineCommand::Unsubscribe { subscription });
    // Round-trip a command so the unsubscribe is processed first.
    engine.submit(EngineCommand::ResolveSession);
    assert!(matches!(next(&events), EngineEvent::SessionResolved(_)));
    assert_eq!(store.notify_remote_change(), 0);
}

#[test]
fn store_failure_surfaces_as_event() {
    bookmarks_logging::initialize_for_tests();
    let store = Arc::new(InMemoryBookmarkStore::new());
    store.fail_next_call(FailureKind::Timeout);
    let (engine, events) = EngineHandle::spawn(
        store,
        Arc::new(StaticAuthGateway::signed_in(demo_user())),
    );

    engine.submit(EngineCommand::Delete {
        id: "missing".to_string(),
    });
    match next(&events) {
        EngineEvent::Deleted { id, result } => {
            assert_eq!(id, "missing");
            assert_eq!(result.unwrap_err().kind, FailureKind::Timeout);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn sign_out_then_session_is_absent() {
    bookmarks_logging::initialize_for_tests();
    let (engine, events) = EngineHandle::spawn(
        Arc::new(InMemoryBookmarkStore::new()),
        Arc::new(StaticAuthGateway::signed_in(demo_user())),
    );

    engine.submit(EngineCommand::SignOut);
    assert_eq!(next(&events), EngineEvent::SignedOut { result: Ok(()) });
    engine.submit(EngineCommand::ResolveSession);
    assert_eq!(next(&events), EngineEvent::SessionResolved(None));
}
