//! Tests for connection registry bookkeeping

use getserver::error::RegistryError;
use getserver::server::events::{ConnectionEvent, EventSink};
use getserver::server::registry::{ConnectionId, ConnectionPhase, Registry};

#[test]
fn test_create_assigns_increasing_ids() {
    let mut registry = Registry::default();

    let (_, a) = registry.create(None);
    let (_, b) = registry.create(None);
    let (_, c) = registry.create(None);

    assert_eq!(a, ConnectionId(1));
    assert!(a < b && b < c);
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_ids_are_never_reused() {
    let mut registry = Registry::default();
    let (token, first) = registry.create(None);
    registry.remove(token).unwrap();

    let (_, second) = registry.create(None);
    assert_ne!(first, second);
}

#[test]
fn test_new_record_starts_accepted() {
    let mut registry = Registry::default();
    let peer = "127.0.0.1:4000".parse().unwrap();
    let (token, id) = registry.create(Some(peer));

    let record = registry.get(token).unwrap();
    assert_eq!(record.id, id);
    assert_eq!(record.peer, Some(peer));
    assert_eq!(record.phase, ConnectionPhase::Accepted);
}

#[test]
fn test_set_phase() {
    let mut registry = Registry::default();
    let (token, _) = registry.create(None);

    registry
        .set_phase(token, ConnectionPhase::Responding { header_sent: true })
        .unwrap();
    assert_eq!(
        registry.get(token).unwrap().phase,
        ConnectionPhase::Responding { header_sent: true }
    );
}

#[test]
fn test_remove_twice_is_rejected() {
    let mut registry = Registry::default();
    let (token, id) = registry.create(None);

    let record = registry.remove(token).unwrap();
    assert_eq!(record.id, id);
    assert!(registry.is_empty());

    assert!(matches!(
        registry.remove(token),
        Err(RegistryError::StaleToken(_))
    ));
    assert!(registry.set_phase(token, ConnectionPhase::Closed).is_err());
}

#[test]
fn test_stale_token_does_not_reach_slot_reuser() {
    let mut registry = Registry::default();
    let (old, _) = registry.create(None);
    registry.remove(old).unwrap();
    let (new, new_id) = registry.create(None);

    assert!(registry.remove(old).is_err());
    assert_eq!(registry.get(new).unwrap().id, new_id);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_records_lists_live_connections() {
    let mut registry = Registry::default();
    let (a, _) = registry.create(None);
    let (_, b) = registry.create(None);
    let (_, c) = registry.create(None);
    registry.remove(a).unwrap();

    let ids: Vec<_> = registry.records().map(|r| r.id).collect();
    assert_eq!(ids, vec![b, c]);
}

#[test]
fn test_registry_publishes_created_and_closed() {
    let events = EventSink::new();
    let mut rx = events.subscribe();
    let mut registry = Registry::new(events);

    let (token, id) = registry.create(None);
    registry.remove(token).unwrap();

    assert_eq!(rx.try_recv().unwrap(), ConnectionEvent::Created { id, peer: None });
    assert_eq!(rx.try_recv().unwrap(), ConnectionEvent::Closed { id });
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_events_without_subscribers_are_dropped() {
    let mut registry = Registry::new(EventSink::new());
    let (token, _) = registry.create(None);
    assert!(registry.remove(token).is_ok());
}
