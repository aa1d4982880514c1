mod utils;

use garrison::core::projector::{order_snapshot, Projector};
use garrison::store::memory::MemoryStore;
use garrison::store::models::Message;
use garrison::utils::logger;
use utils::{next_view, seed_message, WAIT_SECS};

use chrono::{TimeZone, Utc};
use tokio::time::{timeout, Duration};

fn message_at(id: &str, secs: i64) -> Message {
    Message {
        id: id.to_string(),
        author: "Helldiver1".to_string(),
        body: "o7".to_string(),
        created_at: Utc.timestamp_opt(secs, 0).unwrap(),
    }
}

#[test]
fn test_order_snapshot_sorts_by_created_at() {
    let shuffled = vec![
        message_at("m3", 30),
        message_at("m1", 10),
        message_at("m2", 20),
    ];
    let ordered = order_snapshot(shuffled);
    let ids: Vec<&str> = ordered.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["m1", "m2", "m3"]);
}

#[test]
fn test_order_snapshot_keeps_insertion_order_on_ties() {
    //Equal timestamps fall back to store insertion order
    let tied = vec![
        message_at("m1", 10),
        message_at("m2", 10),
        message_at("m0", 5),
    ];
    let ordered = order_snapshot(tied);
    let ids: Vec<&str> = ordered.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["m0", "m1", "m2"]);
}

#[tokio::test]
async fn test_projected_view_orders_live_creates() {
    logger::init_tracing();
    let store = MemoryStore::new();
    let mut projector = Projector::subscribe(&store);
    assert!(next_view(&mut projector).await.is_empty());

    let m1 = seed_message(&store, "Helldiver1", "first").await;
    let m2 = seed_message(&store, "Helldiver2", "second").await;
    let m3 = seed_message(&store, "Helldiver1", "third").await;

    let mut view = next_view(&mut projector).await;
    while view.len() < 3 {
        view = next_view(&mut projector).await;
    }
    let ids: Vec<&str> = view.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec![m1.id.as_str(), m2.id.as_str(), m3.id.as_str()]);
    assert!(view.windows(2).all(|w| w[0].created_at <= w[1].created_at));
}

#[tokio::test]
async fn test_unsubscribe_is_idempotent() {
    logger::init_tracing();
    let store = MemoryStore::new();
    let mut projector = Projector::subscribe(&store);
    let _ = next_view(&mut projector).await;

    projector.unsubscribe();
    projector.unsubscribe();
    assert!(!projector.is_live());

    //No delivery after release
    seed_message(&store, "Helldiver1", "late").await;
    assert!(projector.next_event().await.is_none());
    assert!(projector.next_event().await.is_none());
}

#[tokio::test]
async fn test_broken_stream_is_surfaced() {
    logger::init_tracing();
    let store = MemoryStore::new();
    seed_message(&store, "Helldiver1", "o7").await;

    let mut projector = Projector::subscribe(&store);
    assert_eq!(next_view(&mut projector).await.len(), 1);

    store.sever();
    let event = timeout(Duration::from_secs(WAIT_SECS), projector.next_event())
        .await
        .expect("timed out waiting for the break")
        .expect("stream ended without surfacing the break");
    assert!(event.is_broken());

    //Last view survives, but the break is visible, not silent
    assert_eq!(projector.view().len(), 1);
    assert!(projector.broken_reason().is_some());
    assert!(!projector.is_live());
    assert!(projector.next_event().await.is_none());
}

#[tokio::test]
async fn test_resubscribe_restarts_the_sequence() {
    logger::init_tracing();
    let store = MemoryStore::new();
    let mut projector = Projector::subscribe(&store);
    assert!(next_view(&mut projector).await.is_empty());
    projector.unsubscribe();

    seed_message(&store, "Helldiver1", "while away").await;

    let mut projector = Projector::subscribe(&store);
    assert_eq!(next_view(&mut projector).await.len(), 1);
}
