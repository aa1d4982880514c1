use garrison::core::projector::Projector;
use garrison::store::memory::MemoryStore;
use garrison::store::models::{Message, NewMessage, Snapshot};
use garrison::utils::enums::{ClientEvent, StreamEvent};

use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

pub const WAIT_SECS: u64 = 5;

pub async fn seed_message(store: &MemoryStore, author: &str, body: &str) -> Message {
    store
        .create(NewMessage {
            author: author.to_string(),
            body: body.to_string(),
        })
        .await
        .expect("failed to seed message")
}

//Pumps the projector until the next ordered snapshot arrives.
pub async fn next_view(projector: &mut Projector) -> Snapshot {
    let event = timeout(Duration::from_secs(WAIT_SECS), projector.next_event())
        .await
        .expect("timed out waiting for a snapshot");
    match event {
        Some(StreamEvent::Snapshot(view)) => view,
        other => panic!("expected a snapshot event, got {:?}", other),
    }
}

//Drains run loop events until the next MessagesChanged.
pub async fn next_messages(event_rx: &mut mpsc::Receiver<ClientEvent>) -> Snapshot {
    loop {
        let event = timeout(Duration::from_secs(WAIT_SECS), event_rx.recv())
            .await
            .expect("timed out waiting for an event")
            .expect("event channel closed");
        if let ClientEvent::MessagesChanged(messages) = event {
            return messages;
        }
    }
}

//Drains run loop events until the next ActionFailed.
pub async fn next_failure(event_rx: &mut mpsc::Receiver<ClientEvent>) -> String {
    loop {
        let event = timeout(Duration::from_secs(WAIT_SECS), event_rx.recv())
            .await
            .expect("timed out waiting for an event")
            .expect("event channel closed");
        if let ClientEvent::ActionFailed(reason) = event {
            return reason;
        }
    }
}
