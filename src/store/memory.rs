use crate::store::models::{Message, MessagePatch, NewMessage, Snapshot};
use crate::utils::constants::SNAPSHOT_BUFFER;
use crate::utils::enums::StreamEvent;
use crate::utils::errors::ChatError;
use crate::utils::types::MessageId;

use chrono::Utc;
use futures::StreamExt;
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

use std::sync::Arc;

#[derive(Debug)]
struct StoreState {
    //Insertion order is the tie-break for equal timestamps, so documents
    //are patched in place and never reordered here.
    documents: Snapshot,
    next_id: u64,
    offline: bool,
}

impl StoreState {
    fn check_online(&self) -> Result<(), ChatError> {
        if self.offline {
            return Err(ChatError::StoreUnavailable("store is offline".to_string()));
        }
        Ok(())
    }
}

//In-process stand-in for the hosted realtime document store. Same contract:
//create/update/delete plus live subscriptions that push the full document
//set after every change. Cloning shares the underlying collection.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
    changes: broadcast::Sender<StreamEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(SNAPSHOT_BUFFER);
        MemoryStore {
            state: Arc::new(Mutex::new(StoreState {
                documents: Vec::new(),
                next_id: 1,
                offline: false,
            })),
            changes,
        }
    }

    pub async fn create(&self, new: NewMessage) -> Result<Message, ChatError> {
        let mut state = self.state.lock().await;
        state.check_online()?;
        let message = Message {
            id: format!("msg-{:08}", state.next_id),
            author: new.author,
            body: new.body,
            created_at: Utc::now(),
        };
        state.next_id += 1;
        state.documents.push(message.clone());
        debug!("created {}", message.id);
        self.publish(&state);
        Ok(message)
    }

    pub async fn update_by_id(
        &self,
        id: &MessageId,
        patch: MessagePatch,
    ) -> Result<Message, ChatError> {
        let mut state = self.state.lock().await;
        state.check_online()?;
        let document = state
            .documents
            .iter_mut()
            .find(|m| m.id == *id)
            .ok_or_else(|| ChatError::MessageNotFound(id.clone()))?;
        document.body = patch.body;
        let updated = document.clone();
        debug!("updated {}", updated.id);
        self.publish(&state);
        Ok(updated)
    }

    pub async fn delete_by_id(&self, id: &MessageId) -> Result<(), ChatError> {
        let mut state = self.state.lock().await;
        state.check_online()?;
        let position = state
            .documents
            .iter()
            .position(|m| m.id == *id)
            .ok_or_else(|| ChatError::MessageNotFound(id.clone()))?;
        state.documents.remove(position);
        debug!("deleted {}", id);
        self.publish(&state);
        Ok(())
    }

    //Current document set without a subscription; mostly for tests.
    pub async fn snapshot(&self) -> Snapshot {
        self.state.lock().await.documents.clone()
    }

    //Opens a live query: the full current set is delivered immediately, then
    //again after every change, until the handle is dropped or the stream
    //breaks.
    pub fn subscribe(&self) -> Subscription {
        let changes = self.changes.subscribe();
        let state = Arc::clone(&self.state);
        let (tx, rx) = mpsc::channel(SNAPSHOT_BUFFER);
        let task = tokio::spawn(forward_snapshots(state, changes, tx));
        info!("opened live subscription");
        Subscription {
            events: ReceiverStream::new(rx),
            task,
        }
    }

    //Fault hook: while offline every create/update/delete fails.
    pub async fn set_offline(&self, offline: bool) {
        self.state.lock().await.offline = offline;
        info!("store offline: {}", offline);
    }

    //Fault hook: drops the realtime connection. Every live subscription
    //sees a terminal break; the document set itself is untouched.
    pub fn sever(&self) {
        let _ = self
            .changes
            .send(StreamEvent::Broken("connection severed".to_string()));
    }

    fn publish(&self, state: &StoreState) {
        //No subscribers is fine, snapshots are fan-out best effort
        let _ = self
            .changes
            .send(StreamEvent::Snapshot(state.documents.clone()));
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

async fn forward_snapshots(
    state: Arc<Mutex<StoreState>>,
    mut changes: broadcast::Receiver<StreamEvent>,
    tx: mpsc::Sender<StreamEvent>,
) {
    //Live queries deliver the current set up front, then once per change.
    let initial = { state.lock().await.documents.clone() };
    if tx.send(StreamEvent::Snapshot(initial)).await.is_err() {
        return;
    }
    loop {
        match changes.recv().await {
            Ok(event) => {
                let broken = event.is_broken();
                if tx.send(event).await.is_err() {
                    break;
                }
                if broken {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                //A subscriber that cannot keep up is broken, not frozen.
                warn!("subscription lagged by {} snapshots", skipped);
                let _ = tx
                    .send(StreamEvent::Broken("subscription fell behind".to_string()))
                    .await;
                break;
            }
            Err(broadcast::error::RecvError::Closed) => {
                let _ = tx
                    .send(StreamEvent::Broken("store shut down".to_string()))
                    .await;
                break;
            }
        }
    }
}

//Handle on a live query. Dropping it releases the connection.
#[derive(Debug)]
pub struct Subscription {
    events: ReceiverStream<StreamEvent>,
    task: JoinHandle<()>,
}

impl Subscription {
    //Next delivery, None once the stream has ended.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        self.events.next().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
