use crate::store::memory::{MemoryStore, Subscription};
use crate::store::models::{Message, Snapshot};
use crate::utils::enums::StreamEvent;

use tracing::{info, warn};

//Derives a stable ordered view from successive store snapshots. The view is
//replaced wholesale on every delivery; there is no incremental patching.
#[derive(Debug)]
pub struct Projector {
    subscription: Option<Subscription>,
    view: Snapshot,
    broken: Option<String>,
}

impl Projector {
    pub fn subscribe(store: &MemoryStore) -> Self {
        Projector {
            subscription: Some(store.subscribe()),
            view: Vec::new(),
            broken: None,
        }
    }

    //Pumps one delivery from the live stream and re-derives the view.
    //Returns None once unsubscribed or after the stream has ended;
    //subscribing again restarts the sequence.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        let subscription = self.subscription.as_mut()?;
        match subscription.next_event().await {
            Some(StreamEvent::Snapshot(documents)) => {
                self.view = order_snapshot(documents);
                Some(StreamEvent::Snapshot(self.view.clone()))
            }
            Some(StreamEvent::Broken(reason)) => {
                warn!("live stream broke: {}", reason);
                self.broken = Some(reason.clone());
                self.unsubscribe();
                Some(StreamEvent::Broken(reason))
            }
            None => {
                self.unsubscribe();
                None
            }
        }
    }

    //Latest ordered snapshot. Still readable after a break, but the break
    //itself is surfaced through broken_reason, never swallowed.
    pub fn view(&self) -> &[Message] {
        &self.view
    }

    pub fn broken_reason(&self) -> Option<&str> {
        self.broken.as_deref()
    }

    pub fn is_live(&self) -> bool {
        self.subscription.is_some()
    }

    //Releases the live connection. Idempotent.
    pub fn unsubscribe(&mut self) {
        if self.subscription.take().is_some() {
            info!("released live subscription");
        }
    }
}

//Full re-derivation on every snapshot: stable sort by creation time, so
//equal timestamps keep the store's insertion order.
pub fn order_snapshot(mut documents: Snapshot) -> Snapshot {
    documents.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    documents
}
