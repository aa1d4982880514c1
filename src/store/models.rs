use crate::utils::types::{MessageId, Timestamp};

use serde::{Deserialize, Serialize};

//A chat document as the store holds it. Only `body` ever changes after
//creation; `created_at` is the sole sort key for the projected view.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub author: String,
    pub body: String,
    pub created_at: Timestamp,
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}> {}", self.author, self.body)
    }
}

//Fields the client supplies on create. Id and timestamp are store-assigned.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub author: String,
    pub body: String,
}

//Body is the only field an edit may touch.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct MessagePatch {
    pub body: String,
}

//Complete document set as delivered by a live subscription, in store
//insertion order. Ordering by timestamp is the projector's job.
pub type Snapshot = Vec<Message>;
