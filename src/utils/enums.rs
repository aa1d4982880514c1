use crate::store::models::{Message, Snapshot};
use crate::utils::types::MessageId;

use serde::{Deserialize, Serialize};

//Drives the client run loop. One variant per user action on the chat view.
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum ClientCommand {
    SetDisplayName(String),
    BeginCompose,
    TypeText(String),
    BeginEdit(MessageId),
    Submit,
    CancelDraft,
    Delete(MessageId),
    GetMessages,
    Shutdown,
}

//Pushed back to the presentation layer by the run loop.
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum ClientEvent {
    MessagesChanged(Snapshot),
    SendMessages(Snapshot),
    StreamBroken(String),
    ActionFailed(String),
}

//What a live subscription delivers: the complete current document set after
//every change, or a terminal break. Never a diff.
#[derive(Eq, PartialEq, Clone, Debug)]
pub enum StreamEvent {
    Snapshot(Snapshot),
    Broken(String),
}

impl StreamEvent {
    pub fn is_broken(&self) -> bool {
        matches!(self, StreamEvent::Broken(_))
    }
}
