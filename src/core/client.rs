use crate::core::composer::{Composer, Submission};
use crate::core::projector::Projector;
use crate::store::memory::MemoryStore;
use crate::store::models::{Message, MessagePatch, NewMessage, Snapshot};
use crate::utils::constants::DEFAULT_DISPLAY_NAME;
use crate::utils::enums::{ClientCommand, ClientEvent, StreamEvent};
use crate::utils::errors::ChatError;
use crate::utils::types::MessageId;

use anyhow::Result;
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info};

use std::sync::Arc;

//One chat session: the injected store handle, the display name the user
//picked, the draft state machine, and a mirror of the latest projected view
//for authorship lookups. The store handle is passed in, never ambient.
#[derive(Debug)]
pub struct Client {
    store: MemoryStore,
    display_name: String,
    composer: Composer,
    view: Snapshot,
}

impl Client {
    pub fn new(store: MemoryStore) -> Self {
        Client {
            store,
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            composer: Composer::new(),
            view: Vec::new(),
        }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    //Replaceable at any time; an empty replacement is ignored rather than
    //clearing the name.
    pub fn set_display_name(&mut self, name: &str) {
        let trimmed = name.trim();
        if !trimmed.is_empty() {
            self.display_name = trimmed.to_string();
        }
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn begin_compose(&mut self) {
        self.composer.begin_compose();
    }

    pub fn type_text(&mut self, text: &str) {
        self.composer.type_text(text);
    }

    pub fn begin_edit(&mut self, id: &MessageId) -> Result<(), ChatError> {
        let message = self.find_message(id)?.clone();
        self.composer.begin_edit(&message, &self.display_name)
    }

    pub fn cancel(&mut self) {
        self.composer.cancel();
    }

    //Drains the composer and issues the store call. A failed call puts the
    //draft back intact so the user can retry; validation failures never
    //reach the store at all.
    pub async fn submit(&mut self) -> Result<Message, ChatError> {
        let submission = self.composer.submit()?;
        let result = match submission.clone() {
            Submission::Create { body } => {
                let new = NewMessage {
                    author: self.display_name.clone(),
                    body,
                };
                self.store.create(new).await
            }
            Submission::Update { id, body } => {
                self.store.update_by_id(&id, MessagePatch { body }).await
            }
        };
        match result {
            Ok(message) => {
                info!("submitted message {}", message.id);
                Ok(message)
            }
            Err(e) => {
                error!("submit failed: {}", e);
                self.composer.restore(submission);
                Err(e)
            }
        }
    }

    //Fire-and-forget delete with the same own-message guard as editing.
    //Confirmation, if any, is the presentation layer's business.
    pub async fn delete(&mut self, id: &MessageId) -> Result<(), ChatError> {
        let message = self.find_message(id)?;
        if message.author != self.display_name {
            return Err(ChatError::UnauthorizedEdit);
        }
        self.store.delete_by_id(id).await
    }

    pub fn view(&self) -> &[Message] {
        &self.view
    }

    //The stream pump publishes each projected view here.
    pub fn set_view(&mut self, view: Snapshot) {
        self.view = view;
    }

    fn find_message(&self, id: &MessageId) -> Result<&Message, ChatError> {
        self.view
            .iter()
            .find(|m| m.id == *id)
            .ok_or_else(|| ChatError::MessageNotFound(id.clone()))
    }
}

//Main runtime loop of a chat session. Commands drive the client; a spawned
//pump keeps projected views flowing out as events. Held for the lifetime of
//the chat view, the subscription is released on every exit path.
pub async fn run(
    client: Client,
    mut rx: mpsc::Receiver<ClientCommand>,
    event_tx: mpsc::Sender<ClientEvent>,
) -> Result<()> {
    info!("Client is running...");
    let projector = Projector::subscribe(client.store());
    let client = Arc::new(Mutex::new(client));
    let pump = tokio::spawn(run_stream(
        Arc::clone(&client),
        projector,
        event_tx.clone(),
    ));

    while let Some(command) = rx.recv().await {
        match command {
            ClientCommand::SetDisplayName(name) => {
                let mut client = client.lock().await;
                client.set_display_name(&name);
                info!("display name is now {}", client.display_name());
            }
            ClientCommand::BeginCompose => {
                client.lock().await.begin_compose();
            }
            ClientCommand::TypeText(text) => {
                client.lock().await.type_text(&text);
            }
            ClientCommand::BeginEdit(id) => {
                let mut client = client.lock().await;
                if let Err(e) = client.begin_edit(&id) {
                    error!("cannot edit {}: {}", id, e);
                    report(&event_tx, e).await;
                }
            }
            ClientCommand::Submit => {
                let mut client = client.lock().await;
                match client.submit().await {
                    Ok(message) => info!("message {} accepted", message.id),
                    Err(e) => {
                        error!("submit rejected: {}", e);
                        report(&event_tx, e).await;
                    }
                }
            }
            ClientCommand::CancelDraft => {
                client.lock().await.cancel();
            }
            ClientCommand::Delete(id) => {
                let mut client = client.lock().await;
                match client.delete(&id).await {
                    Ok(()) => info!("deleted message {}", id),
                    Err(e) => {
                        error!("cannot delete {}: {}", id, e);
                        report(&event_tx, e).await;
                    }
                }
            }
            ClientCommand::GetMessages => {
                let client = client.lock().await;
                let _ = event_tx
                    .send(ClientEvent::SendMessages(client.view().to_vec()))
                    .await;
            }
            ClientCommand::Shutdown => {
                info!("Shutting down...");
                break;
            }
        }
    }

    //Dropping the pump drops the projector, which releases the subscription.
    pump.abort();
    Ok(())
}

async fn report(event_tx: &mpsc::Sender<ClientEvent>, error: ChatError) {
    let _ = event_tx
        .send(ClientEvent::ActionFailed(error.to_string()))
        .await;
}

//Drains the projector for the lifetime of the chat view, mirroring each
//ordered view into the client and out to the presentation layer.
pub async fn run_stream(
    client: Arc<Mutex<Client>>,
    mut projector: Projector,
    event_tx: mpsc::Sender<ClientEvent>,
) {
    while let Some(event) = projector.next_event().await {
        match event {
            StreamEvent::Snapshot(view) => {
                client.lock().await.set_view(view.clone());
                if event_tx
                    .send(ClientEvent::MessagesChanged(view))
                    .await
                    .is_err()
                {
                    break;
                }
            }
            StreamEvent::Broken(reason) => {
                error!("live stream broken: {}", reason);
                let _ = event_tx.send(ClientEvent::StreamBroken(reason)).await;
                break;
            }
        }
    }
    projector.unsubscribe();
}
