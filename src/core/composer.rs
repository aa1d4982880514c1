use crate::store::models::Message;
use crate::utils::constants::MAX_MESSAGE_CHARS;
use crate::utils::errors::ChatError;
use crate::utils::types::MessageId;

//Store request produced by a successful submit.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Submission {
    Create { body: String },
    Update { id: MessageId, body: String },
}

//Per-session draft state machine: one message being written or one own
//message being edited, never both. Every completed or cancelled action
//returns to Idle.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Composer {
    Idle,
    Composing { draft: String },
    Editing { id: MessageId, draft: String },
}

impl Composer {
    pub fn new() -> Self {
        Composer::Idle
    }

    //Opens an empty draft; no-op if a draft is already active.
    pub fn begin_compose(&mut self) {
        if let Composer::Idle = self {
            *self = Composer::Composing {
                draft: String::new(),
            };
        }
    }

    //Replaces the whole draft, mirroring a controlled text input. Ignored
    //while Idle.
    pub fn type_text(&mut self, text: &str) {
        match self {
            Composer::Composing { draft } | Composer::Editing { draft, .. } => {
                *draft = text.to_string();
            }
            Composer::Idle => {}
        }
    }

    //Own-message guard: the stored author must match the session display
    //name. Client-side only, the store enforces nothing. On a mismatch the
    //state is unchanged. Starting an edit replaces any draft in progress.
    pub fn begin_edit(&mut self, message: &Message, display_name: &str) -> Result<(), ChatError> {
        if message.author != display_name {
            return Err(ChatError::UnauthorizedEdit);
        }
        *self = Composer::Editing {
            id: message.id.clone(),
            draft: message.body.clone(),
        };
        Ok(())
    }

    //Validates and drains the draft. A draft that trims to empty or runs
    //over length leaves the state untouched so the user can keep typing.
    pub fn submit(&mut self) -> Result<Submission, ChatError> {
        let submission = match self {
            Composer::Idle => return Err(ChatError::ValidationRejected("no active draft")),
            Composer::Composing { draft } => Submission::Create {
                body: validate(draft)?,
            },
            Composer::Editing { id, draft } => Submission::Update {
                id: id.clone(),
                body: validate(draft)?,
            },
        };
        *self = Composer::Idle;
        Ok(submission)
    }

    //Discards the draft, no store call.
    pub fn cancel(&mut self) {
        *self = Composer::Idle;
    }

    //Puts a drained draft back after a failed store call so a retry keeps
    //the user's text.
    pub fn restore(&mut self, submission: Submission) {
        *self = match submission {
            Submission::Create { body } => Composer::Composing { draft: body },
            Submission::Update { id, body } => Composer::Editing { id, draft: body },
        };
    }

    pub fn draft(&self) -> Option<&str> {
        match self {
            Composer::Idle => None,
            Composer::Composing { draft } | Composer::Editing { draft, .. } => Some(draft),
        }
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(draft: &str) -> Result<String, ChatError> {
    let trimmed = draft.trim();
    if trimmed.is_empty() {
        return Err(ChatError::ValidationRejected("message is empty"));
    }
    if trimmed.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ChatError::ValidationRejected("message is too long"));
    }
    Ok(trimmed.to_string())
}
