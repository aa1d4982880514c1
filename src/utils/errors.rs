use crate::utils::types::MessageId;

use core::fmt;

//Everything a chat action can fail with. Validation and authorship are
//checked before the store is ever contacted.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ChatError {
    StoreUnavailable(String),
    ValidationRejected(&'static str),
    UnauthorizedEdit,
    MessageNotFound(MessageId),
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::StoreUnavailable(reason) => {
                write!(f, "Message store unavailable: {}", reason)
            }
            ChatError::ValidationRejected(reason) => {
                write!(f, "Message rejected: {}", reason)
            }
            ChatError::UnauthorizedEdit => {
                write!(f, "Only the author of a message may edit or delete it")
            }
            ChatError::MessageNotFound(id) => {
                write!(f, "No message with id '{}' in the store", id)
            }
        }
    }
}

impl std::error::Error for ChatError {}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum IdentityError {
    InvalidCredentials,
    EmailTaken(String),
    NotSignedIn,
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityError::InvalidCredentials => write!(f, "Invalid email or password"),
            IdentityError::EmailTaken(email) => {
                write!(f, "An account already exists for '{}'", email)
            }
            IdentityError::NotSignedIn => write!(f, "No session is signed in"),
        }
    }
}

impl std::error::Error for IdentityError {}
