use crate::utils::errors::IdentityError;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

use std::collections::HashMap;
use std::sync::Arc;

//Profile document kept alongside the account, mirroring the user collection
//in the hosted backend.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub uid: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
struct Account {
    password: String,
    profile: UserProfile,
}

#[derive(Debug)]
struct IdentityState {
    //Keyed by uid; email is the login handle and must stay unique.
    accounts: HashMap<String, Account>,
    signed_in: Option<String>,
    next_uid: u64,
}

impl IdentityState {
    fn uid_for_email(&self, email: &str) -> Option<String> {
        self.accounts
            .iter()
            .find(|(_, account)| account.profile.email == email)
            .map(|(uid, _)| uid.clone())
    }
}

//Account layer over the hosted identity provider. The chat core never
//consults it: anonymous sessions carry only a display name.
#[derive(Debug, Clone)]
pub struct IdentityClient {
    state: Arc<Mutex<IdentityState>>,
}

impl IdentityClient {
    pub fn new() -> Self {
        IdentityClient {
            state: Arc::new(Mutex::new(IdentityState {
                accounts: HashMap::new(),
                signed_in: None,
                next_uid: 1,
            })),
        }
    }

    //Creates the account and its profile document, and signs the session in.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, IdentityError> {
        let mut state = self.state.lock().await;
        if state.uid_for_email(email).is_some() {
            return Err(IdentityError::EmailTaken(email.to_string()));
        }
        let uid = format!("uid-{:06}", state.next_uid);
        state.next_uid += 1;
        let profile = UserProfile {
            username: username.to_string(),
            email: email.to_string(),
            uid: uid.clone(),
        };
        state.accounts.insert(
            uid.clone(),
            Account {
                password: password.to_string(),
                profile: profile.clone(),
            },
        );
        state.signed_in = Some(uid.clone());
        info!("registered account {}", uid);
        Ok(profile)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, IdentityError> {
        let mut state = self.state.lock().await;
        let uid = state
            .uid_for_email(email)
            .ok_or(IdentityError::InvalidCredentials)?;
        let profile = match state.accounts.get(&uid) {
            Some(account) if account.password == password => account.profile.clone(),
            _ => return Err(IdentityError::InvalidCredentials),
        };
        state.signed_in = Some(uid);
        info!("signed in {}", profile.uid);
        Ok(profile)
    }

    //Idempotent; signing out twice is fine.
    pub async fn logout(&self) {
        self.state.lock().await.signed_in = None;
    }

    pub async fn current_user(&self) -> Option<UserProfile> {
        let state = self.state.lock().await;
        let uid = state.signed_in.as_ref()?;
        state.accounts.get(uid).map(|a| a.profile.clone())
    }

    //Patches the signed-in profile document. A new email must not collide
    //with another account's login handle.
    pub async fn update_profile(&self, patch: ProfilePatch) -> Result<UserProfile, IdentityError> {
        let mut state = self.state.lock().await;
        let uid = state.signed_in.clone().ok_or(IdentityError::NotSignedIn)?;
        if let Some(email) = &patch.email {
            if let Some(other) = state.uid_for_email(email) {
                if other != uid {
                    return Err(IdentityError::EmailTaken(email.clone()));
                }
            }
        }
        let account = state
            .accounts
            .get_mut(&uid)
            .ok_or(IdentityError::NotSignedIn)?;
        if let Some(username) = patch.username {
            account.profile.username = username;
        }
        if let Some(email) = patch.email {
            account.profile.email = email;
        }
        Ok(account.profile.clone())
    }

    //Removes the profile document and the account, then clears the session.
    pub async fn delete_account(&self) -> Result<(), IdentityError> {
        let mut state = self.state.lock().await;
        let uid = state.signed_in.take().ok_or(IdentityError::NotSignedIn)?;
        state.accounts.remove(&uid);
        info!("deleted account {}", uid);
        Ok(())
    }
}

impl Default for IdentityClient {
    fn default() -> Self {
        Self::new()
    }
}
