//! The auth context handed to the engine by the application.
//!
//! Authentication itself happens elsewhere (for Dogear, against Supabase
//! auth). This type only guarantees that anything holding a [`Session`] has
//! an owner identity and a non-empty access token, so the engine can fail
//! fast instead of sending doomed requests.

use crate::error::Error;

/// An authenticated session: the owner identity records are scoped to, plus
/// the access token the push channel must be armed with.
#[derive(Clone, Debug)]
pub struct Session<Owner> {
    owner: Owner,
    access_token: String,
}

impl<Owner> Session<Owner> {
    /// Build a session from an owner identity and access token.
    ///
    /// Fails with [`Error::Auth`] if the token is empty after trimming.
    pub fn new(owner: Owner, access_token: impl Into<String>) -> Result<Self, Error> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(Error::Auth("missing access token".to_string()));
        }
        Ok(Session {
            owner,
            access_token,
        })
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}
