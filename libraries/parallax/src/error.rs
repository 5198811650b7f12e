//! Error taxonomy shared by the sync engine and its backends.
//!
//! Every variant is recoverable at the call site; no failure path leaves a
//! [`LiveView`](crate::LiveView) violating its invariants.

/// Errors surfaced by submission, subscription, and store operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required input was missing or empty. Rejected before any network call.
    #[error("invalid input: {0}")]
    Validation(String),

    /// No usable session (missing owner or access token). Mutations abort
    /// before the store is contacted.
    #[error("not authenticated: {0}")]
    Auth(String),

    /// The backing store rejected or failed a create/delete request.
    #[error("store request failed: {0}")]
    Store(String),

    /// Arming or subscribing the push channel failed. Reconnection policy is
    /// left to the caller.
    #[error("push channel failure: {0}")]
    Channel(String),
}

impl Error {
    pub fn store(message: impl std::fmt::Display) -> Self {
        Error::Store(message.to_string())
    }

    pub fn channel(message: impl std::fmt::Display) -> Self {
        Error::Channel(message.to_string())
    }
}
