use thiserror::Error;

/// Failures surfaced by feed actions. Operations that target a post or
/// comment id absent from the local mirror are not errors — they are silent
/// no-ops, tolerating stale ids (e.g. a deleted comment double-clicked).
#[derive(Debug, Error)]
pub enum FeedError {
    /// A post was submitted before the current user was resolved.
    #[error("not logged in: no current user resolved")]
    NotLoggedIn,
    /// A remote collaborator call failed: network, decoding, or rejected by
    /// the server. Never retried by the core.
    #[error("remote call failed: {message}")]
    Remote { message: String },
}

impl FeedError {
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
        }
    }
}
