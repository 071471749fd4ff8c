use shared::domain::CommentId;

use crate::post_store::PostStore;

/// The single shared record of which comment is currently being edited and
/// its pending text.
///
/// States are Idle and Editing(comment_id). `begin` while already editing
/// overwrites the active target and discards the unsaved draft —
/// last-writer-wins, never stacked.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    active_comment_id: Option<CommentId>,
    draft: String,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters edit mode for `comment_id`, seeding the draft with the
    /// comment's current body. Stays in the previous state when the comment
    /// cannot be found; callers must tolerate the refusal.
    pub fn begin(&mut self, comment_id: CommentId, store: &PostStore) -> bool {
        let Some(body) = store.comment_body(comment_id) else {
            return false;
        };
        self.active_comment_id = Some(comment_id);
        self.draft = body;
        true
    }

    /// Replaces the draft unconditionally. Only meaningful while a session
    /// is active; enforcing that is the caller's contract.
    pub fn update_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Returns the active target and draft, clearing the session. `None`
    /// when idle.
    pub fn commit(&mut self) -> Option<(CommentId, String)> {
        let comment_id = self.active_comment_id.take()?;
        Some((comment_id, std::mem::take(&mut self.draft)))
    }

    /// Clears the session without returning the draft.
    pub fn cancel(&mut self) {
        self.active_comment_id = None;
        self.draft.clear();
    }

    pub fn active_comment_id(&self) -> Option<CommentId> {
        self.active_comment_id
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_editing(&self) -> bool {
        self.active_comment_id.is_some()
    }
}

#[cfg(test)]
#[path = "tests/edit_session_tests.rs"]
mod tests;
