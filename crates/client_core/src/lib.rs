use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{Comment, CommentId, Post, PostId, User},
    error::FeedError,
    protocol::{CreateCommentRequest, CreatePostRequest, PostsResponse, UpdateCommentRequest},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, warn};

pub mod edit_session;
pub mod post_store;

pub use edit_session::EditSession;
pub use post_store::PostStore;

/// The remote feed collaborator. The core never retries or rolls back a
/// call; success or failure drives the reconciliation step and nothing else.
#[async_trait]
pub trait FeedApi: Send + Sync {
    async fn fetch_all_posts(&self) -> Result<Vec<Post>>;
    async fn create_post(&self, author: &User, body: &str) -> Result<Post>;
    async fn like_post(&self, post_id: PostId) -> Result<()>;
    async fn share_post(&self, post_id: PostId) -> Result<()>;
    async fn create_comment(&self, post_id: PostId, body: &str) -> Result<Comment>;
    async fn update_comment(&self, comment_id: CommentId, body: &str) -> Result<()>;
    async fn delete_comment(&self, comment_id: CommentId) -> Result<()>;
    async fn fetch_user(&self, reference: &str) -> Result<User>;
}

pub struct MissingFeedApi;

#[async_trait]
impl FeedApi for MissingFeedApi {
    async fn fetch_all_posts(&self) -> Result<Vec<Post>> {
        Err(anyhow!("feed api is unavailable"))
    }

    async fn create_post(&self, _author: &User, _body: &str) -> Result<Post> {
        Err(anyhow!("feed api is unavailable"))
    }

    async fn like_post(&self, post_id: PostId) -> Result<()> {
        Err(anyhow!("feed api is unavailable for post {}", post_id.0))
    }

    async fn share_post(&self, post_id: PostId) -> Result<()> {
        Err(anyhow!("feed api is unavailable for post {}", post_id.0))
    }

    async fn create_comment(&self, post_id: PostId, _body: &str) -> Result<Comment> {
        Err(anyhow!("feed api is unavailable for post {}", post_id.0))
    }

    async fn update_comment(&self, comment_id: CommentId, _body: &str) -> Result<()> {
        Err(anyhow!(
            "feed api is unavailable for comment {}",
            comment_id.0
        ))
    }

    async fn delete_comment(&self, comment_id: CommentId) -> Result<()> {
        Err(anyhow!(
            "feed api is unavailable for comment {}",
            comment_id.0
        ))
    }

    async fn fetch_user(&self, _reference: &str) -> Result<User> {
        Err(anyhow!("feed api is unavailable"))
    }
}

/// Local lookup of the acting user's reference (a resource URL, or nothing
/// when the session is logged out). Consulted once per resolution attempt.
pub trait UserReferenceStore: Send + Sync {
    fn load_user_reference(&self) -> Option<String>;
}

pub struct MissingUserReferenceStore;

impl UserReferenceStore for MissingUserReferenceStore {
    fn load_user_reference(&self) -> Option<String> {
        None
    }
}

/// `FeedApi` backed by the feed server's HTTP routes.
pub struct HttpFeedApi {
    http: Client,
    base_url: String,
}

impl HttpFeedApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl FeedApi for HttpFeedApi {
    async fn fetch_all_posts(&self) -> Result<Vec<Post>> {
        let posts: PostsResponse = self
            .http
            .get(format!("{}/posts", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(posts)
    }

    async fn create_post(&self, author: &User, body: &str) -> Result<Post> {
        let post = self
            .http
            .post(format!("{}/posts", self.base_url))
            .json(&CreatePostRequest::new(author.clone(), body))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(post)
    }

    async fn like_post(&self, post_id: PostId) -> Result<()> {
        self.http
            .put(format!("{}/posts/{}/like", self.base_url, post_id.0))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn share_post(&self, post_id: PostId) -> Result<()> {
        self.http
            .put(format!("{}/posts/{}/share", self.base_url, post_id.0))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn create_comment(&self, post_id: PostId, body: &str) -> Result<Comment> {
        let comment = self
            .http
            .post(format!("{}/posts/{}/comment", self.base_url, post_id.0))
            .json(&CreateCommentRequest {
                body: body.to_string(),
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(comment)
    }

    async fn update_comment(&self, comment_id: CommentId, body: &str) -> Result<()> {
        self.http
            .put(format!("{}/comments/{}", self.base_url, comment_id.0))
            .json(&UpdateCommentRequest {
                body: body.to_string(),
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete_comment(&self, comment_id: CommentId) -> Result<()> {
        self.http
            .delete(format!("{}/comments/{}", self.base_url, comment_id.0))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    // The stored reference is an absolute URL, not a path under the feed
    // server, so it is requested as-is.
    async fn fetch_user(&self, reference: &str) -> Result<User> {
        let user = self
            .http
            .get(reference)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(user)
    }
}

#[derive(Debug, Clone)]
pub enum FeedEvent {
    CurrentUserResolved(User),
    LoadingChanged(bool),
    PostsUpdated(Vec<Post>),
    Error(String),
}

struct FeedState {
    current_user: Option<User>,
    posts: PostStore,
    edit: EditSession,
    loading: bool,
}

/// Orchestrates user actions against the remote feed.
///
/// Every action follows the same shape: validate, issue the remote call,
/// and apply the local mutation only after the call succeeds. The local
/// mirror therefore never shows state the server has not accepted; on
/// failure the action is logged, surfaced as a `FeedEvent::Error`, and the
/// mirror is left untouched.
///
/// Actions hold the state lock only around reads and writes, never across a
/// remote call, so independent actions proceed in parallel and each applies
/// its own reconciliation on its own completion.
pub struct FeedClient {
    api: Arc<dyn FeedApi>,
    user_store: Arc<dyn UserReferenceStore>,
    inner: Mutex<FeedState>,
    events: broadcast::Sender<FeedEvent>,
}

impl FeedClient {
    pub fn new(api: Arc<dyn FeedApi>) -> Arc<Self> {
        Self::new_with_user_store(api, Arc::new(MissingUserReferenceStore))
    }

    pub fn new_with_user_store(
        api: Arc<dyn FeedApi>,
        user_store: Arc<dyn UserReferenceStore>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(1024);
        Arc::new(Self {
            api,
            user_store,
            inner: Mutex::new(FeedState {
                current_user: None,
                posts: PostStore::new(),
                edit: EditSession::new(),
                loading: false,
            }),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<FeedEvent> {
        self.events.subscribe()
    }

    /// Resolves the acting user from the stored reference. Failure is
    /// reported but not fatal, and never retried; the session simply stays
    /// logged out.
    pub async fn resolve_current_user(&self) -> Result<Option<User>> {
        let Some(reference) = self.user_store.load_user_reference() else {
            debug!("no stored user reference; session stays logged out");
            return Ok(None);
        };

        match self.api.fetch_user(&reference).await {
            Ok(user) => {
                {
                    let mut guard = self.inner.lock().await;
                    guard.current_user = Some(user.clone());
                }
                let _ = self.events.send(FeedEvent::CurrentUserResolved(user.clone()));
                Ok(Some(user))
            }
            Err(err) => {
                error!("failed to fetch current user: {err}");
                let _ = self
                    .events
                    .send(FeedEvent::Error(format!("failed to fetch current user: {err}")));
                Ok(None)
            }
        }
    }

    /// Replaces the local mirror with the server's full post list.
    pub async fn refresh_posts(&self) -> Result<Vec<Post>> {
        self.set_loading(true).await;
        let fetched = self.api.fetch_all_posts().await;
        self.set_loading(false).await;

        let posts = match fetched {
            Ok(posts) => posts,
            Err(err) => {
                return Err(self.remote_failure("failed to fetch posts", err));
            }
        };

        let snapshot = {
            let mut guard = self.inner.lock().await;
            guard.posts.set_all(posts)
        };
        let _ = self.events.send(FeedEvent::PostsUpdated(snapshot.clone()));
        Ok(snapshot)
    }

    /// Submits a new post authored by the current user and appends the
    /// server-returned post, so the mirror always holds the server-assigned
    /// post id. An empty message is tolerated and sent as-is.
    pub async fn create_post(&self, message: &str) -> Result<Post> {
        let author = {
            let guard = self.inner.lock().await;
            guard.current_user.clone()
        };
        let Some(author) = author else {
            warn!("create post rejected: no current user resolved");
            let _ = self
                .events
                .send(FeedEvent::Error("not logged in".to_string()));
            return Err(FeedError::NotLoggedIn.into());
        };

        let post = match self.api.create_post(&author, message).await {
            Ok(post) => post,
            Err(err) => return Err(self.remote_failure("failed to create post", err)),
        };

        let snapshot = {
            let mut guard = self.inner.lock().await;
            guard.posts.append(post.clone())
        };
        let _ = self.events.send(FeedEvent::PostsUpdated(snapshot));
        Ok(post)
    }

    /// Likes a post. A stale post id is a silent no-op with no remote call;
    /// the local counter moves only after the server accepts the like, so N
    /// fired likes with N accepted responses always land on +N regardless of
    /// completion order.
    pub async fn like_post(&self, post_id: PostId) -> Result<()> {
        if !self.post_known(post_id).await {
            debug!(post_id = post_id.0, "like ignored: post not in local mirror");
            return Ok(());
        }

        if let Err(err) = self.api.like_post(post_id).await {
            return Err(self.remote_failure("failed to like post", err));
        }

        let snapshot = {
            let mut guard = self.inner.lock().await;
            guard.posts.increment_like(post_id)
        };
        let _ = self.events.send(FeedEvent::PostsUpdated(snapshot));
        Ok(())
    }

    /// Shares a post; symmetric to [`FeedClient::like_post`].
    pub async fn share_post(&self, post_id: PostId) -> Result<()> {
        if !self.post_known(post_id).await {
            debug!(
                post_id = post_id.0,
                "share ignored: post not in local mirror"
            );
            return Ok(());
        }

        if let Err(err) = self.api.share_post(post_id).await {
            return Err(self.remote_failure("failed to share post", err));
        }

        let snapshot = {
            let mut guard = self.inner.lock().await;
            guard.posts.increment_share(post_id)
        };
        let _ = self.events.send(FeedEvent::PostsUpdated(snapshot));
        Ok(())
    }

    /// Adds a comment to a post. Blank text is ignored without a remote
    /// call. The server-returned comment is appended on success, so the
    /// mirror holds the server-assigned comment id.
    pub async fn add_comment(&self, post_id: PostId, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            debug!(post_id = post_id.0, "comment ignored: blank text");
            return Ok(());
        }

        let comment = match self.api.create_comment(post_id, text).await {
            Ok(comment) => comment,
            Err(err) => return Err(self.remote_failure("failed to add comment", err)),
        };

        let snapshot = {
            let mut guard = self.inner.lock().await;
            guard.posts.add_comment(post_id, comment)
        };
        let _ = self.events.send(FeedEvent::PostsUpdated(snapshot));
        Ok(())
    }

    /// Enters edit mode for a comment, local only. Returns false (and stays
    /// out of edit mode) when the comment is not in the mirror. Beginning a
    /// second edit while one is active replaces it and discards the unsaved
    /// draft.
    pub async fn begin_edit(&self, comment_id: CommentId) -> bool {
        let mut guard = self.inner.lock().await;
        let FeedState { posts, edit, .. } = &mut *guard;
        edit.begin(comment_id, posts)
    }

    /// Replaces the active edit draft, local only.
    pub async fn update_edit_draft(&self, text: &str) {
        let mut guard = self.inner.lock().await;
        guard.edit.update_draft(text);
    }

    /// Abandons the active edit session without touching the comment.
    pub async fn cancel_edit(&self) {
        let mut guard = self.inner.lock().await;
        guard.edit.cancel();
    }

    /// Persists the active edit. No-op when idle. The comment body changes
    /// and the session clears only after the server accepts the update; on
    /// failure the session and draft are kept so the user can retry or
    /// cancel.
    pub async fn save_edit(&self) -> Result<()> {
        let pending = {
            let guard = self.inner.lock().await;
            guard
                .edit
                .active_comment_id()
                .map(|comment_id| (comment_id, guard.edit.draft().to_string()))
        };
        let Some((comment_id, draft)) = pending else {
            debug!("save edit ignored: no active session");
            return Ok(());
        };

        if let Err(err) = self.api.update_comment(comment_id, &draft).await {
            return Err(self.remote_failure("failed to save edited comment", err));
        }

        let snapshot = {
            let mut guard = self.inner.lock().await;
            guard.edit.commit();
            guard.posts.update_comment_body(comment_id, &draft)
        };
        let _ = self.events.send(FeedEvent::PostsUpdated(snapshot));
        Ok(())
    }

    /// Deletes a comment. The local mirror drops it only after the server
    /// confirms the delete, so a failed delete leaves local and remote state
    /// agreeing (the comment survives both sides).
    pub async fn delete_comment(&self, post_id: PostId, comment_id: CommentId) -> Result<()> {
        if let Err(err) = self.api.delete_comment(comment_id).await {
            return Err(self.remote_failure("failed to delete comment", err));
        }

        let snapshot = {
            let mut guard = self.inner.lock().await;
            guard.posts.remove_comment(post_id, comment_id)
        };
        let _ = self.events.send(FeedEvent::PostsUpdated(snapshot));
        Ok(())
    }

    /// Current mirror snapshot for the rendering layer.
    pub async fn posts(&self) -> Vec<Post> {
        let guard = self.inner.lock().await;
        guard.posts.snapshot()
    }

    pub async fn current_user(&self) -> Option<User> {
        let guard = self.inner.lock().await;
        guard.current_user.clone()
    }

    pub async fn active_edit(&self) -> Option<(CommentId, String)> {
        let guard = self.inner.lock().await;
        guard
            .edit
            .active_comment_id()
            .map(|comment_id| (comment_id, guard.edit.draft().to_string()))
    }

    pub async fn is_loading(&self) -> bool {
        let guard = self.inner.lock().await;
        guard.loading
    }

    async fn post_known(&self, post_id: PostId) -> bool {
        let guard = self.inner.lock().await;
        guard.posts.contains_post(post_id)
    }

    async fn set_loading(&self, loading: bool) {
        {
            let mut guard = self.inner.lock().await;
            guard.loading = loading;
        }
        let _ = self.events.send(FeedEvent::LoadingChanged(loading));
    }

    fn remote_failure(&self, context: &str, err: anyhow::Error) -> anyhow::Error {
        warn!("{context}: {err}");
        let message = format!("{context}: {err}");
        let _ = self.events.send(FeedEvent::Error(message.clone()));
        FeedError::remote(message).into()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
