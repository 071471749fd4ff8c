use shared::domain::{Comment, CommentId, Post, PostId};

/// Authoritative in-memory mirror of the feed for one session.
///
/// Every mutating operation returns a fresh snapshot of the full post list;
/// snapshots handed out earlier are never touched again, so the rendering
/// layer can hold on to them safely.
///
/// All lookups are linear scans. The data set is a single user-session feed,
/// so the O(posts * comments) cross-post comment search is an accepted
/// contract, not an oversight.
#[derive(Debug, Clone, Default)]
pub struct PostStore {
    posts: Vec<Post>,
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the entire contents, used after a fetch-all.
    pub fn set_all(&mut self, posts: Vec<Post>) -> Vec<Post> {
        self.posts = posts;
        self.snapshot()
    }

    pub fn append(&mut self, post: Post) -> Vec<Post> {
        self.posts.push(post);
        self.snapshot()
    }

    /// Adds exactly 1 to the post's like counter. No-op when the post is
    /// absent; the caller issues one call per accepted remote like.
    pub fn increment_like(&mut self, post_id: PostId) -> Vec<Post> {
        if let Some(post) = self.post_mut(post_id) {
            post.like_count += 1;
        }
        self.snapshot()
    }

    pub fn increment_share(&mut self, post_id: PostId) -> Vec<Post> {
        if let Some(post) = self.post_mut(post_id) {
            post.share_count += 1;
        }
        self.snapshot()
    }

    /// Appends a comment to the post's sequence; no-op when the post is
    /// absent.
    pub fn add_comment(&mut self, post_id: PostId, comment: Comment) -> Vec<Post> {
        if let Some(post) = self.post_mut(post_id) {
            post.comments.push(comment);
        }
        self.snapshot()
    }

    /// Replaces the body of the first comment matching `comment_id` across
    /// all posts. Comment ids are globally unique, so first match is the
    /// only match; no-op when absent.
    pub fn update_comment_body(&mut self, comment_id: CommentId, new_body: &str) -> Vec<Post> {
        if let Some(comment) = self
            .posts
            .iter_mut()
            .flat_map(|post| post.comments.iter_mut())
            .find(|comment| comment.comment_id == comment_id)
        {
            comment.body = new_body.to_string();
        }
        self.snapshot()
    }

    /// Removes any comment with `comment_id` from the given post. Idempotent;
    /// no-op when the post is absent.
    pub fn remove_comment(&mut self, post_id: PostId, comment_id: CommentId) -> Vec<Post> {
        if let Some(post) = self.post_mut(post_id) {
            post.comments.retain(|comment| comment.comment_id != comment_id);
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> Vec<Post> {
        self.posts.clone()
    }

    pub fn contains_post(&self, post_id: PostId) -> bool {
        self.posts.iter().any(|post| post.post_id == post_id)
    }

    /// Cross-post lookup of a comment's current body by id alone.
    pub fn comment_body(&self, comment_id: CommentId) -> Option<String> {
        self.posts
            .iter()
            .find_map(|post| post.comment(comment_id))
            .map(|comment| comment.body.clone())
    }

    fn post_mut(&mut self, post_id: PostId) -> Option<&mut Post> {
        self.posts.iter_mut().find(|post| post.post_id == post_id)
    }
}

#[cfg(test)]
#[path = "tests/post_store_tests.rs"]
mod tests;
