use serde::{Deserialize, Serialize};

use crate::domain::{Comment, Post, User};

/// Body for `POST /posts`. New posts start with zero counters and no
/// comments; the server assigns the post id and echoes the stored post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub author: User,
    pub body: String,
    pub like_count: u64,
    pub share_count: u64,
    pub comments: Vec<Comment>,
}

impl CreatePostRequest {
    pub fn new(author: User, body: impl Into<String>) -> Self {
        Self {
            author,
            body: body.into(),
            like_count: 0,
            share_count: 0,
            comments: Vec::new(),
        }
    }
}

/// Body for `POST /posts/{post_id}/comment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub body: String,
}

/// Body for `PUT /comments/{comment_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCommentRequest {
    pub body: String,
}

/// `GET /posts` response.
pub type PostsResponse = Vec<Post>;
