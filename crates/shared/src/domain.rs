use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(UserId);
id_newtype!(PostId);
id_newtype!(CommentId);

/// The acting user, resolved once per session and immutable afterwards.
/// The remote record also carries a password; credentials are not client
/// state and are not modelled here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
}

/// A comment nested under exactly one post. Comment ids are unique across
/// the whole feed, not merely per post; edit and delete look comments up by
/// id alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: CommentId,
    pub body: String,
    pub like_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub post_id: PostId,
    pub author: User,
    pub body: String,
    pub like_count: u64,
    pub share_count: u64,
    /// Insertion order preserved; append-only except in-place edit and
    /// removal.
    pub comments: Vec<Comment>,
}

impl Post {
    pub fn comment(&self, comment_id: CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| c.comment_id == comment_id)
    }
}
