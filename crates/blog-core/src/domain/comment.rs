use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum comment length, in characters.
pub const MAX_COMMENT_LEN: usize = 1000;

/// Comment entity - a short markdown reply attached to a post.
///
/// Comments are never edited once stored. `is_approved` is recorded but not
/// used to filter anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub is_approved: bool,
}

/// Insert payload for a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: i64,
    pub author_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub is_approved: bool,
}

impl NewComment {
    pub fn new(post_id: i64, author_id: i64, content: String) -> Self {
        Self {
            post_id,
            author_id,
            content,
            created_at: Utc::now(),
            is_approved: true,
        }
    }
}

/// A comment joined with its author's username.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub comment: Comment,
    pub author: String,
}
