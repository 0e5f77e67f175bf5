use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CommentView;

/// Length of the listing excerpt, in characters.
pub const EXCERPT_LEN: usize = 200;

/// Post entity - a markdown article owned by its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// First [`EXCERPT_LEN`] characters of the content, with an ellipsis when cut.
    pub fn excerpt(&self) -> String {
        if self.content.chars().count() > EXCERPT_LEN {
            let cut: String = self.content.chars().take(EXCERPT_LEN).collect();
            format!("{cut}...")
        } else {
            self.content.clone()
        }
    }
}

/// Insert payload for a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl NewPost {
    /// Create a new post.
    pub fn new(author_id: i64, title: String, content: String) -> Self {
        Self {
            author_id,
            title,
            content,
            created_at: Utc::now(),
        }
    }
}

/// Edit applied to an existing post.
#[derive(Debug, Clone)]
pub struct PostUpdate {
    pub title: String,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

/// A post as it appears in listings.
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub post: Post,
    pub author: String,
    pub comment_count: u64,
}

/// A post with its author and ordered comments.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: Post,
    pub author: String,
    pub comments: Vec<CommentView>,
}

impl PostDetail {
    /// Every comment is counted, approved or not.
    pub fn comment_count(&self) -> u64 {
        self.comments.len() as u64
    }
}
