//! Sort keys for post listings and comment threads.
//!
//! Every ordering falls back to ascending id, so two rows created in the
//! same instant keep their insertion order.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Comment, Post};

/// Ordering for post listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostSort {
    /// `created_at` descending.
    #[default]
    Newest,
    /// `created_at` ascending.
    Oldest,
    /// `updated_at` descending.
    UpdatedNewest,
    /// `updated_at` ascending.
    UpdatedOldest,
}

impl PostSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostSort::Newest => "newest",
            PostSort::Oldest => "oldest",
            PostSort::UpdatedNewest => "updated_newest",
            PostSort::UpdatedOldest => "updated_oldest",
        }
    }

    /// Parse a query value. Unknown values fall back to [`PostSort::Newest`].
    pub fn parse(value: &str) -> Self {
        match value {
            "oldest" => PostSort::Oldest,
            "updated_newest" => PostSort::UpdatedNewest,
            "updated_oldest" => PostSort::UpdatedOldest,
            _ => PostSort::Newest,
        }
    }

    pub fn compare(&self, a: &Post, b: &Post) -> Ordering {
        let primary = match self {
            PostSort::Newest => b.created_at.cmp(&a.created_at),
            PostSort::Oldest => a.created_at.cmp(&b.created_at),
            PostSort::UpdatedNewest => b.updated_at.cmp(&a.updated_at),
            PostSort::UpdatedOldest => a.updated_at.cmp(&b.updated_at),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    pub fn sort(&self, posts: &mut [Post]) {
        posts.sort_by(|a, b| self.compare(a, b));
    }
}

/// Ordering for the comments of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommentSort {
    /// `created_at` ascending.
    #[default]
    Oldest,
    /// `created_at` descending.
    Newest,
}

impl CommentSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentSort::Oldest => "oldest",
            CommentSort::Newest => "newest",
        }
    }

    /// Parse a query value. Unknown values fall back to [`CommentSort::Oldest`].
    pub fn parse(value: &str) -> Self {
        match value {
            "newest" => CommentSort::Newest,
            _ => CommentSort::Oldest,
        }
    }

    pub fn compare(&self, a: &Comment, b: &Comment) -> Ordering {
        let primary = match self {
            CommentSort::Oldest => a.created_at.cmp(&b.created_at),
            CommentSort::Newest => b.created_at.cmp(&a.created_at),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    pub fn sort(&self, comments: &mut [Comment]) {
        comments.sort_by(|a, b| self.compare(a, b));
    }
}

macro_rules! string_serde {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                Ok(<$ty>::parse(&value))
            }
        }
    };
}

string_serde!(PostSort);
string_serde!(CommentSort);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn post(id: i64, created_offset: i64, updated_offset: i64) -> Post {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Post {
            id,
            author_id: 1,
            title: format!("post {id}"),
            content: String::new(),
            created_at: base + Duration::minutes(created_offset),
            updated_at: base + Duration::minutes(updated_offset),
        }
    }

    fn comment(id: i64, created_offset: i64) -> Comment {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Comment {
            id,
            post_id: 1,
            author_id: 1,
            content: String::new(),
            created_at: base + Duration::minutes(created_offset),
            is_approved: true,
        }
    }

    fn ids(posts: &[Post]) -> Vec<i64> {
        posts.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_parse_falls_back_to_default() {
        assert_eq!(PostSort::parse("oldest"), PostSort::Oldest);
        assert_eq!(PostSort::parse("updated_newest"), PostSort::UpdatedNewest);
        assert_eq!(PostSort::parse("bogus"), PostSort::Newest);
        assert_eq!(CommentSort::parse("newest"), CommentSort::Newest);
        assert_eq!(CommentSort::parse(""), CommentSort::Oldest);
    }

    #[test]
    fn test_post_sort_orders() {
        let mut posts = vec![post(1, 0, 30), post(2, 10, 10), post(3, 20, 20)];

        PostSort::Newest.sort(&mut posts);
        assert_eq!(ids(&posts), vec![3, 2, 1]);

        PostSort::Oldest.sort(&mut posts);
        assert_eq!(ids(&posts), vec![1, 2, 3]);

        PostSort::UpdatedNewest.sort(&mut posts);
        assert_eq!(ids(&posts), vec![1, 3, 2]);

        PostSort::UpdatedOldest.sort(&mut posts);
        assert_eq!(ids(&posts), vec![2, 3, 1]);
    }

    #[test]
    fn test_newest_is_non_increasing() {
        let mut posts: Vec<Post> = (0..40).map(|i| post(i, (i * 7919) % 13, 0)).collect();
        PostSort::Newest.sort(&mut posts);
        for pair in posts.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[test]
    fn test_comment_ties_keep_insertion_order() {
        let mut comments = vec![comment(3, 5), comment(1, 5), comment(2, 0)];

        CommentSort::Oldest.sort(&mut comments);
        let order: Vec<i64> = comments.iter().map(|c| c.id).collect();
        assert_eq!(order, vec![2, 1, 3]);

        CommentSort::Newest.sort(&mut comments);
        let order: Vec<i64> = comments.iter().map(|c| c.id).collect();
        assert_eq!(order, vec![1, 3, 2]);
    }

    #[test]
    fn test_sort_serializes_as_query_string() {
        let json = serde_json::to_string(&PostSort::UpdatedOldest).unwrap();
        assert_eq!(json, "\"updated_oldest\"");
        let parsed: CommentSort = serde_json::from_str("\"newest\"").unwrap();
        assert_eq!(parsed, CommentSort::Newest);
    }
}
