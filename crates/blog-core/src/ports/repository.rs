use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{
    Comment, CommentSort, NewComment, NewPost, NewUser, Post, PostSort, PostUpdate, User,
};
use crate::error::RepoError;

/// Lookups and deletes shared by every repository.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository. Accounts are created, never removed.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user. Fails with `Constraint` when the username is taken.
    async fn insert(&self, user: NewUser) -> Result<User, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Fetch several users at once; missing ids are skipped.
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Apply an edit. Fails with `NotFound` when the post is gone.
    async fn update(&self, id: i64, update: PostUpdate) -> Result<Post, RepoError>;

    async fn count(&self) -> Result<u64, RepoError>;

    /// One window of the listing in `sort` order.
    async fn list(&self, sort: PostSort, offset: u64, limit: u64)
    -> Result<Vec<Post>, RepoError>;

    /// All posts by one author, newest first.
    async fn find_by_author(&self, author_id: i64) -> Result<Vec<Post>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i64> {
    async fn insert(&self, comment: NewComment) -> Result<Comment, RepoError>;

    /// Every comment of a post, approved or not, in `sort` order.
    async fn list_for_post(
        &self,
        post_id: i64,
        sort: CommentSort,
    ) -> Result<Vec<Comment>, RepoError>;

    /// Comment totals per post. Posts without comments may be absent.
    async fn count_for_posts(&self, post_ids: &[i64]) -> Result<HashMap<i64, u64>, RepoError>;
}
