//! In-memory store - used when no `DATABASE_URL` is configured, and by tests.
//!
//! Data is lost on process restart.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use blog_core::domain::{
    Comment, CommentSort, NewComment, NewPost, NewUser, Post, PostSort, PostUpdate, User,
};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, CommentRepository, PostRepository, UserRepository};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
    last_user_id: i64,
    last_post_id: i64,
    last_comment_id: i64,
}

impl Tables {
    fn remove_post(&mut self, post_id: i64) -> bool {
        if self.posts.remove(&post_id).is_none() {
            return false;
        }
        self.comments.retain(|_, c| c.post_id != post_id);
        true
    }
}

/// Shared tables behind the in-memory repositories.
///
/// Every repository handed out by one `InMemoryDatabase` sees the same data,
/// and deletes cascade the way the SQL foreign keys do.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository {
            tables: self.tables.clone(),
        }
    }
}

pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

pub struct InMemoryPostRepository {
    tables: Arc<RwLock<Tables>>,
}

pub struct InMemoryCommentRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, new: NewUser) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == new.username) {
            return Err(RepoError::Constraint("Username already exists".into()));
        }

        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            is_staff: new.is_staff,
            created_at: new.created_at,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        if self.tables.write().await.remove_post(id) {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, new: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&new.author_id) {
            return Err(RepoError::Query("author does not exist".into()));
        }

        tables.last_post_id += 1;
        let post = Post {
            id: tables.last_post_id,
            author_id: new.author_id,
            title: new.title,
            content: new.content,
            created_at: new.created_at,
            updated_at: new.created_at,
        };
        tables.posts.insert(post.id, post.clone());

        Ok(post)
    }

    async fn update(&self, id: i64, update: PostUpdate) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables.posts.get_mut(&id).ok_or(RepoError::NotFound)?;

        post.title = update.title;
        post.content = update.content;
        post.updated_at = update.updated_at;

        Ok(post.clone())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.posts.len() as u64)
    }

    async fn list(&self, sort: PostSort, offset: u64, limit: u64) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables.posts.values().cloned().collect();
        sort.sort(&mut posts);

        Ok(posts
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn find_by_author(&self, author_id: i64) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        PostSort::Newest.sort(&mut posts);

        Ok(posts)
    }
}

#[async_trait]
impl BaseRepository<Comment, i64> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        match self.tables.write().await.comments.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn insert(&self, new: NewComment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&new.post_id) {
            return Err(RepoError::Query("post does not exist".into()));
        }
        if !tables.users.contains_key(&new.author_id) {
            return Err(RepoError::Query("author does not exist".into()));
        }

        tables.last_comment_id += 1;
        let comment = Comment {
            id: tables.last_comment_id,
            post_id: new.post_id,
            author_id: new.author_id,
            content: new.content,
            created_at: new.created_at,
            is_approved: new.is_approved,
        };
        tables.comments.insert(comment.id, comment.clone());

        Ok(comment)
    }

    async fn list_for_post(
        &self,
        post_id: i64,
        sort: CommentSort,
    ) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        sort.sort(&mut comments);

        Ok(comments)
    }

    async fn count_for_posts(&self, post_ids: &[i64]) -> Result<HashMap<i64, u64>, RepoError> {
        let tables = self.tables.read().await;
        let mut counts = HashMap::new();
        for comment in tables.comments.values() {
            if post_ids.contains(&comment.post_id) {
                *counts.entry(comment.post_id).or_insert(0) += 1;
            }
        }

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed(db: &InMemoryDatabase) -> (User, Post) {
        let user = db
            .users()
            .insert(NewUser::new(
                "testuser".into(),
                "test@example.com".into(),
                "hash".into(),
            ))
            .await
            .unwrap();
        let post = db
            .posts()
            .insert(NewPost::new(user.id, "Title".into(), "Body".into()))
            .await
            .unwrap();
        (user, post)
    }

    #[tokio::test]
    async fn test_ids_are_assigned_in_order() {
        let db = InMemoryDatabase::new();
        let (user, first) = seed(&db).await;

        let second = db
            .posts()
            .insert(NewPost::new(user.id, "Second".into(), "Body".into()))
            .await
            .unwrap();

        assert_eq!(user.id, 1);
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let db = InMemoryDatabase::new();
        seed(&db).await;

        let result = db
            .users()
            .insert(NewUser::new(
                "testuser".into(),
                "other@example.com".into(),
                "hash".into(),
            ))
            .await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_delete_post_removes_comments() {
        let db = InMemoryDatabase::new();
        let (user, post) = seed(&db).await;
        let comment = db
            .comments()
            .insert(NewComment::new(post.id, user.id, "Nice post".into()))
            .await
            .unwrap();

        db.posts().delete(post.id).await.unwrap();

        assert!(db.comments().find_by_id(comment.id).await.unwrap().is_none());
        assert!(matches!(
            db.posts().delete(post.id).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_comment_on_missing_post_rejected() {
        let db = InMemoryDatabase::new();
        let (user, _) = seed(&db).await;

        let result = db
            .comments()
            .insert(NewComment::new(999, user.id, "Orphan".into()))
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_content_by_unknown_author_rejected() {
        let db = InMemoryDatabase::new();
        let (_, post) = seed(&db).await;

        let comment = db
            .comments()
            .insert(NewComment::new(post.id, 999, "Ghost comment".into()))
            .await;
        assert!(matches!(comment, Err(RepoError::Query(_))));

        let orphan = db
            .posts()
            .insert(NewPost::new(999, "Ghost".into(), "Body".into()))
            .await;
        assert!(matches!(orphan, Err(RepoError::Query(_))));

        let stored = db
            .comments()
            .list_for_post(post.id, CommentSort::Oldest)
            .await
            .unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn test_count_for_posts_skips_posts_without_comments() {
        let db = InMemoryDatabase::new();
        let (user, post) = seed(&db).await;
        let empty = db
            .posts()
            .insert(NewPost::new(user.id, "Empty".into(), "Body".into()))
            .await
            .unwrap();
        for _ in 0..2 {
            db.comments()
                .insert(NewComment::new(post.id, user.id, "Comment".into()))
                .await
                .unwrap();
        }

        let counts = db
            .comments()
            .count_for_posts(&[post.id, empty.id])
            .await
            .unwrap();

        assert_eq!(counts.get(&post.id), Some(&2));
        assert_eq!(counts.get(&empty.id), None);
    }
}
