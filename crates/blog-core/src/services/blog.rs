//! Posts and comments: listing, detail, authoring and author-only mutation.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    Actor, Comment, CommentSort, CommentView, NewComment, NewPost, Post, PostDetail, PostSort,
    PostSummary, PostUpdate,
};
use crate::error::{DomainError, RepoError};
use crate::pagination::{Page, PageMeta, PageRequest};
use crate::ports::{CommentRepository, PostRepository, UserRepository};
use crate::validation::{validate_comment, validate_post};

/// Shown in place of an author whose account no longer resolves.
const UNKNOWN_AUTHOR: &str = "[deleted]";

/// Blog operations over the post, comment and user repositories.
#[derive(Clone)]
pub struct BlogService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl BlogService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            users,
            posts,
            comments,
        }
    }

    /// One page of posts in `sort` order. Out-of-range pages are clamped.
    pub async fn list_posts(
        &self,
        sort: PostSort,
        request: PageRequest,
    ) -> Result<Page<PostSummary>, DomainError> {
        let total = self.posts.count().await?;
        let meta = PageMeta::resolve(total, request);

        let posts = if total == 0 {
            Vec::new()
        } else {
            self.posts.list(sort, meta.offset(), meta.limit()).await?
        };

        let items = self.summarize(posts).await?;
        Ok(Page { items, meta })
    }

    /// A post with its comments in `comment_sort` order.
    pub async fn get_post(
        &self,
        post_id: i64,
        comment_sort: CommentSort,
    ) -> Result<PostDetail, DomainError> {
        let post = self.require_post(post_id).await?;
        let comments = self.comments.list_for_post(post_id, comment_sort).await?;

        let mut author_ids: Vec<i64> = comments.iter().map(|c| c.author_id).collect();
        author_ids.push(post.author_id);
        let names = self.usernames(author_ids).await?;

        Ok(PostDetail {
            author: author_name(&names, post.author_id),
            comments: attach_authors(comments, &names),
            post,
        })
    }

    /// The comments of a post in `sort` order.
    pub async fn sorted_comments(
        &self,
        post_id: i64,
        sort: CommentSort,
    ) -> Result<Vec<CommentView>, DomainError> {
        self.require_post(post_id).await?;
        let comments = self.comments.list_for_post(post_id, sort).await?;
        let names = self
            .usernames(comments.iter().map(|c| c.author_id).collect())
            .await?;

        Ok(attach_authors(comments, &names))
    }

    /// Every post written by one user, newest first.
    pub async fn posts_by_author(&self, author_id: i64) -> Result<Vec<PostSummary>, DomainError> {
        if self.users.find_by_id(author_id).await?.is_none() {
            return Err(DomainError::not_found("User", author_id));
        }

        let posts = self.posts.find_by_author(author_id).await?;
        self.summarize(posts).await
    }

    pub async fn create_post(
        &self,
        actor: &Actor,
        title: &str,
        content: &str,
    ) -> Result<Post, DomainError> {
        validate_post(title, content)?;

        let post = self
            .posts
            .insert(NewPost::new(
                actor.user_id,
                title.trim().to_string(),
                content.trim().to_string(),
            ))
            .await?;

        tracing::info!(post_id = post.id, author_id = actor.user_id, "Post created");
        Ok(post)
    }

    /// Edit a post. Only its author may do this.
    pub async fn update_post(
        &self,
        actor: &Actor,
        post_id: i64,
        title: &str,
        content: &str,
    ) -> Result<Post, DomainError> {
        let post = self.require_post(post_id).await?;
        if !actor.owns(post.author_id) {
            tracing::warn!(post_id, user_id = actor.user_id, "Rejected edit by non-author");
            return Err(DomainError::PermissionDenied);
        }

        validate_post(title, content)?;

        let update = PostUpdate {
            title: title.trim().to_string(),
            content: content.trim().to_string(),
            updated_at: Utc::now().max(post.created_at),
        };

        let post = self
            .posts
            .update(post_id, update)
            .await
            .map_err(|e| not_found_as(e, "Post", post_id))?;

        tracing::info!(post_id, "Post updated");
        Ok(post)
    }

    /// Delete a post and, through the store, its comments.
    pub async fn delete_post(&self, actor: &Actor, post_id: i64) -> Result<(), DomainError> {
        let post = self.require_post(post_id).await?;
        if !actor.owns(post.author_id) {
            tracing::warn!(post_id, user_id = actor.user_id, "Rejected delete by non-author");
            return Err(DomainError::PermissionDenied);
        }

        self.posts
            .delete(post_id)
            .await
            .map_err(|e| not_found_as(e, "Post", post_id))?;

        tracing::info!(post_id, "Post deleted");
        Ok(())
    }

    /// Attach a new comment to an existing post.
    ///
    /// Nothing is stored unless the post exists and the content validates.
    pub async fn create_comment(
        &self,
        actor: &Actor,
        post_id: i64,
        content: &str,
    ) -> Result<CommentView, DomainError> {
        self.require_post(post_id).await?;
        validate_comment(content)?;

        let comment = self
            .comments
            .insert(NewComment::new(
                post_id,
                actor.user_id,
                content.trim().to_string(),
            ))
            .await?;

        tracing::info!(
            comment_id = comment.id,
            post_id,
            author_id = actor.user_id,
            "Comment created"
        );

        Ok(CommentView {
            comment,
            author: actor.username.clone(),
        })
    }

    /// Delete a comment. Only its author may do this.
    pub async fn delete_comment(&self, actor: &Actor, comment_id: i64) -> Result<(), DomainError> {
        let comment: Comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Comment", comment_id))?;

        if !actor.owns(comment.author_id) {
            return Err(DomainError::PermissionDenied);
        }

        self.comments
            .delete(comment_id)
            .await
            .map_err(|e| not_found_as(e, "Comment", comment_id))?;

        tracing::info!(comment_id, "Comment deleted");
        Ok(())
    }

    async fn require_post(&self, post_id: i64) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))
    }

    async fn summarize(&self, posts: Vec<Post>) -> Result<Vec<PostSummary>, DomainError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        let counts = self.comments.count_for_posts(&post_ids).await?;
        let names = self
            .usernames(posts.iter().map(|p| p.author_id).collect())
            .await?;

        Ok(posts
            .into_iter()
            .map(|post| PostSummary {
                author: author_name(&names, post.author_id),
                comment_count: counts.get(&post.id).copied().unwrap_or(0),
                post,
            })
            .collect())
    }

    async fn usernames(&self, ids: Vec<i64>) -> Result<HashMap<i64, String>, DomainError> {
        let unique: Vec<i64> = ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        if unique.is_empty() {
            return Ok(HashMap::new());
        }

        let users = self.users.find_by_ids(&unique).await?;
        Ok(users.into_iter().map(|u| (u.id, u.username)).collect())
    }
}

fn author_name(names: &HashMap<i64, String>, author_id: i64) -> String {
    names
        .get(&author_id)
        .cloned()
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
}

fn attach_authors(comments: Vec<Comment>, names: &HashMap<i64, String>) -> Vec<CommentView> {
    comments
        .into_iter()
        .map(|comment| CommentView {
            author: author_name(names, comment.author_id),
            comment,
        })
        .collect()
}

/// A row that vanished between lookup and write is reported as not found.
fn not_found_as(err: RepoError, entity_type: &'static str, id: i64) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::not_found(entity_type, id),
        other => other.into(),
    }
}
