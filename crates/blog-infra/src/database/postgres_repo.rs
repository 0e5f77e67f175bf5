//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, NotSet, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, Unchanged,
};

use blog_core::domain::{
    Comment, CommentSort, NewComment, NewPost, NewUser, Post, PostSort, PostUpdate, User,
};
use blog_core::error::RepoError;
use blog_core::ports::{CommentRepository, PostRepository, UserRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_error};

/// Keep only the first character of an identifier for logging.
fn mask(value: &str) -> String {
    match value.chars().next() {
        Some(first) if value.chars().count() > 1 => format!("{first}***"),
        _ => "***".to_string(),
    }
}

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, new: NewUser) -> Result<User, RepoError> {
        let model = user::ActiveModel {
            id: NotSet,
            username: Set(new.username),
            email: Set(new.email),
            password_hash: Set(new.password_hash),
            is_staff: Set(new.is_staff),
            created_at: Set(new.created_at.into()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| match query_error(e) {
            RepoError::Constraint(_) => RepoError::Constraint("Username already exists".into()),
            other => other,
        })?;

        Ok(model.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username = %mask(username), "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, new: NewPost) -> Result<Post, RepoError> {
        let model = post::ActiveModel {
            id: NotSet,
            author_id: Set(new.author_id),
            title: Set(new.title),
            content: Set(new.content),
            created_at: Set(new.created_at.into()),
            updated_at: Set(new.created_at.into()),
        }
        .insert(&self.db)
        .await
        .map_err(query_error)?;

        Ok(model.into())
    }

    async fn update(&self, id: i64, update: PostUpdate) -> Result<Post, RepoError> {
        let model = post::ActiveModel {
            id: Unchanged(id),
            title: Set(update.title),
            content: Set(update.content),
            updated_at: Set(update.updated_at.into()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => RepoError::NotFound,
            other => query_error(other),
        })?;

        Ok(model.into())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        PostEntity::find()
            .count(&self.db)
            .await
            .map_err(query_error)
    }

    async fn list(&self, sort: PostSort, offset: u64, limit: u64) -> Result<Vec<Post>, RepoError> {
        let (column, order) = match sort {
            PostSort::Newest => (post::Column::CreatedAt, Order::Desc),
            PostSort::Oldest => (post::Column::CreatedAt, Order::Asc),
            PostSort::UpdatedNewest => (post::Column::UpdatedAt, Order::Desc),
            PostSort::UpdatedOldest => (post::Column::UpdatedAt, Order::Asc),
        };

        let result = PostEntity::find()
            .order_by(column, order)
            .order_by_asc(post::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_author(&self, author_id: i64) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn insert(&self, new: NewComment) -> Result<Comment, RepoError> {
        let model = comment::ActiveModel {
            id: NotSet,
            post_id: Set(new.post_id),
            author_id: Set(new.author_id),
            content: Set(new.content),
            created_at: Set(new.created_at.into()),
            is_approved: Set(new.is_approved),
        }
        .insert(&self.db)
        .await
        .map_err(query_error)?;

        Ok(model.into())
    }

    async fn list_for_post(
        &self,
        post_id: i64,
        sort: CommentSort,
    ) -> Result<Vec<Comment>, RepoError> {
        let order = match sort {
            CommentSort::Oldest => Order::Asc,
            CommentSort::Newest => Order::Desc,
        };

        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by(comment::Column::CreatedAt, order)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_for_posts(&self, post_ids: &[i64]) -> Result<HashMap<i64, u64>, RepoError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, i64)> = CommentEntity::find()
            .select_only()
            .column(comment::Column::PostId)
            .column_as(Expr::col(comment::Column::Id).count(), "comment_count")
            .filter(comment::Column::PostId.is_in(post_ids.iter().copied()))
            .group_by(comment::Column::PostId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(rows
            .into_iter()
            .map(|(post_id, count)| (post_id, count.max(0) as u64))
            .collect())
    }
}
