//! Comment endpoints.

use actix_web::{HttpResponse, web};

use blog_core::domain::CommentSort;
use blog_shared::MessageResponse;
use blog_shared::dto::{
    CommentCreatedResponse, CommentListResponse, CommentRequest, CommentSortQuery,
};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts/{id}/comments/
pub async fn list(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<CommentSortQuery>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let sort = CommentSort::parse(query.comment_sort.as_deref().unwrap_or_default());

    let comments: Vec<_> = state
        .blog
        .sorted_comments(post_id, sort)
        .await?
        .into_iter()
        .map(views::comment)
        .collect();

    Ok(HttpResponse::Ok().json(CommentListResponse {
        post_id,
        comment_count: comments.len(),
        comments,
        sort: sort.to_string(),
    }))
}

/// POST /api/posts/{id}/comments/create/
pub async fn create(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let comment = state
        .blog
        .create_comment(&identity.actor(), path.into_inner(), &body.content)
        .await?;

    Ok(HttpResponse::Created().json(CommentCreatedResponse {
        message: "Comment created successfully".to_string(),
        comment: views::comment(comment),
    }))
}

/// DELETE /api/comments/{id}/
pub async fn delete(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    state
        .blog
        .delete_comment(&identity.actor(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Comment deleted successfully")))
}
