//! Post endpoints.

use actix_web::{HttpResponse, web};

use blog_core::domain::{CommentSort, PostSort};
use blog_core::pagination::PageRequest;
use blog_shared::MessageResponse;
use blog_shared::dto::{
    AuthorPostsResponse, CommentSortQuery, PostListQuery, PostListResponse, PostMutationResponse,
    PostRequest,
};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts/
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let sort = PostSort::parse(query.sort.as_deref().unwrap_or_default());

    // A garbled page means page 1; a garbled size is rejected by validation.
    let page = query.page.and_then(|p| p.trim().parse::<i64>().ok());
    let page_size = query
        .page_size
        .map(|s| s.trim().parse::<i64>().unwrap_or(0));

    let request = PageRequest::new(
        page,
        page_size,
        state.pagination.default_page_size,
        state.pagination.max_page_size,
    )?;

    let page = state.blog.list_posts(sort, request).await?;
    let (posts, pagination) = views::summaries(page);

    Ok(HttpResponse::Ok().json(PostListResponse {
        posts,
        pagination,
        sort: sort.to_string(),
    }))
}

/// GET /api/posts/{id}/
pub async fn detail(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<CommentSortQuery>,
) -> AppResult<HttpResponse> {
    let sort = CommentSort::parse(query.comment_sort.as_deref().unwrap_or_default());
    let detail = state.blog.get_post(path.into_inner(), sort).await?;

    Ok(HttpResponse::Ok().json(views::detail(detail)))
}

/// POST /api/posts/create/
pub async fn create(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .blog
        .create_post(&identity.actor(), &body.title, &body.content)
        .await?;

    Ok(HttpResponse::Created().json(PostMutationResponse {
        message: "Post created successfully".to_string(),
        post: views::post(post, identity.username),
    }))
}

/// PUT /api/posts/{id}/
pub async fn update(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .blog
        .update_post(
            &identity.actor(),
            path.into_inner(),
            &body.title,
            &body.content,
        )
        .await?;

    Ok(HttpResponse::Ok().json(PostMutationResponse {
        message: "Post updated successfully".to_string(),
        post: views::post(post, identity.username),
    }))
}

/// DELETE /api/posts/{id}/
pub async fn delete(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    state
        .blog
        .delete_post(&identity.actor(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}

/// GET /api/users/{id}/posts/
pub async fn by_author(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let author_id = path.into_inner();
    let posts: Vec<_> = state
        .blog
        .posts_by_author(author_id)
        .await?
        .into_iter()
        .map(views::summary)
        .collect();

    Ok(HttpResponse::Ok().json(AuthorPostsResponse {
        author_id,
        post_count: posts.len(),
        posts,
    }))
}
