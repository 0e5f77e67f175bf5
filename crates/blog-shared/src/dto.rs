//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Requests. Missing fields deserialize as empty so that validation, not the
// JSON parser, reports them per field.

/// Request to register a new user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Request to login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of post create and edit requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentRequest {
    pub content: String,
}

/// Query string of the post listing. Numbers arrive as text and are
/// interpreted by the server, so a garbled page never fails the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostListQuery {
    pub sort: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// Query string of endpoints returning comments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentSortQuery {
    pub comment_sort: Option<String>,
}

// Responses

/// A user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_staff: bool,
}

/// Response containing an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
    pub user: Option<UserResponse>,
}

/// A post as it appears in listings: content cut to an excerpt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummaryResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub comment_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationResponse {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_posts: u64,
    pub page_size: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostSummaryResponse>,
    pub pagination: PaginationResponse,
    pub sort: String,
}

/// A comment with its content rendered in restricted mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i64,
    pub author: String,
    pub content: String,
    pub content_html: String,
    pub created_at: DateTime<Utc>,
    pub is_approved: bool,
}

/// A full post with its content rendered in full mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub content_html: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
    pub comment_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMutationResponse {
    pub message: String,
    pub post: PostResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentListResponse {
    pub post_id: i64,
    pub comments: Vec<CommentResponse>,
    pub comment_count: usize,
    pub sort: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentCreatedResponse {
    pub message: String,
    pub comment: CommentResponse,
}

/// Every post of one author, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorPostsResponse {
    pub author_id: i64,
    pub posts: Vec<PostSummaryResponse>,
    pub post_count: usize,
}
