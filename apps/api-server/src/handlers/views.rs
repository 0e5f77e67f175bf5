//! Conversions from domain values to response bodies.
//!
//! Markdown is rendered here: posts in full mode, comments in restricted mode.

use blog_core::domain::{CommentView, Post, PostDetail, PostSummary, User};
use blog_core::markdown::{render_comment, render_post};
use blog_core::pagination::{Page, PageMeta};
use blog_shared::dto::{
    CommentResponse, PaginationResponse, PostDetailResponse, PostResponse, PostSummaryResponse,
    UserResponse,
};

pub fn user(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        is_staff: user.is_staff,
    }
}

pub fn post(post: Post, author: String) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        content_html: render_post(&post.content),
        content: post.content,
        author,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

pub fn summary(summary: PostSummary) -> PostSummaryResponse {
    PostSummaryResponse {
        id: summary.post.id,
        content: summary.post.excerpt(),
        title: summary.post.title,
        author: summary.author,
        created_at: summary.post.created_at,
        updated_at: summary.post.updated_at,
        comment_count: summary.comment_count,
    }
}

pub fn comment(view: CommentView) -> CommentResponse {
    CommentResponse {
        id: view.comment.id,
        author: view.author,
        content_html: render_comment(&view.comment.content),
        content: view.comment.content,
        created_at: view.comment.created_at,
        is_approved: view.comment.is_approved,
    }
}

pub fn detail(detail: PostDetail) -> PostDetailResponse {
    let comment_count = detail.comment_count();
    PostDetailResponse {
        post: post(detail.post, detail.author),
        comments: detail.comments.into_iter().map(comment).collect(),
        comment_count,
    }
}

pub fn pagination(meta: &PageMeta) -> PaginationResponse {
    PaginationResponse {
        current_page: meta.current_page,
        total_pages: meta.total_pages,
        total_posts: meta.total_count,
        page_size: meta.page_size,
        has_next: meta.has_next,
        has_previous: meta.has_previous,
    }
}

pub fn summaries(page: Page<PostSummary>) -> (Vec<PostSummaryResponse>, PaginationResponse) {
    let meta = pagination(&page.meta);
    (page.items.into_iter().map(summary).collect(), meta)
}
