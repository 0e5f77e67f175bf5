//! Health check and API index.

use actix_web::HttpResponse;
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// Health check endpoint - returns server status.
///
/// GET /api/health
pub async fn health_check() -> HttpResponse {
    let response = HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    HttpResponse::Ok().json(response)
}

/// GET /api/
pub async fn api_status() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "active",
        "message": "WebBlog API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "authentication": "Bearer token",
        "endpoints": {
            "posts": {
                "list": "/api/posts/",
                "detail": "/api/posts/{id}/",
                "create": "/api/posts/create/",
                "by_author": "/api/users/{id}/posts/",
            },
            "comments": {
                "list": "/api/posts/{post_id}/comments/",
                "create": "/api/posts/{post_id}/comments/create/",
                "delete": "/api/comments/{id}/",
            },
            "auth": {
                "status": "/api/auth/status/",
                "login": "/api/auth/login/",
                "logout": "/api/auth/logout/",
                "register": "/api/auth/register/",
            },
        },
    }))
}
