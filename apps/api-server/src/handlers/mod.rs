//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod posts;
mod views;


use actix_web::{HttpRequest, error, web};

use crate::middleware::error::AppError;

/// Extractor settings and all application routes.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .configure(configure_routes);
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/", web::get().to(health::api_status))
            .route("/health", web::get().to(health::health_check))
            // Posts; the literal path goes first so it is not taken for an id
            .route("/posts/", web::get().to(posts::list))
            .route("/posts/create/", web::post().to(posts::create))
            .service(
                web::resource("/posts/{id}/")
                    .route(web::get().to(posts::detail))
                    .route(web::put().to(posts::update))
                    .route(web::delete().to(posts::delete)),
            )
            .route("/posts/{id}/comments/", web::get().to(comments::list))
            .route(
                "/posts/{id}/comments/create/",
                web::post().to(comments::create),
            )
            .route("/comments/{id}/", web::delete().to(comments::delete))
            .route("/users/{id}/posts/", web::get().to(posts::by_author))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register/", web::post().to(auth::register))
                    .route("/login/", web::post().to(auth::login))
                    .route("/logout/", web::post().to(auth::logout))
                    .route("/status/", web::get().to(auth::status)),
            ),
    );
}

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!("Rejected JSON body: {}", err);
    AppError::BadRequest(format!("Invalid JSON: {err}")).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid query string: {err}")).into()
}

fn path_error(_err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::NotFound("Resource not found".to_string()).into()
}
