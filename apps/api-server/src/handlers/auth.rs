//! Authentication handlers.

use actix_web::{HttpResponse, web};

use blog_core::domain::User;
use blog_core::validation::RegistrationForm;
use blog_shared::MessageResponse;
use blog_shared::dto::{AuthResponse, AuthStatusResponse, LoginRequest, RegisterRequest};

use super::views;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn token_response(state: &AppState, user: &User, message: &str) -> AppResult<AuthResponse> {
    let token = state.tokens.generate_token(user.id, &user.username)?;

    Ok(AuthResponse {
        message: message.to_string(),
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds(),
        user: views::user(user),
    })
}

/// POST /api/auth/register/
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let form = RegistrationForm {
        username: &body.username,
        email: &body.email,
        password: &body.password,
        password_confirm: &body.password_confirm,
    };

    let user = state.accounts.register(&form).await?;

    Ok(HttpResponse::Created().json(token_response(
        &state,
        &user,
        "User created successfully",
    )?))
}

/// POST /api/auth/login/
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let user = state
        .accounts
        .authenticate(&body.username, &body.password)
        .await?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(HttpResponse::Ok().json(token_response(&state, &user, "Login successful")?))
}

/// POST /api/auth/logout/
///
/// Tokens are stateless; the client discards its copy.
pub async fn logout(identity: Identity) -> HttpResponse {
    tracing::info!(user_id = identity.user_id, "User logged out");
    HttpResponse::Ok().json(MessageResponse::new("Logout successful"))
}

/// GET /api/auth/status/
pub async fn status(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let user = match identity.0 {
        Some(identity) => state.accounts.find_user(identity.user_id).await.ok(),
        None => None,
    };

    Ok(HttpResponse::Ok().json(AuthStatusResponse {
        authenticated: user.is_some(),
        user: user.as_ref().map(views::user),
    }))
}
