//! Authentication extractors.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};

use blog_core::domain::Actor;
use blog_core::ports::{AuthError, TokenClaims};

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Authenticated user identity extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
}

impl Identity {
    /// The actor passed into mutating blog operations.
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.username.clone())
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenExpired => AppError::Unauthorized(
                "Your authentication token has expired. Please login again.".to_string(),
            ),
            AuthError::InvalidToken(msg) => AppError::Unauthorized(format!("Invalid token: {msg}")),
            AuthError::MissingAuth => AppError::Unauthorized(
                "Authentication credentials were not provided.".to_string(),
            ),
            AuthError::HashingError(msg) => AppError::Internal(msg),
        }
    }
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AppError> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        tracing::error!("AppState not found in app data");
        return Err(AppError::Internal("Server configuration error".to_string()));
    };

    // Extract Bearer token from Authorization header
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))?;

    let claims = state.tokens.validate_token(token.trim())?;
    Ok(Identity::from(claims))
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct OptionalIdentity(pub Option<Identity>);

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(authenticate(req).ok())))
    }
}
