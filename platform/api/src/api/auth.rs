use chrono::{DateTime, Utc};
use common::database::Ulid;
use common::http::RouteError;
use hyper::StatusCode;

use super::error::ApiError;
use super::jwt::AuthJwtPayload;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("token must be ascii only")]
    HeaderToStr,
    #[error("token must be a bearer token")]
    NotBearerToken,
    #[error("not logged in")]
    NotLoggedIn,
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    TokenExpired,
}

impl From<AuthError> for RouteError<ApiError> {
    fn from(value: AuthError) -> Self {
        RouteError::from(match &value {
            AuthError::HeaderToStr => (StatusCode::BAD_REQUEST, "token must be ascii only"),
            AuthError::NotBearerToken => (StatusCode::BAD_REQUEST, "token must be a bearer token"),
            AuthError::NotLoggedIn => (StatusCode::UNAUTHORIZED, "not logged in"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid token"),
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "token expired"),
        })
        .with_source(Some(ApiError::Auth(value)))
    }
}

/// The identity attached to a request once its bearer token has been verified.
#[derive(Debug, Clone)]
pub struct AuthData {
    pub user_id: Ulid,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthData {
    /// Tokens without an expiration never go stale.
    pub fn is_valid(&self) -> bool {
        self.expires_at.map_or(true, |expires_at| expires_at > Utc::now())
    }
}

impl From<AuthJwtPayload> for AuthData {
    fn from(jwt: AuthJwtPayload) -> Self {
        Self {
            user_id: Ulid(jwt.user_id),
            expires_at: jwt.expiration,
        }
    }
}
