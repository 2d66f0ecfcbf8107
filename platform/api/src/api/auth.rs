use std::sync::Arc;

use common::http::RouteError;
use hyper::StatusCode;

use super::error::ApiError;
use crate::database::User;
use crate::global::GlobalState;

#[derive(thiserror::Error, Debug, Clone)]
pub enum AuthError {
    #[error("token must be ascii only")]
    HeaderToStr,
    #[error("token must be a bearer token")]
    NotBearerToken,
    #[error("invalid token")]
    InvalidToken,
    #[error("failed to fetch user")]
    FetchUser,
}

impl From<AuthError> for RouteError<ApiError> {
    fn from(value: AuthError) -> Self {
        RouteError::from(match &value {
            AuthError::HeaderToStr => (StatusCode::BAD_REQUEST, "token must be ascii only"),
            AuthError::NotBearerToken => (StatusCode::UNAUTHORIZED, "token must be a bearer token"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid token"),
            AuthError::FetchUser => (StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch user"),
        })
        .with_source(Some(ApiError::Auth(value)))
    }
}

/// The caller of a request, resolved from their token.
#[derive(Clone, Debug)]
pub struct AuthData {
    pub user: User,
}

impl AuthData {
    pub async fn from_user_id(global: &Arc<GlobalState>, user_id: i32) -> Result<Self, AuthError> {
        let user = global
            .user_by_id_loader
            .load_one(user_id)
            .await
            .map_err(|_| AuthError::FetchUser)?
            .ok_or(AuthError::InvalidToken)?;

        Ok(Self { user })
    }

    pub fn user_id(&self) -> i32 {
        self.user.id
    }
}
