use std::sync::Arc;

use common::http::ext::RequestGlobalExt;
use common::http::RouteError;
use hyper::http::header;
use hyper::{Body, Request};
use routerify::{prelude::RequestExt, Middleware};

use crate::api::auth::{AuthData, AuthError};
use crate::api::error::ApiError;
use crate::api::jwt::JwtState;
use crate::api::request_context::RequestContext;
use crate::global::GlobalState;

/// Alternative header some clients send the raw token in.
pub const TOKEN_HEADER: &str = "token";

/// Pulls the token out of either `Authorization: Bearer <token>` or the `token`
/// header. Returns `Ok(None)` when neither is present.
fn extract_token(req: &Request<Body>) -> Result<Option<&str>, AuthError> {
    if let Some(value) = req.headers().get(header::AUTHORIZATION) {
        let token = value
            .to_str()
            .map_err(|_| AuthError::HeaderToStr)?
            .strip_prefix("Bearer ") // Tokens will start with "Bearer " so we need to remove that
            .ok_or(AuthError::NotBearerToken)?;

        return Ok(Some(token));
    }

    match req.headers().get(TOKEN_HEADER) {
        Some(value) => Ok(Some(value.to_str().map_err(|_| AuthError::HeaderToStr)?)),
        None => Ok(None),
    }
}

pub fn auth_middleware(_: &Arc<GlobalState>) -> Middleware<Body, RouteError<ApiError>> {
    Middleware::pre(|req| async move {
        let context = RequestContext::default();
        req.set_context(context.clone());

        let Some(token) = extract_token(&req)? else {
            // Anonymous request, the resolvers decide what that means
            return Ok(req);
        };

        let global = req.get_global::<GlobalState>()?;

        let jwt = JwtState::verify(&global.config.jwt, token).ok_or(AuthError::InvalidToken)?;

        let data = AuthData::from_user_id(&global, jwt.user_id).await?;

        tracing::trace!(user_id = data.user_id(), "authenticated request");

        context.set_auth(data).await;

        Ok(req)
    })
}
