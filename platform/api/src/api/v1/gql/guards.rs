use std::future::Future;

use async_graphql::Context;

use super::error::{GqlError, Result};
use super::ext::ContextExt;
use super::models::mutation_response::LoginRequired;
use crate::api::auth::AuthData;

// This can't be replaced by async_graphql's field guards because of this: https://github.com/async-graphql/async-graphql/issues/1398
// I don't see a better alternative than doing this for now.
pub async fn auth_guard<T>(ctx: &Context<'_>, field_name: &'static str, field_value: T, user_id: i32) -> Result<T> {
    let request_context = ctx.get_req_context();

    if let Some(auth) = request_context.auth().await {
        if auth.user_id() == user_id {
            return Ok(field_value);
        }
    }

    Err(GqlError::Unauthorized { field: field_name }.into())
}

/// The logged in user, or a `NotLoggedIn` error.
pub async fn require_login(ctx: &Context<'_>) -> Result<AuthData> {
    ctx.get_req_context()
        .auth()
        .await
        .ok_or_else(|| GqlError::NotLoggedIn.into())
}

/// Runs `resolver` with the logged in user. Without one the resolver is never
/// called and the response reports that a login is required.
pub async fn protected<T, F, Fut>(ctx: &Context<'_>, resolver: F) -> Result<T>
where
    T: LoginRequired,
    F: FnOnce(AuthData) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match ctx.get_req_context().auth().await {
        Some(auth) => resolver(auth).await,
        None => Ok(T::login_required()),
    }
}
