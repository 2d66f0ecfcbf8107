use common::http::RouteError;

use super::auth::AuthError;

pub type Result<T, E = RouteError<ApiError>> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("failed to parse http body: {0}")]
    ParseHttpBody(#[from] hyper::Error),
    #[error("failed to parse gql request: {0}")]
    ParseGql(#[from] async_graphql::ParseRequestError),
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
}
