use async_graphql::SimpleObject;

pub const LOGIN_REQUIRED: &str = "Please log in to perform this action.";

/// Responses a protected resolver can answer with when nobody is logged in.
pub trait LoginRequired {
    fn login_required() -> Self;
}

/// The outcome of a mutation. Domain failures are reported here instead of as
/// GraphQL errors.
#[derive(SimpleObject, Clone, Debug, PartialEq, Eq)]
pub struct MutationResponse {
    pub ok: bool,
    pub error: Option<String>,
}

impl MutationResponse {
    pub fn success() -> Self {
        Self { ok: true, error: None }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
        }
    }
}

impl LoginRequired for MutationResponse {
    fn login_required() -> Self {
        Self::failure(LOGIN_REQUIRED)
    }
}

#[derive(SimpleObject, Clone, Debug, PartialEq, Eq)]
pub struct LoginResult {
    pub ok: bool,
    pub token: Option<String>,
    pub error: Option<String>,
}

impl LoginResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            token: None,
            error: Some(message.into()),
        }
    }
}

#[derive(SimpleObject, Clone, Debug, PartialEq, Eq)]
pub struct CreateCommentResult {
    pub ok: bool,
    pub error: Option<String>,
    /// The id of the created comment.
    pub id: Option<i32>,
}

impl CreateCommentResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
            id: None,
        }
    }
}

impl LoginRequired for CreateCommentResult {
    fn login_required() -> Self {
        Self::failure(LOGIN_REQUIRED)
    }
}
