use std::fmt;

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<serde_json::Value>,
}

impl fmt::Display for GraphqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("graphql errors: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
    Graphql(Vec<GraphqlError>),
    #[error("missing {0} in response")]
    MissingData(&'static str),
    #[error("{0} is not in the cache")]
    NotCached(String),
}
