use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{ClientError, GraphqlError};

/// Something that can run a GraphQL operation and hand back its `data`.
#[async_trait]
pub trait GqlTransport: Send + Sync {
    async fn execute(&self, query: &str, variables: Value) -> Result<Value, ClientError>;
}

#[derive(Debug, serde::Deserialize)]
struct GqlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

/// Posts operations to the `/v1/gql` endpoint of the api.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            token: None,
        }
    }

    /// Authenticates every request with the token returned by `login`.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

#[async_trait]
impl GqlTransport for HttpTransport {
    async fn execute(&self, query: &str, variables: Value) -> Result<Value, ClientError> {
        let body = json!({
            "query": query,
            "variables": variables,
        });

        let mut req = self
            .client
            .post(self.endpoint.as_str())
            .header("Content-Type", "application/json")
            .json(&body);

        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let res = req.send().await?.error_for_status()?;

        let body = res.json::<GqlResponse>().await?;

        if let Some(errors) = body.errors.filter(|e| !e.is_empty()) {
            tracing::debug!(count = errors.len(), "graphql request failed");
            return Err(ClientError::Graphql(errors));
        }

        body.data.ok_or(ClientError::MissingData("data"))
    }
}
