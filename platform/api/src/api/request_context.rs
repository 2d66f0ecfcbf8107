use std::sync::Arc;

use tokio::sync::RwLock;

use super::auth::AuthData;

#[derive(Default)]
pub struct ContextData {
    pub auth: Option<AuthData>,
}

/// Per request state shared between the middlewares and the resolvers.
#[derive(Default, Clone)]
pub struct RequestContext(Arc<RwLock<ContextData>>);

impl RequestContext {
    pub async fn set_auth(&self, data: AuthData) {
        let mut guard = self.0.write().await;
        guard.auth = Some(data);
    }

    pub async fn auth(&self) -> Option<AuthData> {
        let guard = self.0.read().await;
        guard.auth.clone()
    }
}
