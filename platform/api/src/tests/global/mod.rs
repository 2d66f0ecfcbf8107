use std::sync::Arc;
use std::time::Duration;

use async_graphql::Request;
use common::context::{Context, Handler};
use common::logging;
use serde_json::Value;

use crate::api::auth::AuthData;
use crate::api::request_context::RequestContext;
use crate::api::v1::gql::ext::RequestExt;
use crate::api::v1::gql::schema;
use crate::config::AppConfig;
use crate::database::{self, MemoryStore, Store};
use crate::global::GlobalState;

pub async fn mock_global_state(config: AppConfig) -> (Arc<GlobalState>, Handler) {
    let (ctx, handler) = Context::new();

    logging::init(&config.logging.level, config.logging.mode).expect("failed to initialize logging");

    let db: Arc<dyn Store> = Arc::new(MemoryStore::new());

    (Arc::new(GlobalState::new(config, db, ctx)), handler)
}

pub async fn create_user(global: &Arc<GlobalState>, username: &str, password: &str) -> database::User {
    global
        .db
        .create_user(database::NewUser {
            username: username.to_string(),
            email: format!("{username}@photogram.dev"),
            password_hash: database::User::hash_password(password).expect("failed to hash password"),
            first_name: username.to_string(),
            last_name: None,
        })
        .await
        .expect("failed to create user")
}

/// A request context logged in as `user`.
pub async fn logged_in(user: &database::User) -> RequestContext {
    let ctx = RequestContext::default();
    ctx.set_auth(AuthData { user: user.clone() }).await;
    ctx
}

/// Runs `query` against a fresh schema and returns the errors and the data as json.
pub async fn execute(
    global: &Arc<GlobalState>,
    ctx: RequestContext,
    query: &str,
) -> (Vec<async_graphql::ServerError>, Value) {
    let schema = schema(&global.config.api);

    let res = tokio::time::timeout(
        Duration::from_secs(5),
        schema.execute(
            Request::from(query)
                .provide_global(global.clone())
                .provide_context(ctx),
        ),
    )
    .await
    .expect("query timed out");

    let json = res.data.into_json().expect("failed to convert data to json");

    (res.errors, json)
}

pub async fn shutdown(global: Arc<GlobalState>, handler: Handler) {
    drop(global);

    tokio::time::timeout(Duration::from_secs(1), handler.cancel())
        .await
        .expect("failed to cancel context");
}
