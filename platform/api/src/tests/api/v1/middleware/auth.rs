use std::time::Duration;

use hyper::header;
use serde_json::{json, Value};
use serial_test::serial;

use crate::api::jwt::JwtState;
use crate::api;
use crate::config::{ApiConfig, AppConfig};
use crate::tests::global::{create_user, mock_global_state};

#[serial]
#[tokio::test]
async fn test_serial_auth_middleware() {
    let port = portpicker::pick_unused_port().expect("failed to pick port");
    let (global, handler) = mock_global_state(AppConfig {
        api: ApiConfig {
            bind_address: format!("127.0.0.1:{}", port).parse().unwrap(),
            ..Default::default()
        },
        ..Default::default()
    })
    .await;

    let user = create_user(&global, "alice", "password1").await;
    let token = JwtState::new(&global.config.jwt, user.id)
        .and_then(|state| state.serialize(&global.config.jwt))
        .expect("failed to create token");

    let handle = tokio::spawn(api::run(global.clone()));

    // We need to wait for the server to start
    tokio::time::sleep(Duration::from_millis(300)).await;

    let client = reqwest::Client::new();
    let health = format!("http://127.0.0.1:{}/v1/health", port);
    let gql = format!("http://127.0.0.1:{}/v1/gql", port);

    let resp = client.get(&health).send().await.expect("failed to get health");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: Value = resp.json().await.expect("failed to read body");
    assert_eq!(body, json!({"status": "ok"}));

    let resp = client
        .get(&health)
        .header(header::AUTHORIZATION.as_str(), format!("Bearer {}", token))
        .send()
        .await
        .expect("failed to get health");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    let resp = client
        .get(&health)
        .header(header::AUTHORIZATION.as_str(), "Bearer not-a-token")
        .send()
        .await
        .expect("failed to get health");
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);

    // The raw token header works as well
    let resp = client
        .post(&gql)
        .header("token", token.as_str())
        .json(&json!({ "query": "query { me { username } }" }))
        .send()
        .await
        .expect("failed to query gql");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: Value = resp.json().await.expect("failed to read body");
    assert_eq!(body["data"], json!({ "me": { "username": "alice" } }));

    let resp = client
        .get(format!("http://127.0.0.1:{}/nope", port))
        .send()
        .await
        .expect("failed to get");
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

    // The client uses Keep-Alive, so we need to drop it to release the global context
    drop(global);
    drop(client);

    tokio::time::timeout(Duration::from_secs(1), handler.cancel())
        .await
        .expect("failed to cancel context");

    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("api did not stop")
        .expect("api task panicked")
        .expect("api returned an error");
}
