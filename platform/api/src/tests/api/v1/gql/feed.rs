use serde_json::json;

use crate::api::request_context::RequestContext;
use crate::tests::global::{create_user, execute, logged_in, mock_global_state, shutdown};

#[tokio::test]
async fn test_feed_shows_followed_users_newest_first() {
    let (global, handler) = mock_global_state(Default::default()).await;

    let alice = create_user(&global, "alice", "password1").await;
    let bob = create_user(&global, "bob", "password1").await;
    let carol = create_user(&global, "carol", "password1").await;

    global.db.follow(alice.id, bob.id).await.unwrap();

    global.db.create_photo(alice.id, "https://cdn/a1.jpg", None).await.unwrap();
    global.db.create_photo(carol.id, "https://cdn/c1.jpg", None).await.unwrap();
    global.db.create_photo(bob.id, "https://cdn/b1.jpg", None).await.unwrap();

    let (errors, json) = execute(
        &global,
        logged_in(&alice).await,
        "query { seeFeed { file isMine user { username } } }",
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(
        json,
        json!({ "seeFeed": [
            { "file": "https://cdn/b1.jpg", "isMine": false, "user": { "username": "bob" } },
            { "file": "https://cdn/a1.jpg", "isMine": true, "user": { "username": "alice" } },
        ] })
    );

    shutdown(global, handler).await;
}

#[tokio::test]
async fn test_feed_pages() {
    let (global, handler) = mock_global_state(Default::default()).await;

    let alice = create_user(&global, "alice", "password1").await;
    for i in 0..7 {
        global
            .db
            .create_photo(alice.id, &format!("https://cdn/{i}.jpg"), None)
            .await
            .unwrap();
    }

    let (errors, json) = execute(
        &global,
        logged_in(&alice).await,
        "query { first: seeFeed(offset: 0) { id } rest: seeFeed(offset: 5) { file } }",
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(json["first"].as_array().unwrap().len(), 5);
    assert_eq!(
        json["rest"],
        json!([{ "file": "https://cdn/1.jpg" }, { "file": "https://cdn/0.jpg" }])
    );

    shutdown(global, handler).await;
}

#[tokio::test]
async fn test_feed_requires_login() {
    let (global, handler) = mock_global_state(Default::default()).await;

    let (errors, json) = execute(&global, RequestContext::default(), "query { seeFeed { id } }").await;

    assert_eq!(errors.len(), 1);
    assert_eq!(json, serde_json::Value::Null);

    shutdown(global, handler).await;
}
