use serde_json::json;

use crate::api::jwt::JwtState;
use crate::api::request_context::RequestContext;
use crate::config::{AppConfig, JwtConfig};
use crate::tests::global::{create_user, execute, logged_in, mock_global_state, shutdown};

#[tokio::test]
async fn test_unfollow_missing_user() {
    let (global, handler) = mock_global_state(Default::default()).await;

    let alice = create_user(&global, "alice", "password1").await;
    let bob = create_user(&global, "bob", "password1").await;
    global.db.follow(alice.id, bob.id).await.unwrap();

    let (errors, json) = execute(
        &global,
        logged_in(&alice).await,
        r#"mutation { unfollowUser(username: "nobody") { ok error } }"#,
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(
        json,
        json!({ "unfollowUser": { "ok": false, "error": "Can't unfollow user." } })
    );

    // Nothing was touched
    assert!(global.db.is_following(alice.id, bob.id).await.unwrap());

    shutdown(global, handler).await;
}

#[tokio::test]
async fn test_unfollow_removes_relation_once() {
    let (global, handler) = mock_global_state(Default::default()).await;

    let alice = create_user(&global, "alice", "password1").await;
    let bob = create_user(&global, "bob", "password1").await;
    global.db.follow(alice.id, bob.id).await.unwrap();

    let query = r#"mutation { unfollowUser(username: "bob") { ok error } }"#;

    let (errors, json) = execute(&global, logged_in(&alice).await, query).await;
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(json, json!({ "unfollowUser": { "ok": true, "error": null } }));
    assert!(!global.db.is_following(alice.id, bob.id).await.unwrap());
    assert_eq!(global.db.count_followers(bob.id).await.unwrap(), 0);

    // A second unfollow is a no-op that still succeeds
    let (errors, json) = execute(&global, logged_in(&alice).await, query).await;
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(json, json!({ "unfollowUser": { "ok": true, "error": null } }));
    assert_eq!(global.db.count_followers(bob.id).await.unwrap(), 0);

    shutdown(global, handler).await;
}

#[tokio::test]
async fn test_protected_requires_login() {
    let (global, handler) = mock_global_state(Default::default()).await;

    let alice = create_user(&global, "alice", "password1").await;
    let bob = create_user(&global, "bob", "password1").await;
    global.db.follow(alice.id, bob.id).await.unwrap();

    let (errors, json) = execute(
        &global,
        RequestContext::default(),
        r#"mutation { unfollowUser(username: "bob") { ok error } followUser(username: "alice") { ok error } }"#,
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(
        json,
        json!({
            "unfollowUser": { "ok": false, "error": "Please log in to perform this action." },
            "followUser": { "ok": false, "error": "Please log in to perform this action." },
        })
    );
    assert!(global.db.is_following(alice.id, bob.id).await.unwrap());
    assert_eq!(global.db.count_followers(alice.id).await.unwrap(), 0);

    shutdown(global, handler).await;
}

#[tokio::test]
async fn test_follow_user() {
    let (global, handler) = mock_global_state(Default::default()).await;

    let alice = create_user(&global, "alice", "password1").await;
    let bob = create_user(&global, "bob", "password1").await;

    let (errors, json) = execute(
        &global,
        logged_in(&alice).await,
        r#"mutation {
            a: followUser(username: "bob") { ok error }
            b: followUser(username: "alice") { ok error }
            c: followUser(username: "nobody") { ok error }
        }"#,
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(
        json,
        json!({
            "a": { "ok": true, "error": null },
            "b": { "ok": false, "error": "You can't follow yourself." },
            "c": { "ok": false, "error": "That user does not exist." },
        })
    );
    assert!(global.db.is_following(alice.id, bob.id).await.unwrap());

    let (errors, json) = execute(
        &global,
        logged_in(&alice).await,
        r#"query { seeProfile(username: "bob") { username totalFollowers totalFollowing isFollowing isMe } }"#,
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(
        json,
        json!({ "seeProfile": { "username": "bob", "totalFollowers": 1, "totalFollowing": 0, "isFollowing": true, "isMe": false } })
    );

    shutdown(global, handler).await;
}

#[tokio::test]
async fn test_login_with_unrepresentable_session() {
    let (global, handler) = mock_global_state(AppConfig {
        jwt: JwtConfig {
            session_duration: u64::MAX,
            ..Default::default()
        },
        ..Default::default()
    })
    .await;

    create_user(&global, "alice", "password1").await;

    let (errors, json) = execute(
        &global,
        RequestContext::default(),
        r#"mutation { login(username: "alice", password: "password1") { ok token error } }"#,
    )
    .await;

    assert_eq!(errors.len(), 1);
    assert_eq!(json, serde_json::Value::Null);
    assert_eq!(
        errors[0].extensions.as_ref().unwrap().get("kind"),
        Some(&async_graphql::Value::from("InternalServerError"))
    );

    shutdown(global, handler).await;
}

#[tokio::test]
async fn test_create_account_and_login() {
    let (global, handler) = mock_global_state(Default::default()).await;

    let (errors, json) = execute(
        &global,
        RequestContext::default(),
        r#"mutation {
            createAccount(firstName: "Nico", username: "nico", email: "nico@photogram.dev", password: "hunter22!") { ok error }
        }"#,
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(json, json!({ "createAccount": { "ok": true, "error": null } }));

    let (errors, json) = execute(
        &global,
        RequestContext::default(),
        r#"mutation {
            createAccount(firstName: "Other", username: "other", email: "nico@photogram.dev", password: "hunter22!") { ok error }
        }"#,
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(
        json,
        json!({ "createAccount": { "ok": false, "error": "This username/email is already taken." } })
    );

    let (errors, json) = execute(
        &global,
        RequestContext::default(),
        r#"mutation {
            bad: login(username: "nico", password: "wrong-password") { ok token error }
            missing: login(username: "nobody", password: "hunter22!") { ok token error }
            good: login(username: "nico", password: "hunter22!") { ok token error }
        }"#,
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(
        json["bad"],
        json!({ "ok": false, "token": null, "error": "Incorrect password." })
    );
    assert_eq!(
        json["missing"],
        json!({ "ok": false, "token": null, "error": "User not found." })
    );
    assert_eq!(json["good"]["ok"], json!(true));

    let token = json["good"]["token"].as_str().expect("missing token");
    let jwt = JwtState::verify(&global.config.jwt, token).expect("token does not verify");
    let user = global.db.user_by_username("nico").await.unwrap().unwrap();
    assert_eq!(jwt.user_id, user.id);

    shutdown(global, handler).await;
}

#[tokio::test]
async fn test_create_account_validation() {
    let (global, handler) = mock_global_state(Default::default()).await;

    let (errors, json) = execute(
        &global,
        RequestContext::default(),
        r#"mutation {
            a: createAccount(firstName: "A", username: "a", email: "a@photogram.dev", password: "hunter22!") { ok error }
            b: createAccount(firstName: "B", username: "bbbb", email: "b@photogram.dev", password: "short") { ok error }
            c: createAccount(firstName: "C", username: "cccc", email: "not-an-email", password: "hunter22!") { ok error }
        }"#,
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(json["a"]["ok"], json!(false));
    assert_eq!(json["b"]["ok"], json!(false));
    assert_eq!(json["c"]["ok"], json!(false));
    assert!(global.db.user_by_username("bbbb").await.unwrap().is_none());

    shutdown(global, handler).await;
}

#[tokio::test]
async fn test_email_only_visible_to_self() {
    let (global, handler) = mock_global_state(Default::default()).await;

    let alice = create_user(&global, "alice", "password1").await;
    let bob = create_user(&global, "bob", "password1").await;

    let query = r#"query { seeProfile(username: "alice") { email } }"#;

    let (errors, json) = execute(&global, logged_in(&alice).await, query).await;
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(json, json!({ "seeProfile": { "email": "alice@photogram.dev" } }));

    let (errors, json) = execute(&global, logged_in(&bob).await, query).await;
    assert_eq!(errors.len(), 1);
    assert_eq!(json, json!({ "seeProfile": null }));

    let extensions = errors[0].extensions.as_ref().unwrap();
    assert_eq!(
        extensions.get("kind"),
        Some(&async_graphql::Value::from("Unauthorized"))
    );

    shutdown(global, handler).await;
}

#[tokio::test]
async fn test_me_requires_login() {
    let (global, handler) = mock_global_state(Default::default()).await;

    let alice = create_user(&global, "alice", "password1").await;

    let (errors, json) = execute(&global, RequestContext::default(), "query { me { username } }").await;
    assert_eq!(errors.len(), 1);
    assert_eq!(json, serde_json::Value::Null);

    let extensions = errors[0].extensions.as_ref().unwrap();
    assert_eq!(
        extensions.get("kind"),
        Some(&async_graphql::Value::from("NotLoggedIn"))
    );

    let (errors, json) = execute(&global, logged_in(&alice).await, "query { me { username isMe } }").await;
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(json, json!({ "me": { "username": "alice", "isMe": true } }));

    shutdown(global, handler).await;
}

#[tokio::test]
async fn test_edit_profile() {
    let (global, handler) = mock_global_state(Default::default()).await;

    let alice = create_user(&global, "alice", "password1").await;
    create_user(&global, "bob", "password1").await;

    let (errors, json) = execute(
        &global,
        logged_in(&alice).await,
        r#"mutation {
            a: editProfile(bio: "hello", lastName: "Liddell") { ok error }
            b: editProfile(username: "bob") { ok error }
        }"#,
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(
        json,
        json!({
            "a": { "ok": true, "error": null },
            "b": { "ok": false, "error": "Could not update profile." },
        })
    );

    let alice = global.db.user_by_id(alice.id).await.unwrap().unwrap();
    assert_eq!(alice.username, "alice");
    assert_eq!(alice.bio.as_deref(), Some("hello"));
    assert_eq!(alice.last_name.as_deref(), Some("Liddell"));

    let (errors, json) = execute(
        &global,
        logged_in(&alice).await,
        r#"mutation { editProfile(password: "new-password") { ok error } }"#,
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(json["editProfile"]["ok"], json!(true));

    let alice = global.db.user_by_id(alice.id).await.unwrap().unwrap();
    assert!(alice.verify_password("new-password"));

    shutdown(global, handler).await;
}

#[tokio::test]
async fn test_see_followers_pages() {
    let (global, handler) = mock_global_state(Default::default()).await;

    let star = create_user(&global, "star", "password1").await;
    for i in 0..7 {
        let fan = create_user(&global, &format!("fan{i}"), "password1").await;
        global.db.follow(fan.id, star.id).await.unwrap();
    }

    let (errors, json) = execute(
        &global,
        RequestContext::default(),
        r#"query {
            first: seeFollowers(username: "star", page: 1) { ok totalPages followers { username } }
            second: seeFollowers(username: "star", page: 2) { ok totalPages followers { username } }
            missing: seeFollowing(username: "nobody", page: 1) { ok error }
        }"#,
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(json["first"]["totalPages"], json!(2));
    assert_eq!(json["first"]["followers"].as_array().unwrap().len(), 5);
    assert_eq!(json["second"]["followers"].as_array().unwrap().len(), 2);
    // newest followers come first
    assert_eq!(json["first"]["followers"][0]["username"], "fan6");
    assert_eq!(json["second"]["followers"][1]["username"], "fan0");
    assert_eq!(
        json["missing"],
        json!({ "ok": false, "error": "User not found." })
    );

    shutdown(global, handler).await;
}
