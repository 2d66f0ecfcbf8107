use serde_json::json;

use crate::api::request_context::RequestContext;
use crate::tests::global::{create_user, execute, logged_in, mock_global_state, shutdown};

#[tokio::test]
async fn test_delete_own_photo() {
    let (global, handler) = mock_global_state(Default::default()).await;

    let alice = create_user(&global, "alice", "password1").await;
    let photo = global.db.create_photo(alice.id, "https://cdn/a.jpg", None).await.unwrap();
    global.db.create_like(alice.id, photo.id).await.unwrap();
    global.db.create_comment(alice.id, photo.id, "first").await.unwrap();

    let (errors, json) = execute(
        &global,
        logged_in(&alice).await,
        &format!("mutation {{ deletePhoto(photoId: {}) {{ ok error }} }}", photo.id),
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(json, json!({ "deletePhoto": { "ok": true, "error": null } }));
    assert!(global.db.photo_by_id(photo.id).await.unwrap().is_none());
    assert_eq!(global.db.count_likes(photo.id).await.unwrap(), 0);
    assert_eq!(global.db.count_comments(photo.id).await.unwrap(), 0);

    shutdown(global, handler).await;
}

#[tokio::test]
async fn test_delete_foreign_photo() {
    let (global, handler) = mock_global_state(Default::default()).await;

    let alice = create_user(&global, "alice", "password1").await;
    let bob = create_user(&global, "bob", "password1").await;
    let photo = global.db.create_photo(alice.id, "https://cdn/a.jpg", None).await.unwrap();

    let (errors, json) = execute(
        &global,
        logged_in(&bob).await,
        &format!("mutation {{ deletePhoto(photoId: {}) {{ ok error }} }}", photo.id),
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(
        json,
        json!({ "deletePhoto": { "ok": false, "error": "권한이 없습니다." } })
    );
    assert!(global.db.photo_by_id(photo.id).await.unwrap().is_some());

    shutdown(global, handler).await;
}

#[tokio::test]
async fn test_delete_missing_photo() {
    let (global, handler) = mock_global_state(Default::default()).await;

    let alice = create_user(&global, "alice", "password1").await;

    let (errors, json) = execute(
        &global,
        logged_in(&alice).await,
        "mutation { deletePhoto(photoId: 404) { ok error } }",
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(
        json,
        json!({ "deletePhoto": { "ok": false, "error": "사진이 존재하지 않습니다." } })
    );

    shutdown(global, handler).await;
}

#[tokio::test]
async fn test_delete_photo_requires_login() {
    let (global, handler) = mock_global_state(Default::default()).await;

    let alice = create_user(&global, "alice", "password1").await;
    let photo = global.db.create_photo(alice.id, "https://cdn/a.jpg", None).await.unwrap();

    let (errors, json) = execute(
        &global,
        RequestContext::default(),
        &format!("mutation {{ deletePhoto(photoId: {}) {{ ok error }} }}", photo.id),
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(
        json,
        json!({ "deletePhoto": { "ok": false, "error": "Please log in to perform this action." } })
    );
    assert!(global.db.photo_by_id(photo.id).await.unwrap().is_some());

    shutdown(global, handler).await;
}

#[tokio::test]
async fn test_toggle_like_twice() {
    let (global, handler) = mock_global_state(Default::default()).await;

    let alice = create_user(&global, "alice", "password1").await;
    let bob = create_user(&global, "bob", "password1").await;
    let photo = global.db.create_photo(alice.id, "https://cdn/a.jpg", None).await.unwrap();
    global.db.create_like(alice.id, photo.id).await.unwrap();

    let see = format!("query {{ seePhoto(id: {}) {{ likes isLiked }} }}", photo.id);
    let toggle = format!("mutation {{ toggleLikePhoto(id: {}) {{ ok error }} }}", photo.id);

    let (_, before) = execute(&global, logged_in(&bob).await, &see).await;
    assert_eq!(before, json!({ "seePhoto": { "likes": 1, "isLiked": false } }));

    let (errors, json) = execute(&global, logged_in(&bob).await, &toggle).await;
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(json, json!({ "toggleLikePhoto": { "ok": true, "error": null } }));

    let (_, liked) = execute(&global, logged_in(&bob).await, &see).await;
    assert_eq!(liked, json!({ "seePhoto": { "likes": 2, "isLiked": true } }));

    let (errors, _) = execute(&global, logged_in(&bob).await, &toggle).await;
    assert!(errors.is_empty(), "{errors:?}");

    let (_, after) = execute(&global, logged_in(&bob).await, &see).await;
    assert_eq!(after, before);

    shutdown(global, handler).await;
}

#[tokio::test]
async fn test_toggle_like_missing_photo() {
    let (global, handler) = mock_global_state(Default::default()).await;

    let alice = create_user(&global, "alice", "password1").await;

    let (errors, json) = execute(
        &global,
        logged_in(&alice).await,
        "mutation { toggleLikePhoto(id: 7) { ok error } }",
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(
        json,
        json!({ "toggleLikePhoto": { "ok": false, "error": "Photo not found." } })
    );

    shutdown(global, handler).await;
}

#[tokio::test]
async fn test_upload_and_edit_photo() {
    let (global, handler) = mock_global_state(Default::default()).await;

    let alice = create_user(&global, "alice", "password1").await;
    let bob = create_user(&global, "bob", "password1").await;

    let (errors, json) = execute(
        &global,
        logged_in(&alice).await,
        r#"mutation { uploadPhoto(file: "https://cdn/a.jpg", caption: "sunset") { id file caption isMine user { username } } }"#,
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    let id = json["uploadPhoto"]["id"].as_i64().expect("missing id");
    assert_eq!(json["uploadPhoto"]["caption"], json!("sunset"));
    assert_eq!(json["uploadPhoto"]["isMine"], json!(true));
    assert_eq!(json["uploadPhoto"]["user"]["username"], json!("alice"));

    let edit = format!(r#"mutation {{ editPhoto(id: {id}, caption: "sunrise") {{ ok error }} }}"#);

    let (errors, json) = execute(&global, logged_in(&bob).await, &edit).await;
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(json, json!({ "editPhoto": { "ok": false, "error": "Photo not found." } }));

    let (errors, json) = execute(&global, logged_in(&alice).await, &edit).await;
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(json, json!({ "editPhoto": { "ok": true, "error": null } }));

    let photo = global.db.photo_by_id(id as i32).await.unwrap().unwrap();
    assert_eq!(photo.caption.as_deref(), Some("sunrise"));

    // Uploading needs a user to own the photo
    let (errors, _) = execute(
        &global,
        RequestContext::default(),
        r#"mutation { uploadPhoto(file: "https://cdn/b.jpg") { id } }"#,
    )
    .await;
    assert_eq!(errors.len(), 1);

    shutdown(global, handler).await;
}

#[tokio::test]
async fn test_see_photo_likes() {
    let (global, handler) = mock_global_state(Default::default()).await;

    let alice = create_user(&global, "alice", "password1").await;
    let bob = create_user(&global, "bob", "password1").await;
    let photo = global.db.create_photo(alice.id, "https://cdn/a.jpg", None).await.unwrap();
    global.db.create_like(bob.id, photo.id).await.unwrap();

    let (errors, json) = execute(
        &global,
        RequestContext::default(),
        &format!("query {{ seePhotoLikes(id: {}) {{ username }} }}", photo.id),
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(json, json!({ "seePhotoLikes": [{ "username": "bob" }] }));

    shutdown(global, handler).await;
}
