use async_trait::async_trait;

use super::{Comment, NewUser, Photo, User, UserUpdate};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("unique constraint violated: {0}")]
    Conflict(&'static str),
    #[error("{0} not found")]
    NotFound(&'static str),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Data access used by the resolvers. Every method is a single query, the
/// resolvers own the authorization checks.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    async fn user_by_id(&self, id: i32) -> StoreResult<Option<User>>;
    async fn users_by_ids(&self, ids: &[i32]) -> StoreResult<Vec<User>>;
    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn users_by_usernames(&self, usernames: &[String]) -> StoreResult<Vec<User>>;
    /// Any user holding either the username or the email.
    async fn user_by_username_or_email(&self, username: &str, email: &str) -> StoreResult<Option<User>>;
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;
    async fn update_user(&self, id: i32, update: UserUpdate) -> StoreResult<User>;

    /// Connects `follower_id -> following_id`, a no-op when already connected.
    async fn follow(&self, follower_id: i32, following_id: i32) -> StoreResult<()>;
    /// Disconnects `follower_id -> following_id`. Returns whether a relation was removed.
    async fn unfollow(&self, follower_id: i32, following_id: i32) -> StoreResult<bool>;
    async fn is_following(&self, follower_id: i32, following_id: i32) -> StoreResult<bool>;
    async fn count_followers(&self, user_id: i32) -> StoreResult<i64>;
    async fn count_following(&self, user_id: i32) -> StoreResult<i64>;
    async fn followers(&self, user_id: i32, offset: i64, limit: i64) -> StoreResult<Vec<User>>;
    async fn following(&self, user_id: i32, offset: i64, limit: i64) -> StoreResult<Vec<User>>;

    async fn create_photo(&self, user_id: i32, file: &str, caption: Option<&str>) -> StoreResult<Photo>;
    async fn photo_by_id(&self, id: i32) -> StoreResult<Option<Photo>>;
    async fn photos_by_user(&self, user_id: i32) -> StoreResult<Vec<Photo>>;
    async fn update_photo_caption(&self, id: i32, caption: Option<&str>) -> StoreResult<Photo>;
    /// Deletes the photo together with its likes and comments.
    async fn delete_photo(&self, id: i32) -> StoreResult<()>;
    /// Photos of the user and of everyone they follow, newest first.
    async fn feed(&self, user_id: i32, offset: i64, limit: i64) -> StoreResult<Vec<Photo>>;

    async fn like_exists(&self, user_id: i32, photo_id: i32) -> StoreResult<bool>;
    async fn create_like(&self, user_id: i32, photo_id: i32) -> StoreResult<()>;
    async fn delete_like(&self, user_id: i32, photo_id: i32) -> StoreResult<()>;
    async fn count_likes(&self, photo_id: i32) -> StoreResult<i64>;
    async fn photo_likers(&self, photo_id: i32) -> StoreResult<Vec<User>>;

    async fn create_comment(&self, user_id: i32, photo_id: i32, payload: &str) -> StoreResult<Comment>;
    async fn comment_by_id(&self, id: i32) -> StoreResult<Option<Comment>>;
    async fn update_comment(&self, id: i32, payload: &str) -> StoreResult<Comment>;
    async fn delete_comment(&self, id: i32) -> StoreResult<()>;
    /// Comments of a photo, oldest first.
    async fn comments_for_photo(&self, photo_id: i32, offset: i64, limit: i64) -> StoreResult<Vec<Comment>>;
    async fn count_comments(&self, photo_id: i32) -> StoreResult<i64>;
}
