use std::str::FromStr;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};

use super::store::{Store, StoreError, StoreResult};
use super::{Comment, NewUser, Photo, User, UserUpdate};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(uri: &str, max_connections: u32) -> StoreResult<Self> {
        let options = PgConnectOptions::from_str(uri)?
            .disable_statement_logging()
            .to_owned();

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Maps unique violations to [`StoreError::Conflict`] so both stores report
/// them the same way.
fn conflict(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict("username or email"),
        _ => StoreError::Sqlx(err),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn user_by_id(&self, id: i32) -> StoreResult<Option<User>> {
        Ok(sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn users_by_ids(&self, ids: &[i32]) -> StoreResult<Vec<User>> {
        Ok(sqlx::query_as("SELECT * FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(sqlx::query_as("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn users_by_usernames(&self, usernames: &[String]) -> StoreResult<Vec<User>> {
        Ok(sqlx::query_as("SELECT * FROM users WHERE username = ANY($1)")
            .bind(usernames)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn user_by_username_or_email(&self, username: &str, email: &str) -> StoreResult<Option<User>> {
        Ok(sqlx::query_as("SELECT * FROM users WHERE username = $1 OR email = $2 LIMIT 1")
            .bind(username)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        sqlx::query_as(
            r#"
            INSERT INTO users (
                username,
                email,
                password_hash,
                first_name,
                last_name
            ) VALUES (
                $1,
                $2,
                $3,
                $4,
                $5
            ) RETURNING *"#,
        )
        .bind(user.username)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.first_name)
        .bind(user.last_name)
        .fetch_one(&self.pool)
        .await
        .map_err(conflict)
    }

    async fn update_user(&self, id: i32, update: UserUpdate) -> StoreResult<User> {
        sqlx::query_as(
            r#"
            UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                first_name = COALESCE($5, first_name),
                last_name = COALESCE($6, last_name),
                bio = COALESCE($7, bio),
                avatar = COALESCE($8, avatar),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *"#,
        )
        .bind(id)
        .bind(update.username)
        .bind(update.email)
        .bind(update.password_hash)
        .bind(update.first_name)
        .bind(update.last_name)
        .bind(update.bio)
        .bind(update.avatar)
        .fetch_optional(&self.pool)
        .await
        .map_err(conflict)?
        .ok_or(StoreError::NotFound("user"))
    }

    async fn follow(&self, follower_id: i32, following_id: i32) -> StoreResult<()> {
        sqlx::query("INSERT INTO follows (follower_id, following_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(follower_id)
            .bind(following_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn unfollow(&self, follower_id: i32, following_id: i32) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND following_id = $2")
            .bind(follower_id)
            .bind(following_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn is_following(&self, follower_id: i32, following_id: i32) -> StoreResult<bool> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND following_id = $2)")
                .bind(follower_id)
                .bind(following_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn count_followers(&self, user_id: i32) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM follows WHERE following_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_following(&self, user_id: i32) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn followers(&self, user_id: i32, offset: i64, limit: i64) -> StoreResult<Vec<User>> {
        Ok(sqlx::query_as(
            r#"
            SELECT u.* FROM users u
            INNER JOIN follows f ON f.follower_id = u.id
            WHERE f.following_id = $1
            ORDER BY f.created_at DESC, u.id DESC
            OFFSET $2 LIMIT $3"#,
        )
        .bind(user_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn following(&self, user_id: i32, offset: i64, limit: i64) -> StoreResult<Vec<User>> {
        Ok(sqlx::query_as(
            r#"
            SELECT u.* FROM users u
            INNER JOIN follows f ON f.following_id = u.id
            WHERE f.follower_id = $1
            ORDER BY f.created_at DESC, u.id DESC
            OFFSET $2 LIMIT $3"#,
        )
        .bind(user_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_photo(&self, user_id: i32, file: &str, caption: Option<&str>) -> StoreResult<Photo> {
        Ok(
            sqlx::query_as("INSERT INTO photos (user_id, file, caption) VALUES ($1, $2, $3) RETURNING *")
                .bind(user_id)
                .bind(file)
                .bind(caption)
                .fetch_one(&self.pool)
                .await?,
        )
    }

    async fn photo_by_id(&self, id: i32) -> StoreResult<Option<Photo>> {
        Ok(sqlx::query_as("SELECT * FROM photos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn photos_by_user(&self, user_id: i32) -> StoreResult<Vec<Photo>> {
        Ok(
            sqlx::query_as("SELECT * FROM photos WHERE user_id = $1 ORDER BY created_at DESC, id DESC")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn update_photo_caption(&self, id: i32, caption: Option<&str>) -> StoreResult<Photo> {
        sqlx::query_as("UPDATE photos SET caption = $2, updated_at = NOW() WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(caption)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("photo"))
    }

    async fn delete_photo(&self, id: i32) -> StoreResult<()> {
        // likes and comments go with it through ON DELETE CASCADE
        sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn feed(&self, user_id: i32, offset: i64, limit: i64) -> StoreResult<Vec<Photo>> {
        Ok(sqlx::query_as(
            r#"
            SELECT * FROM photos
            WHERE user_id = $1
                OR user_id IN (SELECT following_id FROM follows WHERE follower_id = $1)
            ORDER BY created_at DESC, id DESC
            OFFSET $2 LIMIT $3"#,
        )
        .bind(user_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn like_exists(&self, user_id: i32, photo_id: i32) -> StoreResult<bool> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM likes WHERE user_id = $1 AND photo_id = $2)")
                .bind(user_id)
                .bind(photo_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn create_like(&self, user_id: i32, photo_id: i32) -> StoreResult<()> {
        sqlx::query("INSERT INTO likes (user_id, photo_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(user_id)
            .bind(photo_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_like(&self, user_id: i32, photo_id: i32) -> StoreResult<()> {
        sqlx::query("DELETE FROM likes WHERE user_id = $1 AND photo_id = $2")
            .bind(user_id)
            .bind(photo_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count_likes(&self, photo_id: i32) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM likes WHERE photo_id = $1")
            .bind(photo_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn photo_likers(&self, photo_id: i32) -> StoreResult<Vec<User>> {
        Ok(sqlx::query_as(
            r#"
            SELECT u.* FROM users u
            INNER JOIN likes l ON l.user_id = u.id
            WHERE l.photo_id = $1
            ORDER BY l.created_at DESC"#,
        )
        .bind(photo_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_comment(&self, user_id: i32, photo_id: i32, payload: &str) -> StoreResult<Comment> {
        Ok(
            sqlx::query_as("INSERT INTO comments (user_id, photo_id, payload) VALUES ($1, $2, $3) RETURNING *")
                .bind(user_id)
                .bind(photo_id)
                .bind(payload)
                .fetch_one(&self.pool)
                .await?,
        )
    }

    async fn comment_by_id(&self, id: i32) -> StoreResult<Option<Comment>> {
        Ok(sqlx::query_as("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_comment(&self, id: i32, payload: &str) -> StoreResult<Comment> {
        sqlx::query_as("UPDATE comments SET payload = $2, updated_at = NOW() WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(payload)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("comment"))
    }

    async fn delete_comment(&self, id: i32) -> StoreResult<()> {
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn comments_for_photo(&self, photo_id: i32, offset: i64, limit: i64) -> StoreResult<Vec<Comment>> {
        Ok(sqlx::query_as(
            "SELECT * FROM comments WHERE photo_id = $1 ORDER BY created_at ASC, id ASC OFFSET $2 LIMIT $3",
        )
        .bind(photo_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn count_comments(&self, photo_id: i32) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE photo_id = $1")
            .bind(photo_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
