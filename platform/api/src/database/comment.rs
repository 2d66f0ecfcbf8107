use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    /// The unique identifier for the comment.
    pub id: i32,
    /// Foreign key to the author.
    pub user_id: i32,
    /// Foreign key to the commented photo.
    pub photo_id: i32,
    pub payload: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
