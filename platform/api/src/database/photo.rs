use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Photo {
    /// The unique identifier for the photo.
    pub id: i32,
    /// Foreign key to the owning user.
    pub user_id: i32,
    /// URL of the uploaded file.
    pub file: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Photo {
    pub fn is_owned_by(&self, user_id: i32) -> bool {
        self.user_id == user_id
    }
}
