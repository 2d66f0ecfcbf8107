use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// The unique identifier for the user.
    pub id: i32,
    /// The username of the user, unique.
    pub username: String,
    /// The email of the user, unique.
    pub email: String,
    /// The hashed password of the user. (argon2)
    pub password_hash: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    /// URL of the avatar image.
    pub avatar: Option<String>,
    /// The time the user was created.
    pub created_at: DateTime<Utc>,
    /// The time the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a user. The password is hashed before it reaches
/// the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: Option<String>,
}

/// A partial update of a user, `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

impl User {
    /// Uses argon2 to verify the password hash against the provided password.
    pub fn verify_password(&self, password: &str) -> bool {
        let hash = match PasswordHash::new(&self.password_hash) {
            Ok(hash) => hash,
            Err(err) => {
                tracing::error!("failed to parse password hash: {}", err);
                return false;
            }
        };

        Argon2::default().verify_password(password.as_bytes(), &hash).is_ok()
    }

    /// Generates a new password hash using argon2.
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);

        Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
    }

    /// Validates a username.
    pub fn validate_username(username: &str) -> Result<(), &'static str> {
        if username.len() < 3 {
            return Err("Username must be at least 3 characters long");
        }

        if username.len() > 20 {
            return Err("Username must be at most 20 characters long");
        }

        if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err("Username must only contain alphanumeric characters and underscores");
        }

        Ok(())
    }

    /// Validates a password.
    pub fn validate_password(password: &str) -> Result<(), &'static str> {
        if password.len() < 8 {
            return Err("Password must be at least 8 characters long");
        }

        if password.len() > 100 {
            return Err("Password must be at most 100 characters long");
        }

        Ok(())
    }

    /// Validates an email.
    pub fn validate_email(email: &str) -> Result<(), &'static str> {
        if email.len() > 100 {
            return Err("Email must be at most 100 characters long");
        }

        if !email_address::EmailAddress::is_valid(email) {
            return Err("Email is not a valid email address");
        }

        Ok(())
    }
}
