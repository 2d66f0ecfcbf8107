use async_graphql::{ComplexObject, Context, SimpleObject};
use chrono::{DateTime, Utc};

use super::photo::Photo;
use crate::api::v1::gql::error::Result;
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::guards::auth_guard;
use crate::database;

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // Private fields
    #[graphql(skip)]
    pub email_: String,
}

#[ComplexObject]
impl User {
    /// Only visible to the user themselves.
    async fn email(&self, ctx: &Context<'_>) -> Result<&str> {
        auth_guard(ctx, "email", self.email_.as_str(), self.id).await
    }

    async fn total_following(&self, ctx: &Context<'_>) -> Result<i64> {
        Ok(ctx.get_global().db.count_following(self.id).await?)
    }

    async fn total_followers(&self, ctx: &Context<'_>) -> Result<i64> {
        Ok(ctx.get_global().db.count_followers(self.id).await?)
    }

    /// Whether the logged in user follows this user, false when logged out.
    async fn is_following(&self, ctx: &Context<'_>) -> Result<bool> {
        let Some(auth) = ctx.get_req_context().auth().await else {
            return Ok(false);
        };

        Ok(ctx.get_global().db.is_following(auth.user_id(), self.id).await?)
    }

    async fn is_me(&self, ctx: &Context<'_>) -> bool {
        ctx.get_req_context()
            .auth()
            .await
            .is_some_and(|auth| auth.user_id() == self.id)
    }

    async fn photos(&self, ctx: &Context<'_>) -> Result<Vec<Photo>> {
        let photos = ctx.get_global().db.photos_by_user(self.id).await?;
        Ok(photos.into_iter().map(Into::into).collect())
    }
}

impl From<database::User> for User {
    fn from(value: database::User) -> Self {
        Self {
            id: value.id,
            username: value.username,
            first_name: value.first_name,
            last_name: value.last_name,
            bio: value.bio,
            avatar: value.avatar,
            created_at: value.created_at,
            updated_at: value.updated_at,
            email_: value.email,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct SeeFollowersResult {
    pub ok: bool,
    pub error: Option<String>,
    pub followers: Option<Vec<User>>,
    pub total_pages: Option<i64>,
}

#[derive(SimpleObject, Clone)]
pub struct SeeFollowingResult {
    pub ok: bool,
    pub error: Option<String>,
    pub following: Option<Vec<User>>,
    pub total_pages: Option<i64>,
}
