use async_graphql::{ComplexObject, Context, SimpleObject};
use chrono::{DateTime, Utc};

use super::photo::Photo;
use super::user::User;
use crate::api::v1::gql::error::{GqlError, Result, ResultExt};
use crate::api::v1::gql::ext::ContextExt;
use crate::database;

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Comment {
    pub id: i32,
    pub payload: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[graphql(skip)]
    pub user_id: i32,
    #[graphql(skip)]
    pub photo_id: i32,
}

#[ComplexObject]
impl Comment {
    /// The author of the comment.
    async fn user(&self, ctx: &Context<'_>) -> Result<User> {
        ctx.get_global()
            .user_by_id_loader
            .load_one(self.user_id)
            .await?
            .map_err_gql(GqlError::NotFound("user"))
            .map(Into::into)
    }

    /// The photo the comment was left on.
    async fn photo(&self, ctx: &Context<'_>) -> Result<Photo> {
        ctx.get_global()
            .db
            .photo_by_id(self.photo_id)
            .await?
            .map_err_gql(GqlError::NotFound("photo"))
            .map(Into::into)
    }

    async fn is_mine(&self, ctx: &Context<'_>) -> bool {
        ctx.get_req_context()
            .auth()
            .await
            .is_some_and(|auth| auth.user_id() == self.user_id)
    }
}

impl From<database::Comment> for Comment {
    fn from(value: database::Comment) -> Self {
        Self {
            id: value.id,
            payload: value.payload,
            created_at: value.created_at,
            updated_at: value.updated_at,
            user_id: value.user_id,
            photo_id: value.photo_id,
        }
    }
}
