use async_graphql::{ComplexObject, Context, SimpleObject};
use chrono::{DateTime, Utc};

use super::comment::Comment;
use super::user::User;
use crate::api::v1::gql::error::{GqlError, Result, ResultExt};
use crate::api::v1::gql::ext::ContextExt;
use crate::database;

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Photo {
    pub id: i32,
    pub file: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[graphql(skip)]
    pub user_id: i32,
}

#[ComplexObject]
impl Photo {
    /// The owner of the photo.
    async fn user(&self, ctx: &Context<'_>) -> Result<User> {
        ctx.get_global()
            .user_by_id_loader
            .load_one(self.user_id)
            .await?
            .map_err_gql(GqlError::NotFound("user"))
            .map(Into::into)
    }

    /// Number of likes.
    async fn likes(&self, ctx: &Context<'_>) -> Result<i64> {
        Ok(ctx.get_global().db.count_likes(self.id).await?)
    }

    async fn comment_number(&self, ctx: &Context<'_>) -> Result<i64> {
        Ok(ctx.get_global().db.count_comments(self.id).await?)
    }

    /// Every comment on the photo, oldest first.
    async fn comments(&self, ctx: &Context<'_>) -> Result<Vec<Comment>> {
        let comments = ctx
            .get_global()
            .db
            .comments_for_photo(self.id, 0, i64::MAX)
            .await?;

        Ok(comments.into_iter().map(Into::into).collect())
    }

    async fn is_mine(&self, ctx: &Context<'_>) -> bool {
        ctx.get_req_context()
            .auth()
            .await
            .is_some_and(|auth| auth.user_id() == self.user_id)
    }

    /// Whether the logged in user likes the photo, false when logged out.
    async fn is_liked(&self, ctx: &Context<'_>) -> Result<bool> {
        let Some(auth) = ctx.get_req_context().auth().await else {
            return Ok(false);
        };

        Ok(ctx.get_global().db.like_exists(auth.user_id(), self.id).await?)
    }
}

impl From<database::Photo> for Photo {
    fn from(value: database::Photo) -> Self {
        Self {
            id: value.id,
            file: value.file,
            caption: value.caption,
            created_at: value.created_at,
            updated_at: value.updated_at,
            user_id: value.user_id,
        }
    }
}
