use async_graphql::{Context, Object};

use crate::api::v1::gql::error::Result;
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::guards::require_login;
use crate::api::v1::gql::models::comment::Comment;
use crate::api::v1::gql::models::photo::Photo;
use crate::api::v1::gql::models::user::User;

/// Photos per page of `seeFeed`.
pub const FEED_PAGE_SIZE: i64 = 5;
/// Comments per page of `seePhotoComments`.
pub const COMMENT_PAGE_SIZE: i64 = 20;

#[derive(Default)]
pub struct PhotoQuery;

#[Object]
impl PhotoQuery {
    /// Photos of the logged in user and of everyone they follow, newest first.
    async fn see_feed(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "Number of photos to skip.", default = 0, validator(minimum = 0))] offset: i32,
    ) -> Result<Vec<Photo>> {
        let global = ctx.get_global();
        let auth = require_login(ctx).await?;

        let photos = global
            .db
            .feed(auth.user_id(), offset as i64, FEED_PAGE_SIZE)
            .await?;

        Ok(photos.into_iter().map(Into::into).collect())
    }

    async fn see_photo(&self, ctx: &Context<'_>, id: i32) -> Result<Option<Photo>> {
        let photo = ctx.get_global().db.photo_by_id(id).await?;

        Ok(photo.map(Into::into))
    }

    /// The users who like the photo.
    async fn see_photo_likes(&self, ctx: &Context<'_>, id: i32) -> Result<Vec<User>> {
        let users = ctx.get_global().db.photo_likers(id).await?;

        Ok(users.into_iter().map(Into::into).collect())
    }

    /// Comments of the photo, oldest first.
    async fn see_photo_comments(
        &self,
        ctx: &Context<'_>,
        id: i32,
        #[graphql(default = 0, validator(minimum = 0))] offset: i32,
    ) -> Result<Vec<Comment>> {
        let comments = ctx
            .get_global()
            .db
            .comments_for_photo(id, offset as i64, COMMENT_PAGE_SIZE)
            .await?;

        Ok(comments.into_iter().map(Into::into).collect())
    }
}
