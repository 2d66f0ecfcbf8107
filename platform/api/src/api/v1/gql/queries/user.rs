use async_graphql::{Context, Object};

use crate::api::v1::gql::error::{GqlError, Result, ResultExt};
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::guards::require_login;
use crate::api::v1::gql::models::user::{SeeFollowersResult, SeeFollowingResult, User};

/// Users per page of `seeFollowers` and `seeFollowing`.
pub const FOLLOW_PAGE_SIZE: i64 = 5;

fn total_pages(total: i64) -> i64 {
    (total + FOLLOW_PAGE_SIZE - 1) / FOLLOW_PAGE_SIZE
}

fn page_offset(page: i32) -> i64 {
    (page.max(1) as i64 - 1) * FOLLOW_PAGE_SIZE
}

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// The logged in user.
    async fn me(&self, ctx: &Context<'_>) -> Result<User> {
        let global = ctx.get_global();
        let auth = require_login(ctx).await?;

        global
            .user_by_id_loader
            .load_one(auth.user_id())
            .await?
            .map_err_gql(GqlError::NotFound("user"))
            .map(Into::into)
    }

    /// Get a user by their username
    async fn see_profile(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The username of the user.")] username: String,
    ) -> Result<Option<User>> {
        let global = ctx.get_global();

        let user = global.user_by_username_loader.load_one(username).await?;

        Ok(user.map(Into::into))
    }

    /// The users following `username`, five per page.
    async fn see_followers(
        &self,
        ctx: &Context<'_>,
        username: String,
        #[graphql(desc = "1 based page number.")] page: i32,
    ) -> Result<SeeFollowersResult> {
        let global = ctx.get_global();

        let Some(user) = global.user_by_username_loader.load_one(username).await? else {
            return Ok(SeeFollowersResult {
                ok: false,
                error: Some("User not found.".to_string()),
                followers: None,
                total_pages: None,
            });
        };

        let followers = global
            .db
            .followers(user.id, page_offset(page), FOLLOW_PAGE_SIZE)
            .await?;
        let total = global.db.count_followers(user.id).await?;

        Ok(SeeFollowersResult {
            ok: true,
            error: None,
            followers: Some(followers.into_iter().map(Into::into).collect()),
            total_pages: Some(total_pages(total)),
        })
    }

    /// The users `username` follows, five per page.
    async fn see_following(
        &self,
        ctx: &Context<'_>,
        username: String,
        #[graphql(desc = "1 based page number.")] page: i32,
    ) -> Result<SeeFollowingResult> {
        let global = ctx.get_global();

        let Some(user) = global.user_by_username_loader.load_one(username).await? else {
            return Ok(SeeFollowingResult {
                ok: false,
                error: Some("User not found.".to_string()),
                following: None,
                total_pages: None,
            });
        };

        let following = global
            .db
            .following(user.id, page_offset(page), FOLLOW_PAGE_SIZE)
            .await?;
        let total = global.db.count_following(user.id).await?;

        Ok(SeeFollowingResult {
            ok: true,
            error: None,
            following: Some(following.into_iter().map(Into::into).collect()),
            total_pages: Some(total_pages(total)),
        })
    }
}
