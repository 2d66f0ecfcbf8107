use async_graphql::{Context, Object};

use crate::api::v1::gql::error::{GqlError, Result};
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::guards::{protected, require_login};
use crate::api::v1::gql::models::mutation_response::MutationResponse;
use crate::api::v1::gql::models::photo::Photo;

#[derive(Default)]
pub struct PhotoMutation;

#[Object]
/// Photo and like mutations.
impl PhotoMutation {
    /// Posts a photo for the logged in user. `file` is the URL of the already
    /// stored image.
    async fn upload_photo(&self, ctx: &Context<'_>, file: String, caption: Option<String>) -> Result<Photo> {
        let global = ctx.get_global();
        let auth = require_login(ctx).await?;

        if file.trim().is_empty() {
            return Err(GqlError::InvalidInput {
                fields: vec!["file"],
                message: "file must not be empty",
            }
            .into());
        }

        let photo = global
            .db
            .create_photo(auth.user_id(), &file, caption.as_deref())
            .await?;

        Ok(photo.into())
    }

    /// Replaces the caption of a photo owned by the logged in user.
    async fn edit_photo(&self, ctx: &Context<'_>, id: i32, caption: Option<String>) -> Result<MutationResponse> {
        let global = ctx.get_global();

        protected(ctx, |auth| async move {
            match global.db.photo_by_id(id).await? {
                Some(photo) if photo.is_owned_by(auth.user_id()) => {}
                _ => return Ok(MutationResponse::failure("Photo not found.")),
            }

            global.db.update_photo_caption(id, caption.as_deref()).await?;

            Ok(MutationResponse::success())
        })
        .await
    }

    /// Deletes a photo owned by the logged in user, along with its likes and
    /// comments.
    async fn delete_photo(&self, ctx: &Context<'_>, photo_id: i32) -> Result<MutationResponse> {
        let global = ctx.get_global();

        protected(ctx, |auth| async move {
            let Some(photo) = global.db.photo_by_id(photo_id).await? else {
                return Ok(MutationResponse::failure("사진이 존재하지 않습니다."));
            };

            if !photo.is_owned_by(auth.user_id()) {
                return Ok(MutationResponse::failure("권한이 없습니다."));
            }

            global.db.delete_photo(photo_id).await?;

            tracing::debug!(photo_id, user_id = auth.user_id(), "photo deleted");

            Ok(MutationResponse::success())
        })
        .await
    }

    /// Likes the photo, or removes the like when the logged in user already
    /// likes it.
    async fn toggle_like_photo(&self, ctx: &Context<'_>, id: i32) -> Result<MutationResponse> {
        let global = ctx.get_global();

        protected(ctx, |auth| async move {
            if global.db.photo_by_id(id).await?.is_none() {
                return Ok(MutationResponse::failure("Photo not found."));
            }

            if global.db.like_exists(auth.user_id(), id).await? {
                global.db.delete_like(auth.user_id(), id).await?;
            } else {
                global.db.create_like(auth.user_id(), id).await?;
            }

            Ok(MutationResponse::success())
        })
        .await
    }
}
