use async_graphql::{Context, Object};

use crate::api::v1::gql::error::Result;
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::guards::protected;
use crate::api::v1::gql::models::mutation_response::{CreateCommentResult, MutationResponse};
use crate::database::Comment;
use crate::global::GlobalState;

const EMPTY_COMMENT: &str = "Comment can't be empty.";

/// Loads a comment the user is allowed to change, or the response explaining
/// why they are not.
async fn own_comment(global: &GlobalState, user_id: i32, id: i32) -> Result<Result<Comment, MutationResponse>> {
    let comment = match global.db.comment_by_id(id).await? {
        Some(comment) => comment,
        None => return Ok(Err(MutationResponse::failure("Comment not found."))),
    };

    if comment.user_id != user_id {
        return Ok(Err(MutationResponse::failure("Not authorized.")));
    }

    Ok(Ok(comment))
}

#[derive(Default)]
pub struct CommentMutation;

#[Object]
/// Comment mutations.
impl CommentMutation {
    async fn create_comment(&self, ctx: &Context<'_>, photo_id: i32, payload: String) -> Result<CreateCommentResult> {
        let global = ctx.get_global();

        protected(ctx, |auth| async move {
            if payload.trim().is_empty() {
                return Ok(CreateCommentResult::failure(EMPTY_COMMENT));
            }

            if global.db.photo_by_id(photo_id).await?.is_none() {
                return Ok(CreateCommentResult::failure("Photo not found."));
            }

            let comment = global.db.create_comment(auth.user_id(), photo_id, &payload).await?;

            Ok(CreateCommentResult {
                ok: true,
                error: None,
                id: Some(comment.id),
            })
        })
        .await
    }

    async fn edit_comment(&self, ctx: &Context<'_>, id: i32, payload: String) -> Result<MutationResponse> {
        let global = ctx.get_global();

        protected(ctx, |auth| async move {
            if let Err(response) = own_comment(global, auth.user_id(), id).await? {
                return Ok(response);
            }

            if payload.trim().is_empty() {
                return Ok(MutationResponse::failure(EMPTY_COMMENT));
            }

            global.db.update_comment(id, &payload).await?;

            Ok(MutationResponse::success())
        })
        .await
    }

    async fn delete_comment(&self, ctx: &Context<'_>, id: i32) -> Result<MutationResponse> {
        let global = ctx.get_global();

        protected(ctx, |auth| async move {
            if let Err(response) = own_comment(global, auth.user_id(), id).await? {
                return Ok(response);
            }

            global.db.delete_comment(id).await?;

            Ok(MutationResponse::success())
        })
        .await
    }
}
