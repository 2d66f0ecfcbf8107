use async_graphql::{Context, Object};

use crate::api::jwt::JwtState;
use crate::api::v1::gql::error::{GqlError, Result, ResultExt};
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::guards::protected;
use crate::api::v1::gql::models::mutation_response::{LoginResult, MutationResponse};
use crate::database::{self, StoreError, UserUpdate};

#[derive(Default)]
pub struct UserMutation;

#[Object]
/// Account and follow mutations.
impl UserMutation {
    /// Creates a new account. Usernames and emails are unique.
    async fn create_account(
        &self,
        ctx: &Context<'_>,
        first_name: String,
        last_name: Option<String>,
        username: String,
        email: String,
        password: String,
    ) -> Result<MutationResponse> {
        let global = ctx.get_global();

        if let Err(message) = database::User::validate_username(&username)
            .and_then(|_| database::User::validate_email(&email))
            .and_then(|_| database::User::validate_password(&password))
        {
            return Ok(MutationResponse::failure(message));
        }

        if global
            .db
            .user_by_username_or_email(&username, &email)
            .await?
            .is_some()
        {
            return Ok(MutationResponse::failure("This username/email is already taken."));
        }

        let password_hash =
            database::User::hash_password(&password).map_err_gql("failed to hash password")?;

        match global
            .db
            .create_user(database::NewUser {
                username,
                email,
                password_hash,
                first_name,
                last_name,
            })
            .await
        {
            Ok(user) => {
                tracing::info!(user_id = user.id, "account created");
                Ok(MutationResponse::success())
            }
            // Lost a race against another signup with the same username or email
            Err(StoreError::Conflict(_)) => Ok(MutationResponse::failure("This username/email is already taken.")),
            Err(err) => Err(err.into()),
        }
    }

    /// Exchanges a username and password for a session token.
    async fn login(&self, ctx: &Context<'_>, username: String, password: String) -> Result<LoginResult> {
        let global = ctx.get_global();

        let Some(user) = global.user_by_username_loader.load_one(username).await? else {
            return Ok(LoginResult::failure("User not found."));
        };

        if !user.verify_password(&password) {
            return Ok(LoginResult::failure("Incorrect password."));
        }

        let token = JwtState::new(&global.config.jwt, user.id)
            .and_then(|state| state.serialize(&global.config.jwt))
            .ok_or(GqlError::InternalServerError("failed to create JWT"))?;

        Ok(LoginResult {
            ok: true,
            token: Some(token),
            error: None,
        })
    }

    /// Updates the profile of the logged in user. Omitted fields are left unchanged.
    #[allow(clippy::too_many_arguments)]
    async fn edit_profile(
        &self,
        ctx: &Context<'_>,
        first_name: Option<String>,
        last_name: Option<String>,
        username: Option<String>,
        email: Option<String>,
        password: Option<String>,
        bio: Option<String>,
        avatar: Option<String>,
    ) -> Result<MutationResponse> {
        let global = ctx.get_global();

        protected(ctx, |auth| async move {
            let checks = username
                .as_deref()
                .map(database::User::validate_username)
                .into_iter()
                .chain(email.as_deref().map(database::User::validate_email))
                .chain(password.as_deref().map(database::User::validate_password));

            for check in checks {
                if let Err(message) = check {
                    return Ok(MutationResponse::failure(message));
                }
            }

            let password_hash = match password {
                Some(password) => {
                    Some(database::User::hash_password(&password).map_err_gql("failed to hash password")?)
                }
                None => None,
            };

            let update = UserUpdate {
                username,
                email,
                password_hash,
                first_name,
                last_name,
                bio,
                avatar,
            };

            match global.db.update_user(auth.user_id(), update).await {
                Ok(_) => Ok(MutationResponse::success()),
                Err(StoreError::Conflict(_)) | Err(StoreError::NotFound(_)) => {
                    Ok(MutationResponse::failure("Could not update profile."))
                }
                Err(err) => Err(err.into()),
            }
        })
        .await
    }

    /// Follows the user with the given username.
    async fn follow_user(&self, ctx: &Context<'_>, username: String) -> Result<MutationResponse> {
        let global = ctx.get_global();

        protected(ctx, |auth| async move {
            let Some(target) = global.db.user_by_username(&username).await? else {
                return Ok(MutationResponse::failure("That user does not exist."));
            };

            if target.id == auth.user_id() {
                return Ok(MutationResponse::failure("You can't follow yourself."));
            }

            global.db.follow(auth.user_id(), target.id).await?;

            Ok(MutationResponse::success())
        })
        .await
    }

    /// Stops following the user with the given username.
    async fn unfollow_user(&self, ctx: &Context<'_>, username: String) -> Result<MutationResponse> {
        let global = ctx.get_global();

        protected(ctx, |auth| async move {
            let Some(target) = global.db.user_by_username(&username).await? else {
                return Ok(MutationResponse::failure("Can't unfollow user."));
            };

            // Removing a relation that does not exist is a no-op
            global.db.unfollow(auth.user_id(), target.id).await?;

            Ok(MutationResponse::success())
        })
        .await
    }
}
