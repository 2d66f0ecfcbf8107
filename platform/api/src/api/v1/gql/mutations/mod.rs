use async_graphql::MergedObject;

mod comment;
mod photo;
mod user;

#[derive(Default, MergedObject)]
/// The root mutation type which contains root level fields.
pub struct Mutation(user::UserMutation, photo::PhotoMutation, comment::CommentMutation);
