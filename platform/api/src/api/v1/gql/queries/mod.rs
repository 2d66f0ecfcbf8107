use async_graphql::MergedObject;

mod photo;
mod user;

#[derive(Default, MergedObject)]
/// The root query type which contains root level fields.
pub struct Query(user::UserQuery, photo::PhotoQuery);
