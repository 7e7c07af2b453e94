use async_graphql::SimpleObject;

mod auth;
mod comment;
mod trip;
mod user;

#[derive(Default, SimpleObject)]
/// The root mutation type which contains root level fields.
pub struct Mutation {
    auth: auth::AuthMutation,
    user: user::UserMutation,
    trip: trip::TripMutation,
    comment: comment::CommentMutation,
}
