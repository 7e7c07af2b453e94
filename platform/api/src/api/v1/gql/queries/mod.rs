use async_graphql::SimpleObject;

mod trip;
mod user;

#[derive(Default, SimpleObject)]
/// The root query type which contains root level fields.
pub struct Query {
    user: user::UserQuery,
    trip: trip::TripQuery,
}
