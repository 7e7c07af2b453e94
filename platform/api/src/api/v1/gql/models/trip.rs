use async_graphql::{ComplexObject, Context, SimpleObject};
use common::database::Ulid;

use super::comment::Comment;
use super::date::DateRFC3339;
use super::ulid::GqlUlid;
use super::user::User;
use crate::api::v1::gql::error::{GqlError, Result, ResultExt};
use crate::api::v1::gql::ext::ContextExt;
use crate::database;

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Trip {
    pub id: GqlUlid,
    pub country: String,
    pub description: String,
    /// How many confirmed travel buddies the owner is looking for.
    pub capacity: i32,
    pub open_for_more_buddies: bool,
    pub created_at: DateRFC3339,

    // Resolved through loaders below
    #[graphql(skip)]
    pub owner_id_: Ulid,
    #[graphql(skip)]
    pub possible_buddy_ids_: Vec<Ulid>,
    #[graphql(skip)]
    pub confirmed_buddy_ids_: Vec<Ulid>,
}

#[ComplexObject]
impl Trip {
    /// The user who created the trip.
    async fn owner(&self, ctx: &Context<'_>) -> Result<User> {
        let global = ctx.get_global();

        global
            .user_by_id_loader
            .load_one(self.owner_id_)
            .await
            .map_err_gql("failed to fetch user")?
            .map_err_gql(GqlError::NotFound("user"))
            .map(Into::into)
    }

    /// Users proposed as travel buddies, in proposal order.
    async fn possible_buddies(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        load_users_ordered(ctx, &self.possible_buddy_ids_).await
    }

    /// Users confirmed by the owner, in confirmation order.
    async fn buddies(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        load_users_ordered(ctx, &self.confirmed_buddy_ids_).await
    }

    /// Comments posted on the trip, oldest first.
    async fn comments(&self, ctx: &Context<'_>) -> Result<Vec<Comment>> {
        let global = ctx.get_global();

        let comments = global
            .comments_by_trip_id_loader
            .load_one(self.id.into())
            .await
            .map_err_gql("failed to fetch comments")?
            .unwrap_or_default();

        Ok(comments.into_iter().map(Into::into).collect())
    }
}

/// Batch-loads users and returns them in the order of `ids`. Ids that no
/// longer resolve to a user are silently dropped.
async fn load_users_ordered(ctx: &Context<'_>, ids: &[Ulid]) -> Result<Vec<User>> {
    let global = ctx.get_global();

    let mut users = global
        .user_by_id_loader
        .load_many(ids.iter().copied())
        .await
        .map_err_gql("failed to fetch users")?;

    Ok(ids
        .iter()
        .filter_map(|id| users.remove(id))
        .map(Into::into)
        .collect())
}

impl From<database::Trip> for Trip {
    fn from(value: database::Trip) -> Self {
        Self {
            id: value.id.into(),
            country: value.country,
            description: value.description,
            capacity: value.capacity,
            open_for_more_buddies: value.open_for_more_buddies,
            created_at: value.created_at.into(),
            owner_id_: value.owner_id,
            possible_buddy_ids_: value.possible_buddy_ids,
            confirmed_buddy_ids_: value.confirmed_buddy_ids,
        }
    }
}
