use std::sync::Arc;

use async_graphql::{Context, Object};
use common::database::Ulid;

use crate::api::auth::{AuthData, AuthError};
use crate::api::v1::gql::error::{GqlError, Result, ResultExt};
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::models::trip::Trip;
use crate::api::v1::gql::models::ulid::GqlUlid;
use crate::database;
use crate::database::MembershipError;
use crate::global::GlobalState;

#[derive(Default)]
pub struct TripMutation;

#[Object]
impl TripMutation {
    /// Create a trip. The caller becomes the owner; the buddy lists start
    /// empty and the trip starts open.
    async fn create(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The destination country.")] country: String,
        #[graphql(desc = "A description of the trip.")] description: String,
        #[graphql(desc = "How many travel buddies are sought.")] capacity: i32,
    ) -> Result<Trip> {
        let global = ctx.get_global();
        let auth = auth(ctx).await?;

        validate_input(&description, capacity)?;

        let trip: database::Trip = sqlx::query_as(
            r#"
            INSERT INTO trips (
                id,
                owner_id,
                country,
                description,
                capacity,
                open_for_more_buddies,
                possible_buddy_ids,
                confirmed_buddy_ids
            ) VALUES (
                $1,
                $2,
                $3,
                $4,
                $5,
                TRUE,
                $6,
                $7
            ) RETURNING *
            "#,
        )
        .bind(Ulid::new())
        .bind(auth.user_id)
        .bind(country)
        .bind(description)
        .bind(capacity)
        .bind(Vec::<Ulid>::new())
        .bind(Vec::<Ulid>::new())
        .fetch_one(global.db.as_ref())
        .await?;

        Ok(trip.into())
    }

    /// Update a trip's fields. Only the owner may do this; only the provided
    /// fields change.
    async fn update(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The id of the trip.")] trip_id: GqlUlid,
        #[graphql(desc = "New destination country.")] country: Option<String>,
        #[graphql(desc = "New description.")] description: Option<String>,
        #[graphql(desc = "New number of travel buddies sought.")] capacity: Option<i32>,
        #[graphql(desc = "Whether the trip accepts new buddy proposals.")] open_for_more_buddies: Option<bool>,
    ) -> Result<Trip> {
        let global = ctx.get_global();
        let auth = auth(ctx).await?;

        if let Some(description) = &description {
            database::Trip::validate_description(description).map_err(|e| {
                GqlError::InvalidInput {
                    fields: vec!["description"],
                    message: e,
                }
            })?;
        }

        if let Some(capacity) = capacity {
            database::Trip::validate_capacity(capacity).map_err(|e| GqlError::InvalidInput {
                fields: vec!["capacity"],
                message: e,
            })?;
        }

        let trip = fetch_trip(global, trip_id.into()).await?;

        if !trip.is_owner(auth.user_id) {
            return Err(MembershipError::NotOwnerUpdate.into());
        }

        let trip: database::Trip = sqlx::query_as(
            r#"
            UPDATE trips
            SET
                country = COALESCE($1, country),
                description = COALESCE($2, description),
                capacity = COALESCE($3, capacity),
                open_for_more_buddies = COALESCE($4, open_for_more_buddies),
                updated_at = NOW()
            WHERE
                id = $5
            RETURNING *
            "#,
        )
        .bind(country)
        .bind(description)
        .bind(capacity)
        .bind(open_for_more_buddies)
        .bind(trip.id)
        .fetch_one(global.db.as_ref())
        .await?;

        Ok(trip.into())
    }

    /// Volunteer as a possible travel buddy on a trip.
    async fn add_possible_travel_buddy(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The id of the trip.")] trip_id: GqlUlid,
    ) -> Result<Trip> {
        let global = ctx.get_global();
        let auth = auth(ctx).await?;

        let trip = fetch_trip(global, trip_id.into()).await?;

        let trip = trip.propose_buddy(auth.user_id)?;

        Ok(save_trip(global, trip).await?.into())
    }

    /// Take a user off the possible buddy list. The owner may remove anyone,
    /// a user may withdraw themself.
    async fn remove_possible_travel_buddy(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The id of the trip.")] trip_id: GqlUlid,
        #[graphql(desc = "The user to take off the possible buddy list.")] user_id: GqlUlid,
    ) -> Result<Trip> {
        let global = ctx.get_global();
        let auth = auth(ctx).await?;

        let trip = fetch_trip(global, trip_id.into()).await?;

        let trip = trip.withdraw_buddy(auth.user_id, user_id.into())?;

        Ok(save_trip(global, trip).await?.into())
    }

    /// Confirm a possible travel buddy. Owner only.
    async fn promote_possible_travel_buddy(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The id of the trip.")] trip_id: GqlUlid,
        #[graphql(desc = "The user to promote.")] user_id: GqlUlid,
    ) -> Result<Trip> {
        let global = ctx.get_global();
        let auth = auth(ctx).await?;

        let trip = fetch_trip(global, trip_id.into()).await?;

        let trip = trip.promote_buddy(auth.user_id, user_id.into())?;

        Ok(save_trip(global, trip).await?.into())
    }

    /// Move a confirmed travel buddy back to the possible list. Owner only.
    async fn demote_travel_buddy(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The id of the trip.")] trip_id: GqlUlid,
        #[graphql(desc = "The user to demote.")] user_id: GqlUlid,
    ) -> Result<Trip> {
        let global = ctx.get_global();
        let auth = auth(ctx).await?;

        let trip = fetch_trip(global, trip_id.into()).await?;

        let trip = trip.demote_buddy(auth.user_id, user_id.into())?;

        Ok(save_trip(global, trip).await?.into())
    }

    /// Remove a confirmed travel buddy from the trip. Owner only.
    async fn remove_travel_buddy(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The id of the trip.")] trip_id: GqlUlid,
        #[graphql(desc = "The user to remove.")] user_id: GqlUlid,
    ) -> Result<Trip> {
        let global = ctx.get_global();
        let auth = auth(ctx).await?;

        let trip = fetch_trip(global, trip_id.into()).await?;

        let trip = trip.remove_buddy(auth.user_id, user_id.into())?;

        Ok(save_trip(global, trip).await?.into())
    }
}

async fn auth(ctx: &Context<'_>) -> Result<AuthData> {
    ctx.get_req_context()
        .auth()
        .await?
        .ok_or(GqlError::Auth(AuthError::NotLoggedIn))
        .map_err(Into::into)
}

async fn fetch_trip(global: &Arc<GlobalState>, trip_id: Ulid) -> Result<database::Trip> {
    global
        .trip_by_id_loader
        .load_one(trip_id)
        .await
        .map_err_gql("failed to fetch trip")?
        .map_err_gql(GqlError::NotFound("trip"))
}

/// Persists a membership snapshot as one whole-record save. The read and the
/// write are separate statements, concurrent writers are last-write-wins.
async fn save_trip(global: &Arc<GlobalState>, trip: database::Trip) -> Result<database::Trip> {
    let trip: database::Trip = sqlx::query_as(
        r#"
        UPDATE trips
        SET
            possible_buddy_ids = $1,
            confirmed_buddy_ids = $2,
            updated_at = NOW()
        WHERE
            id = $3
        RETURNING *
        "#,
    )
    .bind(&trip.possible_buddy_ids)
    .bind(&trip.confirmed_buddy_ids)
    .bind(trip.id)
    .fetch_one(global.db.as_ref())
    .await?;

    Ok(trip)
}

fn validate_input(description: &str, capacity: i32) -> Result<()> {
    database::Trip::validate_description(description).map_err(|e| GqlError::InvalidInput {
        fields: vec!["description"],
        message: e,
    })?;

    database::Trip::validate_capacity(capacity).map_err(|e| GqlError::InvalidInput {
        fields: vec!["capacity"],
        message: e,
    })?;

    Ok(())
}
