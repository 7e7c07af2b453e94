use async_graphql::{Context, Object};

use crate::api::v1::gql::error::{GqlError, Result, ResultExt};
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::models::trip::Trip;
use crate::api::v1::gql::models::ulid::GqlUlid;
use crate::database;

/// All trip queries
#[derive(Default)]
pub struct TripQuery;

#[Object]
impl TripQuery {
    /// Get a trip by its id
    async fn by_id(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The id of the trip.")] id: GqlUlid,
    ) -> Result<Trip> {
        let global = ctx.get_global();

        global
            .trip_by_id_loader
            .load_one(id.into())
            .await
            .map_err_gql("failed to fetch trip")?
            .map_err_gql(GqlError::NotFound("trip"))
            .map(Into::into)
    }

    /// List every trip, newest first.
    async fn all(&self, ctx: &Context<'_>) -> Result<Vec<Trip>> {
        let global = ctx.get_global();

        let trips: Vec<database::Trip> =
            sqlx::query_as("SELECT * FROM trips ORDER BY created_at DESC")
                .fetch_all(global.db.as_ref())
                .await?;

        Ok(trips.into_iter().map(Into::into).collect())
    }

    /// List the trips a user has created, newest first.
    async fn by_owner_id(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The id of the owner.")] owner_id: GqlUlid,
    ) -> Result<Vec<Trip>> {
        let global = ctx.get_global();

        let trips: Vec<database::Trip> =
            sqlx::query_as("SELECT * FROM trips WHERE owner_id = $1 ORDER BY created_at DESC")
                .bind(common::database::Ulid::from(owner_id))
                .fetch_all(global.db.as_ref())
                .await?;

        Ok(trips.into_iter().map(Into::into).collect())
    }
}
