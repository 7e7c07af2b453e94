use async_graphql::{ComplexObject, Context, SimpleObject};
use common::database::Ulid;

use super::date::DateRFC3339;
use super::ulid::GqlUlid;
use super::user::User;
use crate::api::v1::gql::error::{GqlError, Result, ResultExt};
use crate::api::v1::gql::ext::ContextExt;
use crate::database;

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Comment {
    pub id: GqlUlid,
    pub text: String,
    pub created_at: DateRFC3339,

    #[graphql(skip)]
    pub author_id_: Ulid,
    #[graphql(skip)]
    pub trip_id_: Ulid,
}

#[ComplexObject]
impl Comment {
    /// The user who wrote the comment.
    async fn author(&self, ctx: &Context<'_>) -> Result<User> {
        let global = ctx.get_global();

        global
            .user_by_id_loader
            .load_one(self.author_id_)
            .await
            .map_err_gql("failed to fetch user")?
            .map_err_gql(GqlError::NotFound("user"))
            .map(Into::into)
    }

    /// The trip the comment was posted on.
    async fn trip(&self, ctx: &Context<'_>) -> Result<super::trip::Trip> {
        let global = ctx.get_global();

        global
            .trip_by_id_loader
            .load_one(self.trip_id_)
            .await
            .map_err_gql("failed to fetch trip")?
            .map_err_gql(GqlError::NotFound("trip"))
            .map(Into::into)
    }
}

impl From<database::Comment> for Comment {
    fn from(value: database::Comment) -> Self {
        Self {
            id: value.id.into(),
            text: value.text,
            created_at: value.created_at.into(),
            author_id_: value.author_id,
            trip_id_: value.trip_id,
        }
    }
}
