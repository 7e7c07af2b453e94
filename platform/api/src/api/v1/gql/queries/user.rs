use async_graphql::{Context, Object};

use crate::api::auth::AuthError;
use crate::api::v1::gql::error::{GqlError, Result, ResultExt};
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::models::ulid::GqlUlid;
use crate::api::v1::gql::models::user::User;
use crate::database;

/// All user queries
#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// Get the user of the current context.
    async fn with_current_context(&self, ctx: &Context<'_>) -> Result<User> {
        let global = ctx.get_global();
        let auth = ctx
            .get_req_context()
            .auth()
            .await?
            .ok_or(GqlError::Auth(AuthError::NotLoggedIn))?;

        global
            .user_by_id_loader
            .load_one(auth.user_id)
            .await
            .map_err_gql("failed to fetch user")?
            .map_err_gql(GqlError::NotFound("user"))
            .map(Into::into)
    }

    /// Get a user by their username
    async fn by_username(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The username of the user.")] username: String,
    ) -> Result<Option<User>> {
        let global = ctx.get_global();

        let user = global
            .user_by_username_loader
            .load_one(username.to_lowercase())
            .await
            .map_err_gql("failed to fetch user")?;

        Ok(user.map(Into::into))
    }

    /// Get a user by their id
    async fn by_id(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The id of the user.")] id: GqlUlid,
    ) -> Result<Option<User>> {
        let global = ctx.get_global();

        let user = global
            .user_by_id_loader
            .load_one(id.into())
            .await
            .map_err_gql("failed to fetch user")?;

        Ok(user.map(User::from))
    }

    /// List every user, alphabetically.
    async fn all(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let global = ctx.get_global();

        let users: Vec<database::User> =
            sqlx::query_as("SELECT * FROM users ORDER BY username ASC")
                .fetch_all(global.db.as_ref())
                .await?;

        Ok(users.into_iter().map(Into::into).collect())
    }
}
