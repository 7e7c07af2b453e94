use async_graphql::{Context, Object};
use chrono::{Duration, Utc};
use common::database::Ulid;

use crate::api::auth::AuthData;
use crate::api::jwt::{AuthJwtPayload, JwtState};
use crate::api::v1::gql::error::{GqlError, Result, ResultExt};
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::models::session::Session;
use crate::api::v1::gql::validators::{PasswordValidator, UsernameValidator};
use crate::database;

const DEFAULT_VALIDITY_SECS: u32 = 60 * 60 * 24 * 7; // 7 days

#[derive(Default, Clone)]
pub struct AuthMutation;

#[Object]
/// The mutation object for authentication
impl AuthMutation {
    /// Login using a username and password.
    async fn login(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The username of the user.")] username: String,
        #[graphql(desc = "The password of the user.")] password: String,
        #[graphql(desc = "The duration of the session in seconds. If not specified it will be 7 days.")] validity: Option<
            u32,
        >,
        #[graphql(desc = "Setting this to false will make it so logging in does not authenticate the connection.")]
        update_context: Option<bool>,
    ) -> Result<Session> {
        let global = ctx.get_global();
        let request_context = ctx.get_req_context();

        let user = global
            .user_by_username_loader
            .load_one(username.to_lowercase())
            .await
            .map_err_gql("failed to fetch user")?
            .map_err_gql(GqlError::InvalidInput {
                fields: vec!["username", "password"],
                message: "invalid username or password",
            })?;

        if !user.verify_password(&password) {
            return Err(GqlError::InvalidInput {
                fields: vec!["username", "password"],
                message: "invalid username or password",
            }
            .into());
        }

        let expires_at =
            Utc::now() + Duration::seconds(validity.unwrap_or(DEFAULT_VALIDITY_SECS) as i64);

        let jwt = AuthJwtPayload::new(user.id.0, expires_at);
        let token = jwt
            .serialize(&global.config.jwt)
            .ok_or(GqlError::InternalServerError("failed to serialize JWT"))?;

        // We need to update the request context with the new identity
        if update_context.unwrap_or(true) {
            request_context.set_auth(AuthData::from(jwt)).await;
        }

        Ok(Session {
            token,
            user_id: user.id.into(),
            expires_at: expires_at.into(),
        })
    }

    /// If successful will return a new session for the account which just got
    /// created.
    async fn register(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The username of the user.", validator(custom = "UsernameValidator"))] username: String,
        #[graphql(desc = "The password of the user.", validator(custom = "PasswordValidator"))] password: String,
        #[graphql(desc = "The profile description of the user.")] description: Option<String>,
        #[graphql(desc = "The validity of the session in seconds.")] validity: Option<u32>,
        #[graphql(desc = "Setting this to false will make it so logging in does not authenticate the connection.")]
        update_context: Option<bool>,
    ) -> Result<Session> {
        let global = ctx.get_global();
        let request_context = ctx.get_req_context();

        let username = username.to_lowercase();
        let description = description.unwrap_or_default();

        database::User::validate_description(&description).map_err(|e| GqlError::InvalidInput {
            fields: vec!["description"],
            message: e,
        })?;

        if global
            .user_by_username_loader
            .load_one(username.clone())
            .await
            .map_err_gql("failed to fetch user")?
            .is_some()
        {
            return Err(GqlError::InvalidInput {
                fields: vec!["username"],
                message: "username already taken",
            }
            .into());
        }

        let user: database::User = sqlx::query_as(
            r#"
            INSERT INTO users (
                id,
                username,
                password_hash,
                description
            ) VALUES (
                $1,
                $2,
                $3,
                $4
            ) RETURNING *
            "#,
        )
        .bind(Ulid::new())
        .bind(username)
        .bind(database::User::hash_password(&password))
        .bind(description)
        .fetch_one(global.db.as_ref())
        .await?;

        let expires_at =
            Utc::now() + Duration::seconds(validity.unwrap_or(DEFAULT_VALIDITY_SECS) as i64);

        let jwt = AuthJwtPayload::new(user.id.0, expires_at);
        let token = jwt.serialize(&global.config.jwt).map_err_gql("failed to serialize JWT")?;

        // We need to update the request context with the new identity
        if update_context.unwrap_or(true) {
            request_context.set_auth(AuthData::from(jwt)).await;
        }

        Ok(Session {
            token,
            user_id: user.id.into(),
            expires_at: expires_at.into(),
        })
    }

    /// Logout. The token is stateless, so this only clears the authenticated
    /// context of the current connection.
    async fn logout(&self, ctx: &Context<'_>) -> Result<bool> {
        let request_context = ctx.get_req_context();

        request_context.reset_auth().await;

        Ok(true)
    }
}
