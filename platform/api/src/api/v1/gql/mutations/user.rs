use async_graphql::{Context, Object};

use crate::api::auth::AuthError;
use crate::api::v1::gql::error::{GqlError, Result, ResultExt};
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::models::user::User;
use crate::api::v1::gql::validators::{PasswordValidator, UsernameValidator};
use crate::database;

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    /// Update the currently logged in user. Only the provided fields change.
    async fn update(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "New username.", validator(custom = "UsernameValidator"))] username: Option<String>,
        #[graphql(desc = "New password.", validator(custom = "PasswordValidator"))] password: Option<String>,
        #[graphql(desc = "New profile description.")] description: Option<String>,
    ) -> Result<User> {
        let global = ctx.get_global();
        let request_context = ctx.get_req_context();

        let auth = request_context
            .auth()
            .await?
            .ok_or(GqlError::Auth(AuthError::NotLoggedIn))?;

        if let Some(description) = &description {
            database::User::validate_description(description).map_err(|e| {
                GqlError::InvalidInput {
                    fields: vec!["description"],
                    message: e,
                }
            })?;
        }

        let username = username.map(|u| u.to_lowercase());

        if let Some(username) = &username {
            let taken = global
                .user_by_username_loader
                .load_one(username.clone())
                .await
                .map_err_gql("failed to fetch user")?
                .is_some_and(|u| u.id != auth.user_id);

            if taken {
                return Err(GqlError::InvalidInput {
                    fields: vec!["username"],
                    message: "username already taken",
                }
                .into());
            }
        }

        let user: database::User = sqlx::query_as(
            r#"
            UPDATE users
            SET
                username = COALESCE($1, username),
                password_hash = COALESCE($2, password_hash),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE
                id = $4
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(password.as_deref().map(database::User::hash_password))
        .bind(description)
        .bind(auth.user_id)
        .fetch_one(global.db.as_ref())
        .await?;

        Ok(user.into())
    }
}
