use async_graphql::{Context, Object};
use common::database::Ulid;

use crate::api::auth::AuthError;
use crate::api::v1::gql::error::{GqlError, Result, ResultExt};
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::models::comment::Comment;
use crate::api::v1::gql::models::ulid::GqlUlid;
use crate::database;
use crate::database::CommentError;

#[derive(Default)]
pub struct CommentMutation;

#[Object]
impl CommentMutation {
    /// Post a comment on a trip.
    async fn create(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The id of the trip to comment on.")] trip_id: GqlUlid,
        #[graphql(desc = "The comment body.")] text: String,
    ) -> Result<Comment> {
        let global = ctx.get_global();
        let auth = ctx
            .get_req_context()
            .auth()
            .await?
            .ok_or(GqlError::Auth(AuthError::NotLoggedIn))?;

        // The trip must exist to be commented on.
        global
            .trip_by_id_loader
            .load_one(Ulid::from(trip_id))
            .await
            .map_err_gql("failed to fetch trip")?
            .map_err_gql(GqlError::NotFound("trip"))?;

        let comment: database::Comment = sqlx::query_as(
            r#"
            INSERT INTO comments (
                id,
                trip_id,
                author_id,
                text
            ) VALUES (
                $1,
                $2,
                $3,
                $4
            ) RETURNING *
            "#,
        )
        .bind(Ulid::new())
        .bind(Ulid::from(trip_id))
        .bind(auth.user_id)
        .bind(text)
        .fetch_one(global.db.as_ref())
        .await?;

        Ok(comment.into())
    }

    /// Edit a comment. Author only.
    async fn update(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The id of the comment.")] comment_id: GqlUlid,
        #[graphql(desc = "The new comment body.")] text: String,
    ) -> Result<Comment> {
        let global = ctx.get_global();
        let auth = ctx
            .get_req_context()
            .auth()
            .await?
            .ok_or(GqlError::Auth(AuthError::NotLoggedIn))?;

        let comment = fetch_comment(ctx, comment_id).await?;

        if !comment.is_author(auth.user_id) {
            return Err(CommentError::NotAuthorUpdate.into());
        }

        let comment: database::Comment = sqlx::query_as(
            r#"
            UPDATE comments
            SET
                text = $1,
                updated_at = NOW()
            WHERE
                id = $2
            RETURNING *
            "#,
        )
        .bind(text)
        .bind(comment.id)
        .fetch_one(global.db.as_ref())
        .await?;

        Ok(comment.into())
    }

    /// Delete a comment. Author only.
    async fn remove(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The id of the comment.")] comment_id: GqlUlid,
    ) -> Result<bool> {
        let global = ctx.get_global();
        let auth = ctx
            .get_req_context()
            .auth()
            .await?
            .ok_or(GqlError::Auth(AuthError::NotLoggedIn))?;

        let comment = fetch_comment(ctx, comment_id).await?;

        if !comment.is_author(auth.user_id) {
            return Err(CommentError::NotAuthorDelete.into());
        }

        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment.id)
            .execute(global.db.as_ref())
            .await?;

        Ok(true)
    }
}

async fn fetch_comment(ctx: &Context<'_>, comment_id: GqlUlid) -> Result<database::Comment> {
    let global = ctx.get_global();

    let comment: Option<database::Comment> =
        sqlx::query_as("SELECT * FROM comments WHERE id = $1")
            .bind(Ulid::from(comment_id))
            .fetch_optional(global.db.as_ref())
            .await?;

    comment.map_err_gql(GqlError::NotFound("comment"))
}
