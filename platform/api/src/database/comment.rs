use chrono::{DateTime, Utc};

use super::Ulid;

#[derive(PartialEq, Eq, Clone, Debug, thiserror::Error)]
pub enum CommentError {
    #[error("You are not the author of this comment, and cannot update it")]
    NotAuthorUpdate,
    #[error("You are not the author of this comment, and cannot delete it")]
    NotAuthorDelete,
}

impl CommentError {
    pub fn kind(&self) -> &'static str {
        match self {
            CommentError::NotAuthorUpdate | CommentError::NotAuthorDelete => "Forbidden",
        }
    }
}

#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct Comment {
    /// The unique identifier for the comment.
    pub id: Ulid,
    /// The trip the comment was posted on.
    pub trip_id: Ulid,
    /// The user who wrote the comment.
    pub author_id: Ulid,
    /// The comment body.
    pub text: String,
    /// The time the comment was created.
    pub created_at: DateTime<Utc>,
    /// The time the comment was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn is_author(&self, user_id: Ulid) -> bool {
        self.author_id == user_id
    }
}
