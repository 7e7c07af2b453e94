use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::dataloader::{DataLoader, Loader};
use common::database::Ulid;

use crate::database::Comment;

/// Loads all comments of a trip, oldest first.
pub struct CommentsByTripIdLoader {
    db: Arc<common::database::Pool>,
}

impl CommentsByTripIdLoader {
    pub fn new(db: Arc<common::database::Pool>) -> DataLoader<Self> {
        DataLoader::new(Self { db }, tokio::spawn)
    }
}

impl Loader<Ulid> for CommentsByTripIdLoader {
    type Error = Arc<sqlx::Error>;
    type Value = Vec<Comment>;

    async fn load(&self, keys: &[Ulid]) -> Result<HashMap<Ulid, Self::Value>, Self::Error> {
        let results: Vec<Comment> =
            sqlx::query_as("SELECT * FROM comments WHERE trip_id = ANY($1) ORDER BY created_at ASC")
                .bind(keys)
                .fetch_all(self.db.as_ref())
                .await
                .map_err(|e| {
                    tracing::error!(err = %e, "failed to fetch comments by trip id");
                    Arc::new(e)
                })?;

        let mut map: HashMap<Ulid, Vec<Comment>> = HashMap::new();
        for comment in results {
            map.entry(comment.trip_id).or_default().push(comment);
        }

        Ok(map)
    }
}
