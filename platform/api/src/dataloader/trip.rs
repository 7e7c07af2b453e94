use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::dataloader::{DataLoader, Loader};
use common::database::Ulid;

use crate::database::Trip;

pub struct TripByIdLoader {
    db: Arc<common::database::Pool>,
}

impl TripByIdLoader {
    pub fn new(db: Arc<common::database::Pool>) -> DataLoader<Self> {
        DataLoader::new(Self { db }, tokio::spawn)
    }
}

impl Loader<Ulid> for TripByIdLoader {
    type Error = Arc<sqlx::Error>;
    type Value = Trip;

    async fn load(&self, keys: &[Ulid]) -> Result<HashMap<Ulid, Self::Value>, Self::Error> {
        let results: Vec<Trip> = sqlx::query_as("SELECT * FROM trips WHERE id = ANY($1)")
            .bind(keys)
            .fetch_all(self.db.as_ref())
            .await
            .map_err(|e| {
                tracing::error!(err = %e, "failed to fetch trips by id");
                Arc::new(e)
            })?;

        Ok(results.into_iter().map(|t| (t.id, t)).collect())
    }
}
