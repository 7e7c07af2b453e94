use std::sync::Arc;

use anyhow::Result;
use async_graphql::dataloader::DataLoader;
use common::config::S3BucketConfig;
use common::context::Context;
use s3::creds::Credentials;
use s3::{Bucket, Region};

use crate::config::AppConfig;
use crate::dataloader::comment::CommentsByTripIdLoader;
use crate::dataloader::trip::TripByIdLoader;
use crate::dataloader::user::{UserByIdLoader, UserByUsernameLoader};

pub struct GlobalState {
    pub config: AppConfig,
    pub ctx: Context,
    pub db: Arc<common::database::Pool>,
    pub profile_picture_bucket: Bucket,

    pub user_by_id_loader: DataLoader<UserByIdLoader>,
    pub user_by_username_loader: DataLoader<UserByUsernameLoader>,
    pub trip_by_id_loader: DataLoader<TripByIdLoader>,
    pub comments_by_trip_id_loader: DataLoader<CommentsByTripIdLoader>,
}

impl GlobalState {
    pub fn new(config: AppConfig, db: Arc<common::database::Pool>, ctx: Context) -> Result<Self> {
        let profile_picture_bucket = bucket(&config.profile_pictures.bucket)?;

        Ok(Self {
            user_by_id_loader: UserByIdLoader::new(db.clone()),
            user_by_username_loader: UserByUsernameLoader::new(db.clone()),
            trip_by_id_loader: TripByIdLoader::new(db.clone()),
            comments_by_trip_id_loader: CommentsByTripIdLoader::new(db.clone()),
            profile_picture_bucket,
            config,
            ctx,
            db,
        })
    }
}

fn bucket(config: &S3BucketConfig) -> Result<Bucket> {
    let region = match &config.endpoint {
        Some(endpoint) => Region::Custom {
            region: config.region.clone(),
            endpoint: endpoint.clone(),
        },
        None => config.region.parse()?,
    };

    let credentials = Credentials::new(
        config.credentials.access_key.as_deref(),
        config.credentials.secret_key.as_deref(),
        None,
        None,
        None,
    )?;

    Ok(Bucket::new(&config.name, region, credentials)?.with_path_style())
}
