use std::sync::Arc;

use common::http::RouteError;
use hyper::Body;
use routerify::Router;

use super::error::ApiError;
use crate::global::GlobalState;

pub mod gql;
pub mod health;
pub mod upload;

pub fn routes(global: &Arc<GlobalState>) -> Router<Body, RouteError<ApiError>> {
    Router::builder()
        .scope("/health", health::routes(global))
        .scope("/gql", gql::routes(global))
        .scope("/upload", upload::routes(global))
        .build()
        .expect("failed to build router")
}
