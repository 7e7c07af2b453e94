use std::sync::Arc;

use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql::{extensions, EmptySubscription, Schema};
use common::http::RouteError;
use hyper::{Body, Response};
use routerify::Router;

use crate::api::error::ApiError;
use crate::global::GlobalState;

pub mod error;
pub mod ext;
pub mod handlers;
pub mod models;
pub mod mutations;
pub mod queries;
pub mod validators;

pub type MySchema = Schema<queries::Query, mutations::Mutation, EmptySubscription>;

pub fn schema() -> MySchema {
    Schema::build(
        queries::Query::default(),
        mutations::Mutation::default(),
        EmptySubscription,
    )
    .extension(extensions::Analyzer)
    .extension(extensions::Tracing)
    .limit_complexity(200) // We don't want to allow too complex queries to be executed
    .finish()
}

pub fn routes(_global: &Arc<GlobalState>) -> Router<Body, RouteError<ApiError>> {
    Router::builder()
        .data(schema())
        .get("/", handlers::graphql_handler)
        .post("/", handlers::graphql_handler)
        .options("/", handlers::graphql_handler)
        .get("/playground", |_| async move {
            Ok(Response::builder()
                .status(200)
                .header("content-type", "text/html")
                .body(Body::from(playground_source(
                    GraphQLPlaygroundConfig::new("/v1/gql"),
                )))
                .expect("failed to build response"))
        })
        .build()
        .expect("failed to build router")
}
