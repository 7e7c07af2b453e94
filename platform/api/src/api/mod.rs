use std::sync::Arc;

use anyhow::{anyhow, Result};
use common::http::RouteError;
use common::make_response;
use hyper::{Body, Server, StatusCode};
use routerify::{Router, RouterService};
use serde_json::json;

use self::error::ApiError;
use crate::global::GlobalState;

pub mod auth;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod request_context;
pub mod v1;

pub fn routes(global: &Arc<GlobalState>) -> Router<Body, RouteError<ApiError>> {
    let weak = Arc::downgrade(global);
    Router::builder()
        .data(weak)
        // The CORS middleware adds the CORS headers to the response
        .middleware(middleware::cors::cors_middleware(global))
        // The auth middleware checks the Authorization header, and if it's valid, it attaches the
        // verified identity to the request context. This way we can access the caller in the
        // handlers; it does not fail the request if the token is absent.
        .middleware(middleware::auth::auth_middleware(global))
        .scope("/v1", v1::routes(global))
        .err_handler_with_info(common::http::error_handler::<ApiError>)
        .any(|_| async move {
            Ok(make_response!(
                StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                })
            ))
        })
        .build()
        .expect("failed to build router")
}

pub async fn run(global: Arc<GlobalState>) -> Result<()> {
    let bind_address = global.config.api.bind_address;

    tracing::info!("listening on {}", bind_address);

    let router = routes(&global);
    let service =
        RouterService::new(router).map_err(|e| anyhow!("failed to build router service: {e}"))?;

    let ctx = global.ctx.clone();

    // The router only holds a weak reference to the global state, so in-flight
    // keep-alive connections cannot stall the shutdown.
    drop(global);

    Server::bind(&bind_address)
        .serve(service)
        .with_graceful_shutdown(async move {
            ctx.done().await;
        })
        .await?;

    Ok(())
}
