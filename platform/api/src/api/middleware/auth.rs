use std::sync::Arc;

use common::database::Ulid;
use common::http::ext::{RequestGlobalExt, ResultExt};
use common::http::RouteError;
use hyper::http::header;
use hyper::{Body, StatusCode};
use routerify::prelude::RequestExt;
use routerify::Middleware;

use crate::api::auth::{AuthData, AuthError};
use crate::api::error::ApiError;
use crate::api::jwt::{AuthJwtPayload, JwtState};
use crate::api::request_context::RequestContext;
use crate::global::GlobalState;

pub fn auth_middleware(_: &Arc<GlobalState>) -> Middleware<Body, RouteError<ApiError>> {
    Middleware::pre(|req| async move {
        let context = RequestContext::default();
        req.set_context(context.clone());

        let Some(token) = req.headers().get(header::AUTHORIZATION) else {
            // No Authorization header
            return Ok(req);
        };

        let global = req.get_global::<GlobalState>()?;

        let token = token
            .to_str()
            .map_err(|_| AuthError::HeaderToStr)?
            .strip_prefix("Bearer ") // Tokens will start with "Bearer " so we need to remove that
            .ok_or(AuthError::NotBearerToken)?;

        let jwt =
            AuthJwtPayload::verify(&global.config.jwt, token).ok_or(AuthError::InvalidToken)?;

        // The token is only as good as the user it points at.
        global
            .user_by_id_loader
            .load_one(Ulid(jwt.user_id))
            .await
            .map_ignore_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch user"))?
            .ok_or(AuthError::InvalidToken)?;

        context.set_auth(AuthData::from(jwt)).await;

        Ok(req)
    })
}
