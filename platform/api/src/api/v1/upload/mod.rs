use std::sync::Arc;

use common::http::ext::{OptionExt, RequestGlobalExt, ResultExt};
use common::http::RouteError;
use hyper::{Body, Request, Response, StatusCode};
use multer::{Constraints, SizeLimit};
use routerify::prelude::RequestExt;
use routerify::Router;

use self::profile_picture::ProfilePicture;
use crate::api::auth::AuthData;
use crate::api::error::ApiError;
use crate::api::request_context::RequestContext;
use crate::global::GlobalState;

pub(crate) mod profile_picture;

trait UploadType: serde::de::DeserializeOwned + Default {
    fn validate_format(global: &Arc<GlobalState>, auth: &AuthData, content_type: &str) -> bool;

    fn get_max_size(global: &Arc<GlobalState>) -> usize;

    // The explicit Send bound keeps the generic handler future Send, which
    // the router requires.
    fn handle(
        self,
        global: &Arc<GlobalState>,
        auth: AuthData,
        file_name: Option<String>,
        file: bytes::Bytes,
        content_type: &str,
    ) -> impl std::future::Future<Output = Result<Response<Body>, RouteError<ApiError>>> + Send;
}

pub fn routes(_global: &Arc<GlobalState>) -> Router<Body, RouteError<ApiError>> {
    Router::builder()
        .post("/profile-picture", handler::<ProfilePicture>)
        .build()
        .expect("failed to build router")
}

async fn handler<U: UploadType>(req: Request<Body>) -> Result<Response<Body>, RouteError<ApiError>> {
    let global = req.get_global::<GlobalState>()?;

    let request_context: RequestContext = req.context().expect("missing request context");

    let auth = request_context
        .auth()
        .await?
        .map_err_route((StatusCode::UNAUTHORIZED, "unauthorized"))?;

    let content_type = req
        .headers()
        .get("content-type")
        .map_err_route((StatusCode::BAD_REQUEST, "missing content-type header"))?;
    let content_type = content_type
        .to_str()
        .map_ignore_err_route((StatusCode::BAD_REQUEST, "invalid content-type header"))?;

    let boundary = multer::parse_boundary(content_type)
        .map_ignore_err_route((StatusCode::BAD_REQUEST, "invalid content-type header"))?;

    let constraints = Constraints::new()
        .allowed_fields(vec!["metadata", "file"])
        .size_limit(
            SizeLimit::new()
                .for_field("metadata", 30 * 1024)
                .for_field("file", U::get_max_size(&global) as u64),
        );

    let mut multipart = multer::Multipart::with_constraints(req.into_body(), boundary, constraints);

    let mut metadata = None;
    let mut file = None;
    let mut file_name = None;
    let mut file_content_type = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_ignore_err_route((StatusCode::BAD_REQUEST, "invalid multipart body"))?
    {
        let name = field
            .name()
            .map_err_route((StatusCode::BAD_REQUEST, "invalid multipart body"))?;

        match name {
            "metadata" => {
                let data = field
                    .bytes()
                    .await
                    .map_ignore_err_route((StatusCode::BAD_REQUEST, "invalid multipart body"))?;
                metadata = Some(data);
            }
            "file" => {
                file_name = field.file_name().and_then(|s| {
                    if s.len() > 125 {
                        None
                    } else {
                        // Remove the extension
                        Some(
                            s.chars()
                                .rev()
                                .position(|c| c == '.')
                                .map(|i| &s[..s.len() - i - 1])
                                .unwrap_or(s)
                                .to_owned(),
                        )
                    }
                });

                let content_type = field
                    .content_type()
                    .map_err_route((
                        StatusCode::BAD_REQUEST,
                        "invalid multipart body, missing file content-type",
                    ))?
                    .to_string();

                if !U::validate_format(&global, &auth, &content_type) {
                    return Err((StatusCode::BAD_REQUEST, "invalid file format").into());
                }

                let data = field
                    .bytes()
                    .await
                    .map_ignore_err_route((StatusCode::BAD_REQUEST, "invalid multipart body"))?;

                file_content_type = Some(content_type);
                file = Some(data);
            }
            _ => return Err((StatusCode::BAD_REQUEST, "invalid multipart body").into()),
        }
    }

    let file = file.map_err_route((StatusCode::BAD_REQUEST, "missing file field"))?;
    let file_content_type =
        file_content_type.map_err_route((StatusCode::BAD_REQUEST, "missing file content-type"))?;

    let metadata: U = metadata
        .map(|data| serde_json::from_slice(&data))
        .transpose()
        .map_ignore_err_route((StatusCode::BAD_REQUEST, "invalid metadata"))?
        .unwrap_or_default();

    metadata
        .handle(&global, auth, file_name, file, &file_content_type)
        .await
}
