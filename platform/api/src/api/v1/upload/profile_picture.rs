use std::sync::Arc;

use bytes::Bytes;
use common::database::Ulid;
use common::http::RouteError;
use common::make_response;
use hyper::{Body, Response, StatusCode};
use serde_json::json;

use super::UploadType;
use crate::api::auth::AuthData;
use crate::api::error::ApiError;
use crate::global::GlobalState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum AcceptedFormats {
    Png,
    Jpeg,
    Gif,
    Webp,
    Avif,
}

impl AcceptedFormats {
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type {
            "image/png" => Some(Self::Png),
            "image/jpeg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::Webp),
            "image/avif" => Some(Self::Avif),
            _ => None,
        }
    }

    pub const fn ext(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
            Self::Avif => "avif",
        }
    }
}

#[derive(Default, serde::Deserialize)]
#[serde(default)]
pub(super) struct ProfilePicture {}

impl UploadType for ProfilePicture {
    fn validate_format(_: &Arc<GlobalState>, _: &AuthData, content_type: &str) -> bool {
        AcceptedFormats::from_content_type(content_type).is_some()
    }

    fn get_max_size(global: &Arc<GlobalState>) -> usize {
        global.config.profile_pictures.max_size
    }

    async fn handle(
        self,
        global: &Arc<GlobalState>,
        auth: AuthData,
        _name: Option<String>,
        file: Bytes,
        content_type: &str,
    ) -> Result<Response<Body>, RouteError<ApiError>> {
        // The declared content-type is client input, sniff the actual bytes.
        let format = file_format::FileFormat::from_bytes(&file);
        let image_format = AcceptedFormats::from_content_type(format.media_type())
            .ok_or((StatusCode::BAD_REQUEST, "invalid file format"))?;

        if AcceptedFormats::from_content_type(content_type) != Some(image_format) {
            return Err((
                StatusCode::BAD_REQUEST,
                "file content does not match the declared content-type",
            )
                .into());
        }

        let file_id = Ulid::new();

        let path = format!(
            "profile_pictures/{}/{}.{}",
            auth.user_id,
            file_id,
            image_format.ext()
        );

        global
            .profile_picture_bucket
            .put_object_with_content_type(&path, &file, content_type)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "failed to upload image to s3");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to upload image to s3",
                )
            })?;

        sqlx::query(
            "UPDATE users SET profile_picture_id = $1, profile_picture_path = $2, updated_at = NOW() WHERE id = $3",
        )
        .bind(file_id)
        .bind(&path)
        .bind(auth.user_id)
        .execute(global.db.as_ref())
        .await
        .map_err(|err| {
            tracing::warn!(path = %path, "possible leaked s3 upload");
            tracing::error!(error = %err, "failed to update user");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to update user")
        })?;

        Ok(make_response!(
            StatusCode::OK,
            json!({
                "success": true,
                "file_id": file_id.to_string(),
                "path": path,
            })
        ))
    }
}
