//! Media API handlers: direct uploads and serving stored objects.

use actix_web::http::header;
use actix_web::{HttpResponse, get, put, web};
use serde::Serialize;

use crate::domain::Error;
use crate::domain::ports::MediaStoreError;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Response body for `PUT /api/v1/media/{filename}`.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaUploadResponse {
    pub url: String,
}

fn map_media_error(error: MediaStoreError) -> Error {
    match error {
        MediaStoreError::Rejected { message } => Error::invalid_request(message),
        MediaStoreError::Unavailable { message } => Error::storage(message),
    }
}

/// Rough content type from the stored file's extension; uploads carry no
/// metadata beyond their name.
fn content_type_for(file_name: &str) -> &'static str {
    match file_name.rsplit_once('.').map(|(_, ext)| ext) {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        _ => "application/octet-stream",
    }
}

/// Upload raw bytes under the given file name.
#[utoipa::path(
    put,
    path = "/api/v1/media/{filename}",
    params(("filename" = String, Path, description = "Target file name")),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Stored", body = MediaUploadResponse),
        (status = 400, description = "Rejected upload", body = Error),
        (status = 503, description = "Media store unavailable", body = Error),
    ),
    tags = ["media"],
    operation_id = "uploadMedia"
)]
#[put("/media/{filename}")]
pub async fn upload_media(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    bytes: web::Bytes,
) -> ApiResult<HttpResponse> {
    session.require_user(&state.accounts).await?;
    let file_name = path.into_inner();
    let url = state
        .media
        .store(&file_name, &bytes)
        .await
        .map_err(map_media_error)?;
    Ok(HttpResponse::Created().json(MediaUploadResponse { url }))
}

/// Serve a stored media object.
#[utoipa::path(
    get,
    path = "/api/v1/media/{filename}",
    params(("filename" = String, Path, description = "Stored file name")),
    responses(
        (status = 200, description = "Object bytes"),
        (status = 404, description = "Unknown object", body = Error),
    ),
    tags = ["media"],
    operation_id = "serveMedia",
    security([])
)]
#[get("/media/{filename}")]
pub async fn serve_media(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let file_name = path.into_inner();
    let Some(files) = &state.media_files else {
        return Err(Error::not_found("media serving is not configured"));
    };
    let bytes = files
        .load(&file_name)
        .map_err(|_| Error::not_found(format!("no media object named {file_name}")))?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type_for(&file_name)))
        .body(bytes))
}
