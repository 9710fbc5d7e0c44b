/// Document endpoints
///
/// All handlers here run behind the session guard and only ever touch the
/// caller's own namespace, taken from [`CabinetContext`].
///
/// - `GET /cabinet` - List files
/// - `GET|POST /upload` - Upload form and multipart upload (field `document`)
/// - `GET /download/:filename` - Send a stored file as an attachment

use crate::{
    app::AppState,
    error::WebResult,
    middleware::session::CabinetContext,
    templates,
};
use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use cabinet_shared::storage::{filename::content_type, StorageError};
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

/// Multipart field carrying the uploaded file
pub const UPLOAD_FIELD: &str = "document";

/// Lists the caller's files
pub async fn cabinet(
    State(state): State<AppState>,
    Extension(ctx): Extension<CabinetContext>,
) -> WebResult<Response> {
    let files = state.files.list(&ctx.namespace).await?;
    Ok(templates::cabinet_page(&ctx.user.username, &files).into_response())
}

pub async fn upload_form() -> impl IntoResponse {
    templates::upload_page()
}

/// Stores the `document` field under its sanitized name
///
/// An empty filename redirects back to the form. A request without a
/// `document` field, or whose name fails sanitizing or the extension
/// allow-list, re-renders the form without storing anything.
pub async fn upload(
    State(state): State<AppState>,
    Extension(ctx): Extension<CabinetContext>,
    mut multipart: Multipart,
) -> WebResult<Response> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Ok(Redirect::to("/upload").into_response());
        }

        let bytes = field.bytes().await?;

        return match state.files.save(&ctx.namespace, &filename, &bytes).await {
            Ok(stored) => {
                info!(user_id = %ctx.user.id, filename = %stored, size = bytes.len(), "File uploaded");
                Ok(Redirect::to("/cabinet").into_response())
            }
            Err(e @ (StorageError::InvalidFilename(_) | StorageError::DisallowedExtension(_))) => {
                debug!(user_id = %ctx.user.id, error = %e, "Upload rejected");
                Ok(templates::upload_page().into_response())
            }
            Err(e) => Err(e.into()),
        };
    }

    debug!(user_id = %ctx.user.id, "Upload without a document field");
    Ok(templates::upload_page().into_response())
}

/// Streams a stored file back as an attachment
///
/// Unknown names and anything that is not a canonical stored name,
/// including traversal attempts, are a plain 404.
pub async fn download(
    State(state): State<AppState>,
    Extension(ctx): Extension<CabinetContext>,
    Path(filename): Path<String>,
) -> WebResult<Response> {
    let download = state.files.open_for_download(&ctx.namespace, &filename).await?;

    let headers = [
        (header::CONTENT_TYPE, content_type(&download.filename).to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", download.filename),
        ),
        (header::CONTENT_LENGTH, download.len.to_string()),
    ];

    debug!(user_id = %ctx.user.id, filename = %download.filename, "Sending file");
    Ok((headers, Body::from_stream(ReaderStream::new(download.file))).into_response())
}
