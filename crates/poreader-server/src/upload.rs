//! `POST /upload` handler.

use std::sync::Arc;

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use poreader_core::{OrderRecord, Pipeline, UploadedDocument};
use tracing::debug;

use crate::error::ApiError;

/// Form field carrying the document.
pub const FILE_FIELD: &str = "file";

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";
const FALLBACK_FILENAME: &str = "upload";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

/// Run the pipeline on the uploaded `file` part.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<OrderRecord>, ApiError> {
    // A request that is not multipart at all has no file either.
    let mut multipart = multipart.map_err(|_| ApiError::MissingFile)?;
    let document = read_file_field(&mut multipart)
        .await?
        .ok_or(ApiError::MissingFile)?;

    let record = state.pipeline.process(document).await?;
    Ok(Json(record))
}

async fn read_file_field(
    multipart: &mut Multipart,
) -> Result<Option<UploadedDocument>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            debug!("Skipping form field {:?}", field.name());
            continue;
        }

        let media_type = field
            .content_type()
            .unwrap_or(FALLBACK_MEDIA_TYPE)
            .to_string();
        let filename = field
            .file_name()
            .unwrap_or(FALLBACK_FILENAME)
            .to_string();
        let bytes = field.bytes().await?;

        debug!(%filename, %media_type, bytes = bytes.len(), "Received upload");
        return Ok(Some(UploadedDocument::new(bytes, media_type, filename)));
    }
    Ok(None)
}
