//! HTTP error mapping.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use poreader_core::PipelineError;
use serde::Serialize;
use thiserror::Error;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Failure of an upload request.
///
/// The messages are part of the public contract. Details stay in the logs.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request carried no `file` part.
    #[error("no file uploaded")]
    MissingFile,

    /// The multipart body could not be read.
    #[error("malformed upload: {0}")]
    MalformedUpload(#[from] MultipartError),

    /// The pipeline rejected or failed the document.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingFile => StatusCode::BAD_REQUEST,
            Self::MalformedUpload(e) => e.status(),
            Self::Pipeline(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::MissingFile => "No file uploaded.".to_string(),
            Self::MalformedUpload(e) => e.body_text(),
            Self::Pipeline(e) if e.is_client_error() => "Unsupported file type".to_string(),
            Self::Pipeline(_) => "Failed to process the file.".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Upload failed");
        } else {
            tracing::warn!(error = %self, "Upload rejected");
        }
        (status, Json(ErrorBody { message: self.message() })).into_response()
    }
}

/// Failure to start or run the server.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("failed to read local address: {0}")]
    LocalAddr(std::io::Error),

    #[error("server error: {0}")]
    Serve(std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use poreader_core::{ExtractionError, OcrError, UnsupportedFormat, UpstreamError};

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::MissingFile.status(), StatusCode::BAD_REQUEST);

        let rejected = ApiError::from(PipelineError::from(UnsupportedFormat {
            media_type: "text/plain".to_string(),
        }));
        assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
        assert_eq!(rejected.message(), "Unsupported file type");

        let failed = ApiError::from(PipelineError::from(ExtractionError::Ocr(
            OcrError::InvalidImage("truncated".to_string()),
        )));
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(failed.message(), "Failed to process the file.");

        let upstream = ApiError::from(PipelineError::from(UpstreamError::EmptyResponse));
        assert_eq!(upstream.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
