//! Error types for the poreader-core library.

use std::time::Duration;

use thiserror::Error;

/// Main error type for the poreader library.
#[derive(Error, Debug)]
pub enum PoReaderError {
    /// A document could not be turned into an order record.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Failure of a single pipeline run. Every variant is terminal for the request.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The declared media type has no extraction strategy.
    #[error(transparent)]
    Rejected(#[from] UnsupportedFormat),

    /// The extraction backend could not produce text.
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    /// The language service failed or was unreachable.
    #[error("upstream failed: {0}")]
    Upstream(#[from] UpstreamError),
}

impl PipelineError {
    /// Whether the failure was caused by the caller's input rather than by a backend.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// The declared media type is not one the classifier recognizes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported media type: {media_type}")]
pub struct UnsupportedFormat {
    /// The offending media type, as declared by the uploader.
    pub media_type: String,
}

/// Errors raised while turning document bytes into text.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// PDF backend failure.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR backend failure.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Word-processing backend failure.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// The backend did not finish within the configured bound.
    #[error("extraction timed out after {0:?}")]
    Timeout(Duration),

    /// The backend task panicked or was cancelled.
    #[error("extraction aborted: {0}")]
    Aborted(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// OCR models are missing or failed to load.
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),
}

/// Errors related to word-processing documents.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The bytes are not a readable OOXML package.
    #[error("not a word-processing package: {0}")]
    Archive(String),

    /// The package lacks a required part.
    #[error("missing document part: {0}")]
    MissingPart(&'static str),

    /// The document XML is malformed.
    #[error("malformed document XML: {0}")]
    Xml(String),
}

/// Errors talking to the language-understanding service.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// No API key was found in the configured environment variable.
    #[error("API key not set (expected in ${0})")]
    MissingApiKey(String),

    /// Connection or transport failure.
    #[error("request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The service answered with a body we could not decode.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The service answered without any content.
    #[error("empty response from language service")]
    EmptyResponse,

    /// The service did not answer within the configured bound.
    #[error("language service timed out after {0:?}")]
    Timeout(Duration),
}

/// Result type for the poreader library.
pub type Result<T> = std::result::Result<T, PoReaderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_rejection_is_client_error() {
        let rejected = PipelineError::from(UnsupportedFormat {
            media_type: "application/zip".to_string(),
        });
        assert!(rejected.is_client_error());

        let failed = PipelineError::from(ExtractionError::Pdf(PdfError::Encrypted));
        assert!(!failed.is_client_error());

        let upstream = PipelineError::from(UpstreamError::EmptyResponse);
        assert!(!upstream.is_client_error());
    }

    #[test]
    fn test_unsupported_format_names_media_type() {
        let err = UnsupportedFormat {
            media_type: "text/plain".to_string(),
        };
        assert_eq!(err.to_string(), "unsupported media type: text/plain");
    }
}
