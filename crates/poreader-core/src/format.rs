//! Media-type classification.
//!
//! Classification trusts the declared type. No content sniffing is done.

use std::fmt;

use serde::Serialize;

use crate::error::UnsupportedFormat;

/// Declared type of PDF documents.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Prefix shared by every image type.
pub const IMAGE_MEDIA_PREFIX: &str = "image/";

/// Legacy Word `.doc` type.
pub const MSWORD_MEDIA_TYPE: &str = "application/msword";

/// OOXML Word `.docx` type.
pub const DOCX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Backend used to turn a document into plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Embedded PDF text.
    Pdf,
    /// Optical character recognition on an image.
    Ocr,
    /// Word-processing document text.
    Document,
}

impl ExtractionStrategy {
    /// Short name for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Ocr => "ocr",
            Self::Document => "document",
        }
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a declared media type to its extraction strategy.
///
/// Matching is exact and case-sensitive.
pub fn classify(media_type: &str) -> Result<ExtractionStrategy, UnsupportedFormat> {
    match media_type {
        PDF_MEDIA_TYPE => Ok(ExtractionStrategy::Pdf),
        MSWORD_MEDIA_TYPE | DOCX_MEDIA_TYPE => Ok(ExtractionStrategy::Document),
        t if t.starts_with(IMAGE_MEDIA_PREFIX) => Ok(ExtractionStrategy::Ocr),
        _ => Err(UnsupportedFormat {
            media_type: media_type.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_types() {
        assert_eq!(classify("application/pdf"), Ok(ExtractionStrategy::Pdf));
        assert_eq!(classify("image/png"), Ok(ExtractionStrategy::Ocr));
        assert_eq!(classify("image/jpeg"), Ok(ExtractionStrategy::Ocr));
        assert_eq!(classify("image/tiff"), Ok(ExtractionStrategy::Ocr));
        assert_eq!(classify(MSWORD_MEDIA_TYPE), Ok(ExtractionStrategy::Document));
        assert_eq!(classify(DOCX_MEDIA_TYPE), Ok(ExtractionStrategy::Document));
    }

    #[test]
    fn test_unsupported_types_carry_media_type() {
        for media_type in [
            "application/zip",
            "text/plain",
            "",
            "application/octet-stream",
            "Application/PDF",
            "IMAGE/png",
            "application/pdf; charset=binary",
            "application/vnd.ms-excel",
        ] {
            let err = classify(media_type).unwrap_err();
            assert_eq!(err.media_type, media_type);
        }
    }

    #[test]
    fn test_bare_image_prefix_is_ocr() {
        assert_eq!(classify("image/"), Ok(ExtractionStrategy::Ocr));
    }

    #[test]
    fn test_display() {
        assert_eq!(ExtractionStrategy::Document.to_string(), "document");
    }
}
