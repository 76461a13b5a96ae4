//! Uploaded document model.

/// A document as received from the caller, before any processing.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    /// Raw file bytes.
    pub bytes: Vec<u8>,

    /// Media type declared by the uploader. Trusted as-is, never sniffed.
    pub media_type: String,

    /// Original file name, for diagnostics.
    pub filename: String,
}

impl UploadedDocument {
    /// Create a new document.
    pub fn new(
        bytes: impl Into<Vec<u8>>,
        media_type: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            media_type: media_type.into(),
            filename: filename.into(),
        }
    }

    /// Size of the document in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check whether the document has no content.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
