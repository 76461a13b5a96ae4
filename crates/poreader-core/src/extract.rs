//! Text extraction dispatch.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::docx::DocxExtractor;
use crate::error::ExtractionError;
use crate::format::ExtractionStrategy;
use crate::models::config::PoReaderConfig;
use crate::ocr::OcrExtractor;
use crate::pdf::PdfExtractor;

/// A backend that turns document bytes into plain text.
///
/// Finding no text is not an error: implementations return an empty string.
pub trait TextExtractor: Send + Sync {
    /// Extract all text from the document.
    fn extract(&self, data: &[u8]) -> Result<String, ExtractionError>;
}

/// Text produced by one backend.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted text, possibly empty.
    pub text: String,
    /// Strategy that produced the text.
    pub strategy: ExtractionStrategy,
    /// Time spent in the backend, in milliseconds.
    pub processing_time_ms: u64,
}

/// One backend per extraction strategy.
#[derive(Clone)]
pub struct Extractors {
    pdf: Arc<dyn TextExtractor>,
    ocr: Arc<dyn TextExtractor>,
    document: Arc<dyn TextExtractor>,
}

impl Extractors {
    /// Create a set from explicit backends.
    pub fn new(
        pdf: Arc<dyn TextExtractor>,
        ocr: Arc<dyn TextExtractor>,
        document: Arc<dyn TextExtractor>,
    ) -> Self {
        Self { pdf, ocr, document }
    }

    /// Create the default backends. OCR models are loaded here, once.
    pub fn from_config(config: &PoReaderConfig) -> Self {
        Self::new(
            Arc::new(PdfExtractor::new()),
            Arc::new(OcrExtractor::from_config(config)),
            Arc::new(DocxExtractor::new()),
        )
    }

    /// Get the backend for a strategy.
    pub fn get(&self, strategy: ExtractionStrategy) -> Arc<dyn TextExtractor> {
        match strategy {
            ExtractionStrategy::Pdf => Arc::clone(&self.pdf),
            ExtractionStrategy::Ocr => Arc::clone(&self.ocr),
            ExtractionStrategy::Document => Arc::clone(&self.document),
        }
    }

    /// Run the backend for `strategy` on the blocking pool, bounded by `timeout`.
    ///
    /// On timeout the backend thread is left to finish and its result is dropped.
    pub async fn extract(
        &self,
        strategy: ExtractionStrategy,
        data: Vec<u8>,
        timeout: Duration,
    ) -> Result<ExtractionResult, ExtractionError> {
        let backend = self.get(strategy);
        let start = Instant::now();

        debug!("Extracting {} bytes with {} backend", data.len(), strategy);

        let task = tokio::task::spawn_blocking(move || backend.extract(&data));
        let text = match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result?,
            Ok(Err(join_error)) => return Err(ExtractionError::Aborted(join_error.to_string())),
            Err(_) => return Err(ExtractionError::Timeout(timeout)),
        };

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            strategy = %strategy,
            chars = text.len(),
            elapsed_ms = processing_time_ms,
            "Text extracted"
        );

        Ok(ExtractionResult {
            text,
            strategy,
            processing_time_ms,
        })
    }
}
