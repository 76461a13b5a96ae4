//! End-to-end document processing: classify, extract, prompt, complete, parse.

use std::sync::Arc;
use std::time::Duration;

use tracing::{Instrument, info, info_span, warn};

use crate::error::{PipelineError, PoReaderError, Result, UpstreamError};
use crate::extract::Extractors;
use crate::format::classify;
use crate::llm::{LanguageModel, OpenAiClient, PromptBuilder};
use crate::models::{OrderRecord, PoReaderConfig, UploadedDocument};
use crate::order::{LineOrientedParser, ResponseParser};

/// Turns uploaded documents into order records.
///
/// Stages run strictly in order and the first failure ends the run. Nothing is
/// retried and no partial record is returned. A pipeline holds no per-request
/// state, so one instance can serve concurrent requests.
#[derive(Clone)]
pub struct Pipeline {
    extractors: Extractors,
    prompts: PromptBuilder,
    model: Arc<dyn LanguageModel>,
    parser: Arc<dyn ResponseParser>,
    extraction_timeout: Duration,
    upstream_timeout: Duration,
}

impl Pipeline {
    /// Create a pipeline with default prompt, parser and timeouts.
    pub fn new(extractors: Extractors, model: Arc<dyn LanguageModel>) -> Self {
        let config = PoReaderConfig::default();
        Self {
            extractors,
            prompts: PromptBuilder::default(),
            model,
            parser: Arc::new(LineOrientedParser::new()),
            extraction_timeout: config.extraction.timeout(),
            upstream_timeout: config.llm.timeout(),
        }
    }

    /// Build the production pipeline: local extractors and the OpenAI-compatible client.
    pub fn from_config(config: &PoReaderConfig) -> Result<Self> {
        let model = OpenAiClient::from_config(&config.llm)
            .map_err(|e| PoReaderError::Config(format!("language service client: {}", e)))?;

        Ok(Self::new(Extractors::from_config(config), Arc::new(model))
            .with_prompt_builder(PromptBuilder::new(config.llm.max_input_chars))
            .with_extraction_timeout(config.extraction.timeout())
            .with_upstream_timeout(config.llm.timeout()))
    }

    /// Replace the prompt builder.
    pub fn with_prompt_builder(mut self, prompts: PromptBuilder) -> Self {
        self.prompts = prompts;
        self
    }

    /// Replace the answer parser.
    pub fn with_parser(mut self, parser: Arc<dyn ResponseParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Set the extraction time bound.
    pub fn with_extraction_timeout(mut self, timeout: Duration) -> Self {
        self.extraction_timeout = timeout;
        self
    }

    /// Set the language service time bound.
    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    /// Process one document.
    pub async fn process(
        &self,
        document: UploadedDocument,
    ) -> std::result::Result<OrderRecord, PipelineError> {
        let span = info_span!(
            "process",
            filename = %document.filename,
            media_type = %document.media_type,
            bytes = document.len()
        );
        self.run(document).instrument(span).await
    }

    async fn run(
        &self,
        document: UploadedDocument,
    ) -> std::result::Result<OrderRecord, PipelineError> {
        let strategy = classify(&document.media_type).inspect_err(|e| warn!("Rejected: {}", e))?;

        let extracted = self
            .extractors
            .extract(strategy, document.bytes, self.extraction_timeout)
            .await
            .inspect_err(|e| warn!("Extraction failed: {}", e))?;

        if extracted.text.trim().is_empty() {
            warn!("No text found in document, prompting anyway");
        }

        let prompt = self.prompts.build(&extracted.text);
        let answer = tokio::time::timeout(self.upstream_timeout, self.model.complete(&prompt))
            .await
            .unwrap_or(Err(UpstreamError::Timeout(self.upstream_timeout)))
            .inspect_err(|e| warn!("Language service failed: {}", e))?;

        let record = self.parser.parse(&answer);
        info!(
            po_number = %record.po_number,
            items = record.items.len(),
            extraction_ms = extracted.processing_time_ms,
            "Document processed"
        );
        Ok(record)
    }
}
