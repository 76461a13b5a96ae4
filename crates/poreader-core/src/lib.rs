//! Core library for reading purchase orders.
//!
//! A document goes through five stages:
//! - classification of its declared media type
//! - text extraction (embedded PDF text, OCR for images, or Word XML)
//! - prompt rendering
//! - a chat completion request to an OpenAI-compatible service
//! - line-oriented parsing of the answer into an [`OrderRecord`]
//!
//! [`Pipeline`] ties the stages together. Every external collaborator sits
//! behind a trait ([`TextExtractor`], [`LanguageModel`], [`ResponseParser`]).

pub mod docx;
pub mod error;
pub mod extract;
pub mod format;
pub mod llm;
pub mod models;
pub mod ocr;
pub mod order;
pub mod pdf;
pub mod pipeline;

pub use error::{
    DocumentError, ExtractionError, OcrError, PdfError, PipelineError, PoReaderError, Result,
    UnsupportedFormat, UpstreamError,
};
pub use extract::{ExtractionResult, Extractors, TextExtractor};
pub use format::{ExtractionStrategy, classify};
pub use llm::{LanguageModel, OpenAiClient, Prompt, PromptBuilder};
pub use models::{LineItem, OrderRecord, PoReaderConfig, UploadedDocument};
pub use order::{LineOrientedParser, ResponseParser, parse_answer};
pub use pipeline::Pipeline;
