//! Data models and configuration.

pub mod config;
pub mod document;
pub mod order;

pub use config::PoReaderConfig;
pub use document::UploadedDocument;
pub use order::{LineItem, OrderRecord, UNKNOWN_PO_NUMBER};
