//! Conversion of the language service's free-text answer into an order record.

mod parser;
pub mod patterns;

pub use parser::LineOrientedParser;

use crate::models::OrderRecord;

/// Turns an answer into an [`OrderRecord`].
///
/// Parsing never fails. Text that matches no rule is ignored.
pub trait ResponseParser: Send + Sync {
    /// Parse the answer text.
    fn parse(&self, answer: &str) -> OrderRecord;
}

/// Parse an answer with the default line rules.
pub fn parse_answer(answer: &str) -> OrderRecord {
    LineOrientedParser::new().parse(answer)
}
