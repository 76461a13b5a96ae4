//! Prompt rendering for purchase-order extraction.

use tracing::warn;

/// Role instruction sent with every request.
pub const SYSTEM_INSTRUCTION: &str = "You are an AI that extracts data from purchase orders.";

/// Task instruction placed before the document text.
pub const TASK_INSTRUCTION: &str = "Extract the following details from this purchase order: PO number, item names, quantity, and item price.";

/// A rendered two-message chat prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// System message.
    pub system: String,
    /// User message carrying the document text.
    pub user: String,
}

/// Renders extracted text into the fixed instruction template.
///
/// Document text is sent in full unless a character limit is set.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    max_input_chars: Option<usize>,
}

impl PromptBuilder {
    /// Create a builder. With `Some(limit)`, document text beyond `limit`
    /// characters is cut.
    pub fn new(max_input_chars: Option<usize>) -> Self {
        Self { max_input_chars }
    }

    /// Render a prompt for `text`.
    pub fn build(&self, text: &str) -> Prompt {
        let text = self.truncate(text);
        Prompt {
            system: SYSTEM_INSTRUCTION.to_string(),
            user: format!("{TASK_INSTRUCTION}\n\n{text}"),
        }
    }

    fn truncate<'a>(&self, text: &'a str) -> &'a str {
        let Some(limit) = self.max_input_chars else {
            return text;
        };
        match text.char_indices().nth(limit) {
            Some((cut, _)) => {
                warn!(
                    chars = text.chars().count(),
                    kept = limit,
                    "Document text truncated before prompting"
                );
                &text[..cut]
            }
            None => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_prompt() {
        let prompt = PromptBuilder::default().build("PO 4521\nWidget x10");
        assert_eq!(prompt.system, SYSTEM_INSTRUCTION);
        assert_eq!(
            prompt.user,
            "Extract the following details from this purchase order: PO number, item names, quantity, and item price.\n\nPO 4521\nWidget x10"
        );
    }

    #[test]
    fn test_empty_text_still_renders() {
        let prompt = PromptBuilder::default().build("");
        assert_eq!(prompt.user, format!("{TASK_INSTRUCTION}\n\n"));
    }

    #[test]
    fn test_long_text_is_sent_in_full_by_default() {
        let text = format!("{}\n2. Gadget\nQuantity: 3", "x".repeat(50_000));
        let prompt = PromptBuilder::default().build(&text);
        assert!(prompt.user.ends_with("\n2. Gadget\nQuantity: 3"));
        assert_eq!(prompt.user.len(), TASK_INSTRUCTION.len() + 2 + text.len());
    }

    #[test]
    fn test_truncates_on_char_boundary() {
        let prompt = PromptBuilder::new(Some(3)).build("zażółć");
        assert!(prompt.user.ends_with("\n\nzaż"));
    }

    #[test]
    fn test_short_text_untouched() {
        let prompt = PromptBuilder::new(Some(100)).build("abc");
        assert!(prompt.user.ends_with("\n\nabc"));
    }
}
