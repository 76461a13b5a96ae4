//! Line patterns recognized in the language service's answer.

use lazy_static::lazy_static;
use regex::Regex;

/// Prefix of the order number line.
pub const PO_NUMBER_LABEL: &str = "PO number:";

/// Label of a quantity line.
pub const QUANTITY_LABEL: &str = "Quantity:";

/// Labels of a price line. Matching is case-sensitive, so both spellings are listed.
pub const PRICE_LABELS: [&str; 2] = ["Price:", "Item price:"];

lazy_static! {
    // Enumerated item marker: "1.", "12." at line start, ASCII digits only
    pub static ref ITEM_MARKER: Regex = Regex::new(r"^[0-9]+\.").unwrap();

    // Leading integer with optional sign, as in "10 units"
    pub static ref LEADING_INTEGER: Regex = Regex::new(r"^[+-]?[0-9]+").unwrap();
}

/// Value of a labelled line: the text after the first `": "`, or after the
/// first `:` when no space follows it. Trimmed.
pub fn field_value(line: &str) -> &str {
    line.split_once(": ")
        .or_else(|| line.split_once(':'))
        .map(|(_, value)| value.trim())
        .unwrap_or("")
}

/// Parse the integer at the start of `value`. Trailing text is ignored.
pub fn leading_integer(value: &str) -> Option<i64> {
    LEADING_INTEGER
        .find(value)
        .and_then(|m| m.as_str().parse().ok())
}
