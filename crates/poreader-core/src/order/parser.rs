//! Line-by-line answer parser.

use tracing::{debug, trace};

use super::ResponseParser;
use super::patterns::{
    ITEM_MARKER, PO_NUMBER_LABEL, PRICE_LABELS, QUANTITY_LABEL, field_value, leading_integer,
};
use crate::models::{LineItem, OrderRecord};

/// Parser for answers laid out as a `PO number:` line followed by numbered
/// items, each with optional `Quantity:` and `Price:` lines.
///
/// Per line, the first matching rule wins:
///
/// 1. a line starting with `PO number:` sets the order number
/// 2. a line starting with `N.` opens a new item named by the rest of the line
/// 3. a line containing `Quantity:` sets the open item's quantity
/// 4. a line containing `Price:` or `Item price:` sets the open item's price
///
/// Everything else is skipped, as are quantity and price lines seen before the
/// first item.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineOrientedParser;

impl LineOrientedParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self
    }
}

impl ResponseParser for LineOrientedParser {
    fn parse(&self, answer: &str) -> OrderRecord {
        let mut po_number = String::new();
        let mut items = Vec::new();
        let mut current: Option<LineItem> = None;

        for line in answer.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if line.starts_with(PO_NUMBER_LABEL) {
                po_number = field_value(line).to_string();
            } else if let Some(marker) = ITEM_MARKER.find(line) {
                items.extend(current.take());
                current = Some(LineItem::named(line[marker.end()..].trim()));
            } else if line.contains(QUANTITY_LABEL) {
                match current.as_mut() {
                    Some(item) => item.quantity = leading_integer(field_value(line)),
                    None => trace!("Quantity line before any item: {}", line),
                }
            } else if PRICE_LABELS.iter().any(|label| line.contains(label)) {
                match current.as_mut() {
                    Some(item) => item.price = Some(field_value(line).to_string()),
                    None => trace!("Price line before any item: {}", line),
                }
            }
        }
        items.extend(current);

        let record = OrderRecord::new(po_number, items);
        debug!(
            po_number = %record.po_number,
            items = record.items.len(),
            "Parsed answer"
        );
        record
    }
}
