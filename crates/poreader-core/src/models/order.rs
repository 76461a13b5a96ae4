//! Purchase-order data models.
//!
//! Field names on the wire (`po_number`, `details`, `Quantity`, `Price`) are
//! shared with existing consumers and must not change.

use serde::{Deserialize, Serialize};

/// Order number reported when the answer never names one.
pub const UNKNOWN_PO_NUMBER: &str = "Unknown";

/// A purchase order as read back from the language service's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Purchase-order number, or [`UNKNOWN_PO_NUMBER`].
    pub po_number: String,

    /// Line items in the order they appeared in the answer.
    #[serde(rename = "details")]
    pub items: Vec<LineItem>,
}

impl OrderRecord {
    /// Create a record, substituting [`UNKNOWN_PO_NUMBER`] for a blank order number.
    pub fn new(po_number: impl Into<String>, items: Vec<LineItem>) -> Self {
        let po_number = po_number.into();
        let po_number = if po_number.trim().is_empty() {
            UNKNOWN_PO_NUMBER.to_string()
        } else {
            po_number
        };
        Self { po_number, items }
    }

    /// Check whether an order number was found.
    pub fn has_po_number(&self) -> bool {
        self.po_number != UNKNOWN_PO_NUMBER
    }

    /// Sum of all known quantities.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().filter_map(|i| i.quantity).sum()
    }
}

impl Default for OrderRecord {
    fn default() -> Self {
        Self::new(UNKNOWN_PO_NUMBER, Vec::new())
    }
}

/// A single product entry on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item name as written in the answer.
    pub name: String,

    /// Ordered quantity, when stated and numeric.
    #[serde(rename = "Quantity", default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,

    /// Price text, verbatim. Currency formatting is too inconsistent to parse.
    #[serde(rename = "Price", default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

impl LineItem {
    /// Create an item with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
            price: None,
        }
    }

    /// Set the quantity.
    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Set the price text.
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_wire_field_names() {
        let record = OrderRecord::new(
            "4521",
            vec![
                LineItem::named("Widget").with_quantity(10).with_price("5.00"),
                LineItem::named("Gadget"),
            ],
        );

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "po_number": "4521",
                "details": [
                    { "name": "Widget", "Quantity": 10, "Price": "5.00" },
                    { "name": "Gadget" }
                ]
            })
        );
    }

    #[test]
    fn test_blank_po_number_becomes_unknown() {
        let record = OrderRecord::new("  ", Vec::new());
        assert_eq!(record.po_number, UNKNOWN_PO_NUMBER);
        assert!(!record.has_po_number());
        assert_eq!(OrderRecord::default(), record);
    }

    #[test]
    fn test_total_quantity_skips_unknown() {
        let record = OrderRecord::new(
            "1",
            vec![
                LineItem::named("a").with_quantity(3),
                LineItem::named("b"),
                LineItem::named("c").with_quantity(4),
            ],
        );
        assert_eq!(record.total_quantity(), 7);
    }
}
