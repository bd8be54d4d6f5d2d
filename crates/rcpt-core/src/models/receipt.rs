//! Receipt data models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Display text for a receipt whose merchant could not be detected.
pub const UNKNOWN_STORE: &str = "Unknown Store";

/// Display text for a receipt whose date could not be detected.
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// Structured purchase data recovered from one receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    /// Canonical merchant name, `None` when no signature matched.
    pub store: Option<String>,

    /// Literal date text as printed, `None` when no date shape was found.
    pub date: Option<String>,

    /// Purchased items in receipt order.
    pub items: Vec<LineItem>,

    /// Receipt total (printed total when legible, otherwise the item sum).
    pub total: Decimal,
}

/// A single purchased item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item description as printed.
    pub name: String,

    /// Quantity (count, or weight for weighed goods).
    pub quantity: Decimal,

    /// Unit price.
    pub price: Decimal,

    /// Extended amount for this line.
    pub total: Decimal,
}

impl LineItem {
    /// Create an item sold as a single unit.
    pub fn single(name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            name: name.into(),
            quantity: Decimal::ONE,
            price: amount,
            total: amount,
        }
    }

    /// Whether the item carries a usable name and price.
    pub fn is_usable(&self) -> bool {
        !self.name.is_empty() && self.price > Decimal::ZERO
    }
}

impl ReceiptRecord {
    /// Merchant name for display, falling back to [`UNKNOWN_STORE`].
    pub fn store_or_unknown(&self) -> &str {
        self.store.as_deref().unwrap_or(UNKNOWN_STORE)
    }

    /// Date text for display, falling back to [`UNKNOWN_DATE`].
    pub fn date_or_unknown(&self) -> &str {
        self.date.as_deref().unwrap_or(UNKNOWN_DATE)
    }

    /// Sum of all item totals.
    ///
    /// Saturates at `Decimal::MAX` instead of overflowing.
    pub fn item_sum(&self) -> Decimal {
        sum_totals(&self.items)
    }

    /// Check the record for signs of a poor extraction.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.store.is_none() {
            issues.push("Store not detected".to_string());
        }

        if self.date.is_none() {
            issues.push("Date not detected".to_string());
        }

        if self.items.is_empty() {
            issues.push("No items detected".to_string());
        } else {
            let calculated = self.item_sum();
            if (calculated - self.total).abs() > Decimal::new(1, 2) {
                issues.push(format!(
                    "Item total ({}) differs from receipt total ({})",
                    calculated, self.total
                ));
            }
        }

        issues
    }
}

pub(crate) fn sum_totals(items: &[LineItem]) -> Decimal {
    items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.total))
        .unwrap_or(Decimal::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record(items: Vec<LineItem>, total: &str) -> ReceiptRecord {
        ReceiptRecord {
            store: Some("Target".to_string()),
            date: Some("05/12/2023".to_string()),
            items,
            total: dec(total),
        }
    }

    #[test]
    fn test_unknown_sentinels_display() {
        let record = ReceiptRecord {
            store: None,
            date: None,
            items: Vec::new(),
            total: Decimal::ZERO,
        };
        assert_eq!(record.store_or_unknown(), UNKNOWN_STORE);
        assert_eq!(record.date_or_unknown(), UNKNOWN_DATE);
    }

    #[test]
    fn test_validate_consistent_record() {
        let record = record(
            vec![
                LineItem::single("Soap", dec("2.99")),
                LineItem::single("Milk", dec("3.49")),
            ],
            "6.48",
        );
        assert!(record.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_total_mismatch() {
        let record = record(vec![LineItem::single("Soap", dec("2.99"))], "10.00");
        let issues = record.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("differs"));
    }

    #[test]
    fn test_validate_reports_missing_fields() {
        let record = ReceiptRecord {
            store: None,
            date: None,
            items: Vec::new(),
            total: Decimal::ZERO,
        };
        assert_eq!(
            record.validate(),
            vec![
                "Store not detected".to_string(),
                "Date not detected".to_string(),
                "No items detected".to_string(),
            ]
        );
    }

    #[test]
    fn test_item_usable() {
        assert!(LineItem::single("Soap", dec("2.99")).is_usable());
        assert!(!LineItem::single("", dec("2.99")).is_usable());
        assert!(!LineItem::single("Soap", Decimal::ZERO).is_usable());
    }

    #[test]
    fn test_sum_saturates() {
        let items = vec![
            LineItem::single("A", Decimal::MAX),
            LineItem::single("B", Decimal::MAX),
        ];
        assert_eq!(sum_totals(&items), Decimal::MAX);
    }
}
