//! Common regex patterns for receipt text extraction.
//!
//! Amounts are always a dollar sign (optional) followed by digits with exactly
//! two decimal places; every numeric capture below is shaped so that a match
//! converts to a `Decimal` unless it overflows. Digit and word classes are
//! ASCII only; other scripts' digits never count as amounts or dates.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Normalization
    pub static ref BLANK_LINE_RUN: Regex = Regex::new(r"\n{2,}").unwrap();

    // Summary and payment lines (never purchases)
    pub static ref SUMMARY_KEYWORDS: Regex = Regex::new(
        r"(?i)(subtotal|total|tax|refund|credit|cash|change|amount|balance|payment|visa|mastercard|amex|debit|card|tendered|due|vat|gst|rounding)"
    ).unwrap();

    // Weighed goods: "0.78 LB Ginger $2.33", "0.78LB Ginger 2.33", "2 KG Potatoes $3.10"
    pub static ref WEIGHTED_ITEM: Regex = Regex::new(
        r"(?i)^(?:([0-9]+\.[0-9]*)\s*(?:LBS?|KG|OZ)?|([0-9]+)\s*(?:LBS?|KG|OZ))\s+([A-Za-z0-9\s\-().#]+?)\s+\$?([0-9]+\.[0-9]{2})$"
    ).unwrap();

    // Counted goods: "2 Apple $1.50"
    pub static ref COUNTED_ITEM: Regex = Regex::new(
        r"^([0-9]+)\s+([A-Za-z0-9\s\-().#]+?)\s+\$?([0-9]+\.[0-9]{2})$"
    ).unwrap();

    // Single item: "Soap $2.99", "Soap 2.99"
    pub static ref NAMED_ITEM: Regex = Regex::new(
        r"^([A-Za-z0-9\s\-().#]+?)\s+\$?([0-9]+\.[0-9]{2})$"
    ).unwrap();

    // Anything with a price at the end: "Milk 2% 1L 3.49"
    pub static ref TRAILING_PRICE: Regex = Regex::new(
        r"^(.+?)\s+\$?([0-9]+\.[0-9]{2})$"
    ).unwrap();

    // A line holding nothing but an amount: "$2.99"
    pub static ref PRICE_ONLY: Regex = Regex::new(
        r"^\$?([0-9]+\.[0-9]{2})$"
    ).unwrap();

    pub static ref WORD_CHAR: Regex = Regex::new(r"[A-Za-z0-9_]").unwrap();

    // Dates: "05/12/2023", "January 5, 2023", "2023-05-12"
    pub static ref DATE_ANY: Regex = Regex::new(
        r"([0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4})|([A-Za-z]+ [0-9]{1,2}, [0-9]{4})|([0-9]{4}-[0-9]{2}-[0-9]{2})"
    ).unwrap();

    // Printed total on a single line: "TOTAL $12.34", "Total: 12.34"
    pub static ref TOTAL_LABELLED: Regex = Regex::new(
        r"(?i)total.*?\$?([0-9]+\.[0-9]{2})"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_keywords() {
        assert!(SUMMARY_KEYWORDS.is_match("Subtotal $10.00"));
        assert!(SUMMARY_KEYWORDS.is_match("VISA ****1234"));
        assert!(SUMMARY_KEYWORDS.is_match("Change Due 0.50"));
        assert!(SUMMARY_KEYWORDS.is_match("GST 5%"));
        assert!(!SUMMARY_KEYWORDS.is_match("2 Apple $1.50"));
    }

    #[test]
    fn test_weighted_requires_decimal_or_unit() {
        assert!(WEIGHTED_ITEM.is_match("0.78 LB Ginger $2.33"));
        assert!(WEIGHTED_ITEM.is_match("0.78LB Ginger 2.33"));
        assert!(WEIGHTED_ITEM.is_match("2 kg Potatoes $3.10"));
        assert!(!WEIGHTED_ITEM.is_match("2 Apple $1.50"));
    }

    #[test]
    fn test_weighted_prefers_unit_over_name() {
        let caps = WEIGHTED_ITEM.captures("0.78 LB Ginger $2.33").unwrap();
        assert_eq!(&caps[1], "0.78");
        assert_eq!(&caps[3], "Ginger");
        assert_eq!(&caps[4], "2.33");
    }

    #[test]
    fn test_named_item_rejects_symbols() {
        assert!(NAMED_ITEM.is_match("Soap $2.99"));
        assert!(!NAMED_ITEM.is_match("Milk 2% 1L 3.49"));
        assert!(TRAILING_PRICE.is_match("Milk 2% 1L 3.49"));
    }

    #[test]
    fn test_price_only() {
        assert!(PRICE_ONLY.is_match("$1.00"));
        assert!(PRICE_ONLY.is_match("1.00"));
        assert!(!PRICE_ONLY.is_match("$1.0"));
        assert!(!PRICE_ONLY.is_match("Soap $1.00"));
    }

    #[test]
    fn test_digit_classes_are_ascii() {
        assert!(!DATE_ANY.is_match("\u{0660}\u{0665}/\u{0661}\u{0662}/\u{0662}\u{0660}\u{0662}\u{0663}"));
        assert!(!PRICE_ONLY.is_match("\u{0661}.\u{0660}\u{0660}"));

        let caps = TOTAL_LABELLED
            .captures("Total \u{0661}\u{0662}.\u{0663}\u{0664} paid 12.34")
            .unwrap();
        assert_eq!(&caps[1], "12.34");
    }

    #[test]
    fn test_word_char_is_ascii() {
        assert!(!WORD_CHAR.is_match("\u{e9}\u{e9}\u{e9}"));
        assert!(WORD_CHAR.is_match("-- a --"));
        assert!(WORD_CHAR.is_match("_"));
    }
}
