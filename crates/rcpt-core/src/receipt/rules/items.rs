//! Line item extraction for retail receipts.
//!
//! Every normalized line is run through [`CASCADE`], an ordered table of line
//! shapes tried most specific first; the first shape that matches decides what
//! the line is. A line holding only an amount is folded into the item right
//! above it, since receipts often print the extended price of a line on its own
//! row.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, trace};

use super::patterns::{
    COUNTED_ITEM, NAMED_ITEM, PRICE_ONLY, SUMMARY_KEYWORDS, TRAILING_PRICE, WEIGHTED_ITEM,
    WORD_CHAR,
};
use crate::models::receipt::LineItem;

/// Line shapes recognised by the item cascade, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineShape {
    /// Totals, taxes, tenders and other non-purchase lines.
    Summary,
    /// `0.78 LB Ginger $2.33`
    WeightedItem,
    /// `2 Apple $1.50`
    CountedItem,
    /// `Soap $2.99`
    NamedItem,
    /// `Milk 2% 1L 3.49`
    TrailingPrice,
    /// `$2.99`
    PriceOnly,
}

/// What a matching rule made of a line.
#[derive(Debug, Clone, PartialEq)]
enum LineClass {
    Summary,
    Item(LineItem),
    Continuation(Decimal),
}

struct LineRule {
    shape: LineShape,
    classify: fn(&str) -> Option<LineClass>,
    /// Consume the line without an item when it repeats the previous item's name.
    dedupe_previous: bool,
}

const CASCADE: &[LineRule] = &[
    LineRule {
        shape: LineShape::Summary,
        classify: classify_summary,
        dedupe_previous: false,
    },
    LineRule {
        shape: LineShape::WeightedItem,
        classify: classify_weighted,
        dedupe_previous: false,
    },
    LineRule {
        shape: LineShape::CountedItem,
        classify: classify_counted,
        dedupe_previous: false,
    },
    LineRule {
        shape: LineShape::NamedItem,
        classify: classify_named,
        dedupe_previous: false,
    },
    LineRule {
        shape: LineShape::TrailingPrice,
        classify: classify_trailing_price,
        dedupe_previous: true,
    },
    LineRule {
        shape: LineShape::PriceOnly,
        classify: classify_price_only,
        dedupe_previous: false,
    },
];

/// Items recovered from a receipt, with scan diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemExtraction {
    /// Items in receipt order.
    pub items: Vec<LineItem>,
    /// How many lines each shape claimed during the structured pass.
    pub rule_hits: BTreeMap<LineShape, usize>,
    /// Whether the structured pass found nothing and the loose pass ran.
    pub fallback_used: bool,
}

/// Scan state threaded through the lines.
#[derive(Debug, Default)]
struct ItemScan {
    items: Vec<LineItem>,
    /// The last pushed item may still take its total from a price-only line.
    awaiting_total: bool,
    rule_hits: BTreeMap<LineShape, usize>,
}

impl ItemScan {
    fn feed(mut self, line: &str) -> Self {
        for rule in CASCADE {
            let Some(class) = (rule.classify)(line) else {
                continue;
            };
            *self.rule_hits.entry(rule.shape).or_default() += 1;

            match class {
                LineClass::Summary => trace!(line, "skipped summary line"),
                LineClass::Item(item) => {
                    let repeated = rule.dedupe_previous
                        && self.items.last().is_some_and(|prev| prev.name == item.name);
                    if repeated {
                        trace!(line, "dropped repeat of previous item");
                    } else {
                        trace!(line, shape = ?rule.shape, name = %item.name, "item");
                        self.items.push(item);
                        self.awaiting_total = true;
                    }
                }
                LineClass::Continuation(amount) => self.attach_total(amount),
            }
            return self;
        }

        trace!(line, "no line shape matched");
        self
    }

    /// Give the last item its trailing total and back-fill the unit price.
    fn attach_total(&mut self, amount: Decimal) {
        // A zero amount would leave the item with no price at all.
        if !self.awaiting_total || amount <= Decimal::ZERO {
            return;
        }
        let Some(last) = self.items.last_mut() else {
            return;
        };

        last.total = amount;
        if let Some(price) = amount.checked_div(last.quantity) {
            last.price = price;
        }
        self.awaiting_total = false;
        trace!(name = %last.name, %amount, "attached trailing total");
    }
}

/// Extract purchased items from normalized receipt lines.
///
/// Never fails: the worst case is an empty item list.
pub fn extract_items(lines: &[String]) -> ItemExtraction {
    let scan = lines
        .iter()
        .fold(ItemScan::default(), |scan, line| scan.feed(line));

    let ItemScan {
        mut items,
        rule_hits,
        ..
    } = scan;

    let fallback_used = items.is_empty();
    if fallback_used {
        items = fallback_items(lines);
        debug!("Structured pass found no items, loose pass found {}", items.len());
    }

    items.retain(LineItem::is_usable);

    ItemExtraction {
        items,
        rule_hits,
        fallback_used,
    }
}

/// Loose pass: any line ending in an amount whose text has a word character.
fn fallback_items(lines: &[String]) -> Vec<LineItem> {
    lines
        .iter()
        .filter_map(|line| {
            let caps = TRAILING_PRICE.captures(line)?;
            let name = caps[1].trim();
            if !WORD_CHAR.is_match(name) {
                return None;
            }
            Some(LineItem::single(name, parse_amount(&caps[2])?))
        })
        .collect()
}

fn classify_summary(line: &str) -> Option<LineClass> {
    SUMMARY_KEYWORDS.is_match(line).then_some(LineClass::Summary)
}

fn classify_weighted(line: &str) -> Option<LineClass> {
    let caps = WEIGHTED_ITEM.captures(line)?;
    let quantity = caps
        .get(1)
        .or_else(|| caps.get(2))
        .and_then(|m| parse_quantity(m.as_str()))?;
    let amount = parse_amount(&caps[4])?;

    // Weighed amounts are already extended, so unit price and total coincide.
    Some(LineClass::Item(LineItem {
        name: caps[3].trim().to_string(),
        quantity,
        price: amount,
        total: amount,
    }))
}

fn classify_counted(line: &str) -> Option<LineClass> {
    let caps = COUNTED_ITEM.captures(line)?;
    let quantity = parse_quantity(&caps[1])?;
    let price = parse_amount(&caps[3])?;
    let total = price.checked_mul(quantity)?;

    Some(LineClass::Item(LineItem {
        name: caps[2].trim().to_string(),
        quantity,
        price,
        total,
    }))
}

fn classify_named(line: &str) -> Option<LineClass> {
    let caps = NAMED_ITEM.captures(line)?;
    let amount = parse_amount(&caps[2])?;
    Some(LineClass::Item(LineItem::single(caps[1].trim(), amount)))
}

fn classify_trailing_price(line: &str) -> Option<LineClass> {
    let caps = TRAILING_PRICE.captures(line)?;
    let amount = parse_amount(&caps[2])?;
    Some(LineClass::Item(LineItem::single(caps[1].trim(), amount)))
}

fn classify_price_only(line: &str) -> Option<LineClass> {
    let caps = PRICE_ONLY.captures(line)?;
    parse_amount(&caps[1]).map(LineClass::Continuation)
}

fn parse_amount(s: &str) -> Option<Decimal> {
    Decimal::from_str(s).ok()
}

/// Quantities must be strictly positive; `12.` reads as `12`.
fn parse_quantity(s: &str) -> Option<Decimal> {
    Decimal::from_str(s.trim_end_matches('.'))
        .ok()
        .filter(|q| *q > Decimal::ZERO)
}
