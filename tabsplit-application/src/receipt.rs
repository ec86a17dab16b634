//! Structured receipt parsing (delivery-app exports).
//!
//! The receipt is sliced into labeled sections by line position: each known
//! label owns the lines from its first occurrence up to the next label's
//! first occurrence, and currency-formatted prices are extracted per
//! section.

use fxhash::FxHashSet;
use indexmap::IndexMap;
use thiserror::Error;

use tabsplit_domain::{Money, PersonLedger};

/// Category labels every receipt is sliced against, in scan order. Person
/// names come first; `total` must stay last so its section runs to the end
/// of the text.
pub const RESERVED_LABELS: [&str; 6] = ["subtotal", "tax", "delivery", "service", "tip", "total"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiptError {
    /// A named person has no currency-formatted line items. Defaulting to
    /// zero would silently under-charge, so this propagates instead.
    #[error("no prices found for '{name}'")]
    MissingData { name: String },
    #[error("'{name}' is a reserved receipt label and cannot be used as a person name")]
    ReservedName { name: String },
}

/// Per-category extraction result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReceiptBreakdown {
    /// Extracted line prices per person, keyed by the normalized name.
    pub per_person: IndexMap<String, Vec<Money>>,
    pub tax: Money,
    /// Delivery fee + service fee.
    pub fees: Money,
    pub tip: Money,
}

impl ReceiptBreakdown {
    /// Sum of everything extracted outside the `subtotal` section. This is
    /// the figure the shell shows when asking "is this what you paid?".
    pub fn computed_total(&self) -> Money {
        let items: Money = self
            .per_person
            .values()
            .flat_map(|prices| prices.iter().copied())
            .sum();
        items + self.tax + self.fees + self.tip
    }

    /// Folds the per-person price lists into a ledger of subtotals.
    pub fn ledger(&self) -> PersonLedger {
        let mut ledger = PersonLedger::new();
        for (name, prices) in &self.per_person {
            ledger.credit(name, prices.iter().copied().sum());
        }
        ledger
    }
}

/// Normalizes a comma-separated name list: lower-cased, trimmed, empties
/// dropped.
pub fn normalize_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(|name| name.trim().to_ascii_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Slices `text` into labeled sections and extracts each category's prices.
///
/// `names` must already be normalized (see [`normalize_names`]); matching is
/// case-insensitive substring over lines.
pub fn parse_receipt(text: &str, names: &[String]) -> Result<ReceiptBreakdown, ReceiptError> {
    let reserved: FxHashSet<&str> = RESERVED_LABELS.iter().copied().collect();
    for name in names {
        if reserved.contains(name.as_str()) {
            return Err(ReceiptError::ReservedName { name: name.clone() });
        }
    }

    let lines: Vec<String> = text.lines().map(|line| line.to_ascii_lowercase()).collect();

    // First matching line per label, kept in label order. "total" only
    // matches lines that are not the subtotal.
    let labels = names.iter().map(String::as_str).chain(RESERVED_LABELS);
    let mut positions: Vec<(&str, usize)> = Vec::new();
    for label in labels {
        let found = lines.iter().position(|line| {
            if label == "total" {
                line.contains("total") && !line.contains("subtotal")
            } else {
                line.contains(label)
            }
        });
        if let Some(loc) = found {
            positions.push((label, loc));
        }
    }

    let mut sections: IndexMap<&str, Vec<Money>> = IndexMap::with_capacity(positions.len());
    for (idx, (label, start)) in positions.iter().enumerate() {
        let end = match positions.get(idx + 1) {
            Some((_, next)) => *next,
            // The final label (normally "total") owns the rest of the text.
            None => lines.len(),
        };
        let mut prices = Vec::new();
        if end > *start {
            for line in &lines[*start..end] {
                scan_prices(line, &mut prices);
            }
        }
        sections.insert(label, prices);
    }

    let mut per_person = IndexMap::with_capacity(names.len());
    for name in names {
        let prices = sections.shift_remove(name.as_str()).unwrap_or_default();
        if prices.is_empty() {
            return Err(ReceiptError::MissingData { name: name.clone() });
        }
        per_person.insert(name.clone(), prices);
    }

    Ok(ReceiptBreakdown {
        per_person,
        tax: first_price(&sections, "tax"),
        fees: first_price(&sections, "delivery") + first_price(&sections, "service"),
        tip: first_price(&sections, "tip"),
    })
}

fn first_price(sections: &IndexMap<&str, Vec<Money>>, label: &str) -> Money {
    sections
        .get(label)
        .and_then(|prices| prices.first().copied())
        .unwrap_or(Money::ZERO)
}

/// Appends every `$<digits>.<digits>` token found on `line`.
fn scan_prices(line: &str, prices: &mut Vec<Money>) {
    let mut buffer = String::new();
    let mut in_amount = false;

    for c in line.chars().chain(std::iter::once(' ')) {
        if in_amount && (c.is_ascii_digit() || c == '.') {
            buffer.push(c);
        } else {
            if in_amount {
                if let Some(price) = parse_price_token(&buffer) {
                    prices.push(price);
                }
            }
            buffer.clear();
            in_amount = c == '$';
        }
    }
}

fn parse_price_token(token: &str) -> Option<Money> {
    let (int_part, frac_part) = token.split_once('.')?;
    if int_part.is_empty() || frac_part.is_empty() {
        return None;
    }
    token.parse().ok()
}
