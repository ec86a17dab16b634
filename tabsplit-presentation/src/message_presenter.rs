use indexmap::IndexMap;
use rust_decimal::{Decimal, RoundingStrategy};

use tabsplit_domain::{canonical_name, AllocationResult, Charges, Money, PersonLedger};

/// How each person's message is delivered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MessageMode {
    /// Plain statement text, ready for any messenger.
    Clean,
    /// Venmo charge link with the statement embedded as the note.
    #[default]
    DeepLink,
}

/// Inputs the statement text is built from, beyond the allocation itself.
#[derive(Clone, Copy, Debug)]
pub struct MessageContext<'a> {
    /// Where the food came from, e.g. the restaurant name.
    pub description: Option<&'a str>,
    pub charges: Charges,
    pub mode: MessageMode,
}

pub struct MessagePresenter;

impl MessagePresenter {
    /// Builds one message per person, in ledger order.
    pub fn render(
        result: &AllocationResult,
        ledger: &PersonLedger,
        context: &MessageContext<'_>,
    ) -> IndexMap<String, String> {
        result
            .per_person_owed
            .iter()
            .map(|(name, owed)| {
                let subtotal = ledger.get(name).unwrap_or(Money::ZERO);
                let statement = Self::build_statement(name, subtotal, result, context);
                let message = match context.mode {
                    MessageMode::Clean => statement,
                    MessageMode::DeepLink => Self::build_charge_link(name, *owed, &statement),
                };
                (name.clone(), message)
            })
            .collect()
    }

    /// "Hi Alice! Food at Thai Palace was $20.00, tip was 10.00%, tax was
    /// 5.00%, fees were $1.25." Clauses for zero inputs are omitted.
    fn build_statement(
        name: &str,
        subtotal: Money,
        result: &AllocationResult,
        context: &MessageContext<'_>,
    ) -> String {
        let mut statement = format!("Hi {name}! Food");
        if let Some(description) = context
            .description
            .map(str::trim)
            .filter(|description| !description.is_empty())
        {
            statement.push_str(" at ");
            statement.push_str(&title_case(description));
        }
        statement.push_str(&format!(" was ${subtotal}"));
        if !context.charges.tip.is_zero() {
            statement.push_str(&format!(", tip was {}%", format_percent(result.tip_rate)));
        }
        if !context.charges.tax.is_zero() {
            statement.push_str(&format!(", tax was {}%", format_percent(result.tax_rate)));
        }
        if !context.charges.misc_fees.is_zero() {
            statement.push_str(&format!(", fees were ${}", result.per_person_fee));
        }
        statement.push('.');
        statement
    }

    /// Pre-filled charge request; opening it lands on Venmo's charge form
    /// with the statement as the note. Only a string is produced, nothing is
    /// dispatched.
    fn build_charge_link(name: &str, amount: Money, statement: &str) -> String {
        format!(
            "https://venmo.com/?txn=charge&audience=private&recipients={name}&amount={amount}&note={}",
            urlencoding::encode(statement)
        )
    }
}

/// Rate fraction → percentage with 2 decimals, e.g. 0.05 → "5.00".
fn format_percent(rate: Decimal) -> String {
    let percent = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{percent:.2}")
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(canonical_name)
        .collect::<Vec<_>>()
        .join(" ")
}
