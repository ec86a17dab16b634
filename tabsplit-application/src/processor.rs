use crate::{
    error::SplitError,
    receipt::{self, ReceiptBreakdown},
};
use tabsplit_domain::{AllocationResult, Allocator, Charges, Money, PersonLedger};
use tabsplit_parser::parse_claims;

/// A completed split: who ordered what, and who owes what.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOutcome {
    pub ledger: PersonLedger,
    pub allocation: AllocationResult,
}

/// Runs the parse → ledger → allocate pipeline for both receipt shapes.
///
/// Stateless and synchronous; each call is one request/response computation.
/// Prompting (e.g. confirming a computed total) stays with the caller.
#[derive(Clone, Copy, Default)]
pub struct SplitProcessor;

impl SplitProcessor {
    /// Segments free-form text ("Alice and Bob 12.50, Carol 8") into a
    /// ledger. Amounts claimed by several people are split evenly.
    pub fn ledger_from_text(&self, text: &str) -> PersonLedger {
        let groups = parse_claims(text);
        tracing::debug!(groups = groups.len(), "segmented receipt text");

        let mut ledger = PersonLedger::new();
        for group in &groups {
            ledger.credit_group(&group.names, Money::from_decimal(group.amount()));
        }
        ledger
    }

    /// Free-form path: segment, then allocate against the caller's charges.
    pub fn split_free_form(
        &self,
        text: &str,
        charges: Charges,
    ) -> Result<SplitOutcome, SplitError> {
        let ledger = self.ledger_from_text(text);
        self.allocate(ledger, charges)
    }

    /// Structured path: slice the labeled receipt, then allocate with the
    /// receipt-derived tax/tip/fees and the caller-confirmed total.
    ///
    /// `name_list` is comma-separated, e.g. "alice, bob".
    pub fn split_receipt(
        &self,
        text: &str,
        name_list: &str,
        declared_total: Money,
    ) -> Result<SplitOutcome, SplitError> {
        let names = receipt::normalize_names(name_list);
        let breakdown = receipt::parse_receipt(text, &names)?;
        let charges = Charges {
            declared_total,
            tax: breakdown.tax,
            tip: breakdown.tip,
            misc_fees: breakdown.fees,
        };
        self.allocate(breakdown.ledger(), charges)
    }

    /// Slices a labeled receipt without allocating, for callers that want to
    /// confirm [`ReceiptBreakdown::computed_total`] with the user first.
    pub fn breakdown_from_receipt(
        &self,
        text: &str,
        name_list: &str,
    ) -> Result<ReceiptBreakdown, SplitError> {
        let names = receipt::normalize_names(name_list);
        Ok(receipt::parse_receipt(text, &names)?)
    }

    fn allocate(
        &self,
        ledger: PersonLedger,
        charges: Charges,
    ) -> Result<SplitOutcome, SplitError> {
        let allocation = Allocator
            .allocate(&ledger, charges)
            .inspect_err(|err| tracing::warn!(%err, "allocation rejected"))?;
        Ok(SplitOutcome { ledger, allocation })
    }
}
