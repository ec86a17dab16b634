use indexmap::IndexMap;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::model::{AllocationResult, Charges, Money, PersonLedger};

/// Slack allowed between the declared total and the unrounded sum of
/// per-person charges before the allocation is rejected as an overcharge.
fn overcharge_tolerance() -> Money {
    Money::new(10, 2)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("no participants to allocate to")]
    EmptyLedger,
    #[error("declared total {declared} does not match computed total {computed}")]
    Reconciliation { declared: Money, computed: Money },
    #[error("allocated sum {computed} exceeds declared total {declared} beyond tolerance")]
    Overcharge { computed: Money, declared: Money },
    #[error("tax, tip and fees consume the entire total; rates cannot be derived")]
    ZeroTaxBase,
}

/// Proportional allocation service.
pub struct Allocator;

impl Allocator {
    /// Splits the declared total across the ledger's participants.
    ///
    /// Tax and tip are distributed proportionally to each person's itemized
    /// subtotal; miscellaneous fees are split evenly. The declared total must
    /// reconcile exactly (after 2-decimal rounding) with the sum of the
    /// ledger and the charges; mismatches are returned to the caller for
    /// correction, never guessed at.
    pub fn allocate(
        &self,
        ledger: &PersonLedger,
        charges: Charges,
    ) -> Result<AllocationResult, AllocationError> {
        debug_assert!(
            !charges.tax.is_negative()
                && !charges.tip.is_negative()
                && !charges.misc_fees.is_negative()
                && !charges.declared_total.is_negative()
        );

        if ledger.is_empty() {
            return Err(AllocationError::EmptyLedger);
        }

        let declared = charges.declared_total.rounded();
        let computed =
            (ledger.subtotal() + charges.tax + charges.tip + charges.misc_fees).rounded();
        if computed != declared {
            return Err(AllocationError::Reconciliation { declared, computed });
        }

        // The pure food/item total, used as the denominator for both rates.
        let tax_base = declared - charges.tip - charges.misc_fees - charges.tax;
        if tax_base.is_zero() {
            return Err(AllocationError::ZeroTaxBase);
        }

        let tax_rate = charges.tax.as_decimal() / tax_base.as_decimal();
        let tip_rate = charges.tip.as_decimal() / tax_base.as_decimal();
        let per_person_fee =
            (charges.misc_fees / Decimal::from(ledger.person_count())).rounded();

        let multiplier = Decimal::ONE + tax_rate + tip_rate;
        let mut owed_sum = Money::ZERO;
        let mut per_person_owed: IndexMap<String, Money> =
            IndexMap::with_capacity(ledger.person_count());
        for (name, subtotal) in ledger.iter() {
            let owed = subtotal * multiplier + per_person_fee;
            owed_sum += owed;
            per_person_owed.insert(name.to_string(), owed);
        }

        // Compounded rounding must never charge materially more than the
        // receipt shows.
        let owed_sum = owed_sum.rounded();
        if owed_sum > declared + overcharge_tolerance() {
            return Err(AllocationError::Overcharge {
                computed: owed_sum,
                declared,
            });
        }

        for owed in per_person_owed.values_mut() {
            *owed = owed.rounded();
        }

        Ok(AllocationResult {
            per_person_owed,
            tax_rate,
            tip_rate,
            per_person_fee,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn allocator() -> Allocator {
        Allocator
    }

    fn ledger(entries: &[(&str, i64)]) -> PersonLedger {
        entries
            .iter()
            .map(|(name, cents)| (*name, Money::new(*cents, 2)))
            .collect()
    }

    #[rstest]
    fn proportional_split_with_all_charge_kinds(allocator: Allocator) {
        let ledger = ledger(&[("Alice", 2000), ("Bob", 3000)]);
        let charges = Charges {
            declared_total: Money::new(6000, 2),
            tax: Money::new(250, 2),
            tip: Money::new(500, 2),
            misc_fees: Money::new(250, 2),
        };

        let result = allocator.allocate(&ledger, charges).expect("reconciles");

        assert_eq!(result.tax_rate, Decimal::new(5, 2));
        assert_eq!(result.tip_rate, Decimal::new(10, 2));
        assert_eq!(result.per_person_fee, Money::new(125, 2));
        assert_eq!(result.per_person_owed["Alice"], Money::new(2425, 2));
        assert_eq!(result.per_person_owed["Bob"], Money::new(3575, 2));

        let owed_sum: Money = result.per_person_owed.values().copied().sum();
        assert_eq!(owed_sum, Money::new(6000, 2));
    }

    #[rstest]
    fn mismatched_total_is_rejected_with_both_figures(allocator: Allocator) {
        let ledger = ledger(&[("Alice", 2000), ("Bob", 3000)]);
        let charges = Charges {
            declared_total: Money::new(6100, 2),
            tax: Money::new(250, 2),
            tip: Money::new(500, 2),
            misc_fees: Money::new(250, 2),
        };

        let result = allocator.allocate(&ledger, charges);

        assert_eq!(
            result,
            Err(AllocationError::Reconciliation {
                declared: Money::new(6100, 2),
                computed: Money::new(6000, 2),
            })
        );
    }

    #[rstest]
    fn zero_charges_conserve_subtotals(allocator: Allocator) {
        let ledger = ledger(&[("Alice", 1234), ("Bob", 875), ("Carol", 991)]);
        let charges = Charges {
            declared_total: Money::new(3100, 2),
            ..Charges::default()
        };

        let result = allocator.allocate(&ledger, charges).expect("reconciles");

        for (name, subtotal) in ledger.iter() {
            assert_eq!(result.per_person_owed[name], subtotal);
        }
        assert_eq!(result.per_person_fee, Money::ZERO);
    }

    #[rstest]
    fn empty_ledger_is_rejected(allocator: Allocator) {
        let result = allocator.allocate(&PersonLedger::new(), Charges::default());
        assert_eq!(result, Err(AllocationError::EmptyLedger));
    }

    #[rstest]
    fn charges_consuming_the_whole_total_are_rejected(allocator: Allocator) {
        // One participant with nothing itemized: the tip alone is the total,
        // leaving a zero base for rate derivation.
        let ledger = ledger(&[("Alice", 0)]);
        let charges = Charges {
            declared_total: Money::new(500, 2),
            tip: Money::new(500, 2),
            ..Charges::default()
        };

        let result = allocator.allocate(&ledger, charges);

        assert_eq!(result, Err(AllocationError::ZeroTaxBase));
    }

    #[rstest]
    fn compounding_rounding_overcharge_is_rejected(allocator: Allocator) {
        // Sub-cent subtotals squeeze the tax base down to 0.01, so the tip
        // rate explodes and the charge sum lands far above the receipt.
        let mut ledger = PersonLedger::new();
        ledger.credit("a", Money::new(7, 3));
        ledger.credit("b", Money::new(7, 3));
        let charges = Charges {
            declared_total: Money::new(501, 2),
            tip: Money::new(500, 2),
            ..Charges::default()
        };

        let result = allocator.allocate(&ledger, charges);

        assert_eq!(
            result,
            Err(AllocationError::Overcharge {
                computed: Money::new(701, 2),
                declared: Money::new(501, 2),
            })
        );
    }

    #[rstest]
    fn owed_amounts_are_rounded_to_cents(allocator: Allocator) {
        // 3.333... tax rate shares: each owed value must come back at scale 2.
        let ledger = ledger(&[("A", 1000), ("B", 1000), ("C", 1000)]);
        let charges = Charges {
            declared_total: Money::new(3100, 2),
            tax: Money::new(100, 2),
            ..Charges::default()
        };

        let result = allocator.allocate(&ledger, charges).expect("reconciles");

        for owed in result.per_person_owed.values() {
            assert_eq!(*owed, owed.rounded());
        }
        let owed_sum: Money = result.per_person_owed.values().copied().sum();
        assert!(owed_sum <= charges.declared_total + overcharge_tolerance());
    }
}
