use proptest::prelude::*;
use tabsplit_domain::{Allocator, Charges, Money, PersonLedger};

const NAMES: [&str; 8] = [
    "Ada", "Ben", "Cho", "Dee", "Eli", "Fay", "Gus", "Hal",
];

fn ledger_from_cents(cents: &[u32]) -> PersonLedger {
    cents
        .iter()
        .enumerate()
        .map(|(idx, c)| (NAMES[idx], Money::new(*c as i64, 2)))
        .collect()
}

proptest! {
    #[test]
    fn reconciled_inputs_allocate_within_tolerance(
        cents in prop::collection::vec(1u32..=50_000, 1..=8),
        tax_cents in 0u32..=5_000,
        tip_cents in 0u32..=5_000,
        fee_cents in 0u32..=5_000,
    ) {
        let ledger = ledger_from_cents(&cents);
        let tax = Money::new(tax_cents as i64, 2);
        let tip = Money::new(tip_cents as i64, 2);
        let misc_fees = Money::new(fee_cents as i64, 2);
        let declared_total = (ledger.subtotal() + tax + tip + misc_fees).rounded();
        let charges = Charges { declared_total, tax, tip, misc_fees };

        let result = Allocator
            .allocate(&ledger, charges)
            .expect("reconciled input must allocate");

        let owed_sum: Money = result.per_person_owed.values().copied().sum();
        prop_assert!(owed_sum <= declared_total + Money::new(10, 2));
        prop_assert_eq!(result.per_person_owed.len(), ledger.person_count());
        for owed in result.per_person_owed.values() {
            prop_assert!(!owed.is_negative());
        }
    }

    #[test]
    fn zero_charges_conserve_the_ledger(
        cents in prop::collection::vec(1u32..=50_000, 1..=8),
    ) {
        let ledger = ledger_from_cents(&cents);
        let charges = Charges {
            declared_total: ledger.subtotal().rounded(),
            ..Charges::default()
        };

        let result = Allocator
            .allocate(&ledger, charges)
            .expect("reconciled input must allocate");

        for (name, subtotal) in ledger.iter() {
            prop_assert_eq!(result.per_person_owed[name], subtotal);
        }
    }
}
