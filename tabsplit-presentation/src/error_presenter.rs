use tabsplit_application::{ReceiptError, SplitError};
use tabsplit_domain::AllocationError;

/// Turns a typed split failure into the correction prompt shown to the
/// user. Every message tells them what to fix; nothing is retried.
pub fn format_split_error(error: &SplitError) -> String {
    match error {
        SplitError::Allocation(AllocationError::EmptyLedger) => {
            "No names and amounts could be read from the receipt text. \
             Check the format, e.g. \"Alice and Bob 12.50, Carol 8\"."
                .to_string()
        }
        SplitError::Allocation(AllocationError::Reconciliation { declared, computed }) => {
            format!("You provided {declared} as the total, but I calculated {computed}. Re-enter the total or fix the itemized amounts.")
        }
        SplitError::Allocation(AllocationError::Overcharge { computed, declared }) => {
            format!("The calculated charge sum is ${computed} but the receipt total was ${declared}. Check the itemized amounts before sending any requests.")
        }
        SplitError::Allocation(AllocationError::ZeroTaxBase) => {
            "Tax, tip and fees make up the entire total, so percentages cannot be derived. Check the itemized amounts."
                .to_string()
        }
        SplitError::Receipt(ReceiptError::MissingData { name }) => {
            format!("No prices were found for {name}. Try manual entry.")
        }
        SplitError::Receipt(ReceiptError::ReservedName { name }) => {
            format!("'{name}' is a reserved receipt label and cannot be used as a person name.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tabsplit_domain::Money;

    #[rstest]
    #[case::reconciliation(
        SplitError::Allocation(AllocationError::Reconciliation {
            declared: Money::new(6100, 2),
            computed: Money::new(6000, 2),
        }),
        &["61.00", "60.00"]
    )]
    #[case::overcharge(
        SplitError::Allocation(AllocationError::Overcharge {
            computed: Money::new(701, 2),
            declared: Money::new(501, 2),
        }),
        &["7.01", "5.01"]
    )]
    #[case::missing_data(
        SplitError::Receipt(ReceiptError::MissingData {
            name: "bob".to_string(),
        }),
        &["bob"]
    )]
    #[case::reserved_name(
        SplitError::Receipt(ReceiptError::ReservedName {
            name: "tip".to_string(),
        }),
        &["tip", "reserved"]
    )]
    fn message_carries_the_figures_to_correct(
        #[case] error: SplitError,
        #[case] expected_fragments: &[&str],
    ) {
        let message = format_split_error(&error);
        for fragment in expected_fragments {
            assert!(message.contains(fragment), "missing '{fragment}' in: {message}");
        }
    }
}
