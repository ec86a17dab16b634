use thiserror::Error;

use crate::receipt::ReceiptError;
use tabsplit_domain::AllocationError;

/// Anything a split request can fail with. Every variant is recoverable by
/// correcting the inputs and retrying; nothing is auto-repaired.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error(transparent)]
    Receipt(#[from] ReceiptError),
}
