#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod processor;
pub mod receipt;

pub use error::SplitError;
pub use processor::{SplitOutcome, SplitProcessor};
pub use receipt::{normalize_names, parse_receipt, ReceiptBreakdown, ReceiptError, RESERVED_LABELS};
