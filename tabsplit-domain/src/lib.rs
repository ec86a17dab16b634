#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{canonical_name, AllocationResult, Charges, Money, PersonLedger};
pub use services::{AllocationError, Allocator};
