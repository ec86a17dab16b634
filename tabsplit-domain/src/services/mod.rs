pub mod allocator;

pub use allocator::{AllocationError, Allocator};
