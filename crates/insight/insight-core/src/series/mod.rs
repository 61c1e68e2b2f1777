//! Series alignment and calendar aggregation.

pub mod aggregate;
pub mod align;

pub use aggregate::aggregate;
pub use align::{align, align_with, AlignedPairs};
