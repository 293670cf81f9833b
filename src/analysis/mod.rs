//! Analysis modules.
//!
//! Aggregation of parsed launches into the chart inputs.

pub mod aggregator;

pub use aggregator::*;
