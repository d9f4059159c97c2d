//! Analysis modules.
//!
//! Aggregation of test records into dashboard views.

pub mod aggregator;

pub use aggregator::*;
