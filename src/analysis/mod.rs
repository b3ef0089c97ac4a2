//! Analysis modules.
//!
//! Scoring lives in the aggregator; everything it exposes is pure.

pub mod aggregator;

pub use aggregator::*;
