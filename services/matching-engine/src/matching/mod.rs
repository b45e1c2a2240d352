//! Matching logic
//!
//! Crossing predicates and the tick-walk executor that consumes opposing
//! liquidity best price first.

pub mod crossing;
pub mod executor;
