//! Types library for the tick-indexed DEX engine
//!
//! This library provides all core type definitions shared across the engine,
//! ensuring type safety and deterministic behavior: every participating node
//! must reach identical state from the same message sequence, so nothing in
//! here touches wall clocks, randomness, or platform-dependent iteration.
//!
//! # Modules
//! - `ids`: Deterministic identifiers (Address, TrancheKey)
//! - `pair`: Canonical and directed token pairs
//! - `numeric`: Integer amounts with decimal bridging
//! - `tick`: Discrete price levels and tick/price conversions
//! - `order`: Limit-order type codes and tranche lifecycle states
//! - `errors`: Error taxonomy

pub mod errors;
pub mod ids;
pub mod numeric;
pub mod order;
pub mod pair;
pub mod tick;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::*;
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::pair::*;
    pub use crate::tick::*;
}
