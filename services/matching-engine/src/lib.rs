//! Tick-indexed liquidity and limit-order engine
//!
//! Drives pool deposits/withdrawals and the five limit-order policies
//! (GTC, FOK, IOC, JIT, GTT) against a single serialized state machine.
//!
//! **Key Invariants:**
//! - Deterministic: same message sequence produces identical state and
//!   identical tranche keys on every node (no wall clock, no randomness,
//!   BTreeMap iteration everywhere)
//! - Atomic messages: a failed message leaves zero observable effects
//! - Conservation: bank balances + pool reserves + tranche escrow is
//!   constant per denom across every message
//! - FIFO priority within a tranche; best price first across ticks

pub mod bank;
pub mod book;
pub mod engine;
pub mod events;
pub mod ledger;
pub mod matching;
pub mod msg;
pub mod pool;
pub mod query;
pub mod tranche;

pub use engine::MatchingEngine;
