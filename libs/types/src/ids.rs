//! Deterministic identifier types for engine entities
//!
//! Identifiers are derived from in-state monotonic counters, never from
//! wall-clock time or randomness: replaying the same message sequence on
//! any node must assign identical keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bech32-style account address, treated as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Unique identifier of a limit-order tranche.
///
/// Assigned monotonically from the engine's tranche sequence and formatted
/// zero-padded so that lexicographic ordering equals assignment ordering.
/// Returned to callers via TickUpdate events for settlement correlation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrancheKey(String);

impl TrancheKey {
    /// Build a key from the engine's monotonic tranche sequence.
    pub fn from_sequence(seq: u64) -> Self {
        Self(format!("t/{seq:012}"))
    }

    /// Re-wrap an existing key string (e.g. from a client message).
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrancheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
