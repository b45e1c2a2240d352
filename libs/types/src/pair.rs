//! Canonical and directed token pairs
//!
//! Pool state is keyed by the unordered pair in canonical (lexicographic)
//! order plus a directional tick index; tranches and liquidity books are
//! keyed by the directed pair from the taker's perspective. Canonical
//! ordering keeps map iteration deterministic across nodes.

use crate::errors::DexError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unordered token pair, stored with `token0 < token1` lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TradePair {
    token0: String,
    token1: String,
}

impl TradePair {
    /// Canonicalize an unordered pair. Rejects `token_a == token_b`.
    ///
    /// Returns the pair and whether `token_a` landed as `token0`, which
    /// callers need to normalize directional tick indexes.
    pub fn from_unordered(token_a: &str, token_b: &str) -> Result<(Self, bool), DexError> {
        if token_a == token_b {
            return Err(DexError::InvalidTokenPair {
                token_a: token_a.to_string(),
                token_b: token_b.to_string(),
            });
        }
        if token_a < token_b {
            Ok((
                Self {
                    token0: token_a.to_string(),
                    token1: token_b.to_string(),
                },
                true,
            ))
        } else {
            Ok((
                Self {
                    token0: token_b.to_string(),
                    token1: token_a.to_string(),
                },
                false,
            ))
        }
    }

    pub fn token0(&self) -> &str {
        &self.token0
    }

    pub fn token1(&self) -> &str {
        &self.token1
    }
}

impl fmt::Display for TradePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<>{}", self.token0, self.token1)
    }
}

/// Directed pair: the taker sells `token_in` and receives `token_out`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DirectedPair {
    token_in: String,
    token_out: String,
}

impl DirectedPair {
    pub fn new(token_in: &str, token_out: &str) -> Result<Self, DexError> {
        if token_in == token_out {
            return Err(DexError::InvalidTokenPair {
                token_a: token_in.to_string(),
                token_b: token_out.to_string(),
            });
        }
        Ok(Self {
            token_in: token_in.to_string(),
            token_out: token_out.to_string(),
        })
    }

    pub fn token_in(&self) -> &str {
        &self.token_in
    }

    pub fn token_out(&self) -> &str {
        &self.token_out
    }

    /// The opposing direction (maker side for this taker direction).
    pub fn reversed(&self) -> Self {
        Self {
            token_in: self.token_out.clone(),
            token_out: self.token_in.clone(),
        }
    }

    /// Canonical view plus whether `token_in` is `token0`.
    pub fn canonical(&self) -> (TradePair, bool) {
        // new() already rejected equal tokens
        match TradePair::from_unordered(&self.token_in, &self.token_out) {
            Ok(v) => v,
            Err(_) => unreachable!("DirectedPair holds distinct tokens"),
        }
    }
}

impl fmt::Display for DirectedPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.token_in, self.token_out)
    }
}
