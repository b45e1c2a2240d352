//! Message and response types
//!
//! The serde shapes mirror the external wire contract: amounts as uint128
//! strings, order types as integer codes, deposits as parallel arrays with
//! one entry per (tick, fee) leg. Validation that only needs the message
//! itself lives here; everything touching state belongs to the engine.

use dex_types::errors::DexError;
use dex_types::ids::{Address, TrancheKey};
use dex_types::numeric::Amount;
use dex_types::order::LimitOrderType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::events::TickUpdate;

/// Per-leg deposit flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DepositOptions {
    /// Keep this leg's liquidity passive: excluded from taker matching.
    #[serde(default)]
    pub disable_swap: bool,
}

/// Add liquidity to one or more (tick, fee) pools of a pair.
///
/// The arrays are parallel: leg `i` deposits `amounts_a[i]` of `token_a`
/// and `amounts_b[i]` of `token_b` at `tick_indexes_a_to_b[i]` with
/// `fees[i]`. `options` may be empty, which means defaults for every leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositMsg {
    pub receiver: Address,
    pub token_a: String,
    pub token_b: String,
    pub amounts_a: Vec<Amount>,
    pub amounts_b: Vec<Amount>,
    pub tick_indexes_a_to_b: Vec<i64>,
    pub fees: Vec<u64>,
    #[serde(default)]
    pub options: Vec<DepositOptions>,
}

/// One validated deposit leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepositLeg {
    pub amount_a: Amount,
    pub amount_b: Amount,
    pub tick_index_a_to_b: i64,
    pub fee: u64,
    pub options: DepositOptions,
}

impl DepositMsg {
    /// Zip the parallel arrays, rejecting empty and ragged input.
    pub fn legs(&self) -> Result<Vec<DepositLeg>, DexError> {
        let n = self.amounts_a.len();
        if n == 0 {
            return Err(DexError::EmptyInput);
        }
        for len in [
            self.amounts_b.len(),
            self.tick_indexes_a_to_b.len(),
            self.fees.len(),
        ] {
            if len != n {
                return Err(DexError::MismatchedArrayLengths {
                    expected: n,
                    got: len,
                });
            }
        }
        if !self.options.is_empty() && self.options.len() != n {
            return Err(DexError::MismatchedArrayLengths {
                expected: n,
                got: self.options.len(),
            });
        }
        Ok((0..n)
            .map(|i| DepositLeg {
                amount_a: self.amounts_a[i],
                amount_b: self.amounts_b[i],
                tick_index_a_to_b: self.tick_indexes_a_to_b[i],
                fee: self.fees[i],
                options: self.options.get(i).copied().unwrap_or_default(),
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositResponse {
    pub shares_minted: Vec<Amount>,
    pub events: Vec<TickUpdate>,
}

/// Burn pool shares back into reserves, one leg per (tick, fee).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalMsg {
    pub receiver: Address,
    pub token_a: String,
    pub token_b: String,
    pub shares_to_remove: Vec<Amount>,
    pub tick_indexes_a_to_b: Vec<i64>,
    pub fees: Vec<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WithdrawalLeg {
    pub shares_to_remove: Amount,
    pub tick_index_a_to_b: i64,
    pub fee: u64,
}

impl WithdrawalMsg {
    pub fn legs(&self) -> Result<Vec<WithdrawalLeg>, DexError> {
        let n = self.shares_to_remove.len();
        if n == 0 {
            return Err(DexError::EmptyInput);
        }
        for len in [self.tick_indexes_a_to_b.len(), self.fees.len()] {
            if len != n {
                return Err(DexError::MismatchedArrayLengths {
                    expected: n,
                    got: len,
                });
            }
        }
        Ok((0..n)
            .map(|i| WithdrawalLeg {
                shares_to_remove: self.shares_to_remove[i],
                tick_index_a_to_b: self.tick_indexes_a_to_b[i],
                fee: self.fees[i],
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalResponse {
    pub amounts_a: Vec<Amount>,
    pub amounts_b: Vec<Amount>,
    pub events: Vec<TickUpdate>,
}

/// Place a limit order: swap immediately against crossing liquidity, then
/// (depending on the order type) rest the remainder at the limit tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceLimitOrderMsg {
    pub receiver: Address,
    pub token_in: String,
    pub token_out: String,
    pub tick_index_in_to_out: i64,
    pub amount_in: Amount,
    pub order_type: LimitOrderType,
    /// Required for GOOD_TIL_TIME, rejected for every other type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<i64>,
    /// Stop the immediate swap once this much output is acquired.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount_out: Option<Amount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceLimitOrderResponse {
    /// Set when a tranche was created or joined for the resting remainder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tranche_key: Option<TrancheKey>,
    /// Total token_in taken from the sender (swapped plus rested).
    pub coin_in_used: Amount,
    /// token_out acquired by the immediate swap.
    pub taker_coin_out: Amount,
    pub events: Vec<TickUpdate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawFilledLimitOrderMsg {
    pub tranche_key: TrancheKey,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawFilledLimitOrderResponse {
    pub amount_withdrawn: Amount,
    pub events: Vec<TickUpdate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelLimitOrderMsg {
    pub tranche_key: TrancheKey,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelLimitOrderResponse {
    pub amount_refunded: Amount,
    pub events: Vec<TickUpdate>,
}

/// Swap through a chain of pairs: `route[0]` is spent, `route.last()` is
/// received, each adjacent pair is one hop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiHopSwapMsg {
    pub receiver: Address,
    pub route: Vec<String>,
    pub amount_in: Amount,
    /// Minimum acceptable overall price (token_out per token_in).
    pub exit_limit_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiHopSwapResponse {
    pub coin_out: Amount,
    pub events: Vec<TickUpdate>,
}
