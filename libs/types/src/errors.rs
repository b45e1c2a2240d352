//! Error taxonomy for the DEX engine
//!
//! Three families, all surfaced to the caller as a rejected message with a
//! descriptive string and never retried internally:
//! - validation errors: malformed input caught before any state change
//! - policy errors: valid requests unsatisfiable under their order-type
//! - not-found/state errors: references to missing or inactive entities
//!
//! The message strings for InvalidTokenPair, InvalidOrderType,
//! ExpirationInPast, and NoActiveLimitOrder are part of the wire contract.

use crate::numeric::Amount;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DexError {
    // ── Validation ──────────────────────────────────────────────────
    #[error("{token_a}<>{token_b}: Invalid token pair")]
    InvalidTokenPair { token_a: String, token_b: String },

    #[error("mismatched message arrays: expected {expected} entries, got {got}")]
    MismatchedArrayLengths { expected: usize, got: usize },

    #[error("message must contain at least one entry")]
    EmptyInput,

    #[error("deposit amounts must not both be zero")]
    ZeroDeposit,

    #[error("amount must be greater than zero")]
    ZeroAmount,

    #[error("tick index {tick} is outside the supported range +/-{max}")]
    TickOutOfRange { tick: i64, max: i64 },

    #[error("invalid fee: {fee}, fee must be an enabled fee tier")]
    InvalidFee { fee: u64 },

    #[error("invalid value: {value}, expected one of: 0, 1, 2, 3, 4")]
    InvalidOrderType { value: i64 },

    #[error("Limit order expiration time must be greater than current block time")]
    ExpirationInPast,

    #[error("expiration time must be set for GOOD_TIL_TIME limit orders")]
    ExpirationRequired,

    #[error("expiration time is only valid for GOOD_TIL_TIME limit orders")]
    UnexpectedExpiration,

    #[error("invalid route: needs at least two distinct consecutive denoms")]
    InvalidRoute,

    // ── Policy ──────────────────────────────────────────────────────
    #[error("Fill-or-kill limit order could not be filled: amount in {amount_in}, unmatched {unmatched}")]
    FillOrKillUnsatisfied { amount_in: Amount, unmatched: Amount },

    #[error("route realized price {realized} is below the exit limit price {limit}")]
    LimitPriceNotSatisfied { realized: Decimal, limit: Decimal },

    // ── Not found / state ───────────────────────────────────────────
    #[error("No active limit found. It does not exist or has already been filled")]
    NoActiveLimitOrder,

    #[error("no limit order tranche user found: address {address}, tranche {tranche_key}")]
    NoLedgerRecord {
        address: String,
        tranche_key: String,
    },

    #[error("pool not found: {pair} tick {tick} fee {fee}")]
    PoolNotFound { pair: String, tick: i64, fee: u64 },

    #[error("insufficient shares at tick {tick} fee {fee}: requested {requested}, owned {owned}")]
    InsufficientShares {
        tick: i64,
        fee: u64,
        requested: Amount,
        owned: Amount,
    },

    #[error("insufficient balance for {denom}: required {required}, available {available}")]
    InsufficientBalance {
        denom: String,
        required: Amount,
        available: Amount,
    },

    #[error("no matchable liquidity for {token_in}<>{token_out}")]
    InsufficientLiquidity {
        token_in: String,
        token_out: String,
    },

    #[error("amount overflows the supported numeric range")]
    AmountOverflow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_token_pair_display() {
        let err = DexError::InvalidTokenPair {
            token_a: "untrn".to_string(),
            token_b: "untrn".to_string(),
        };
        assert_eq!(err.to_string(), "untrn<>untrn: Invalid token pair");
    }

    #[test]
    fn test_expiration_display() {
        assert_eq!(
            DexError::ExpirationInPast.to_string(),
            "Limit order expiration time must be greater than current block time"
        );
    }

    #[test]
    fn test_no_active_limit_display() {
        assert_eq!(
            DexError::NoActiveLimitOrder.to_string(),
            "No active limit found. It does not exist or has already been filled"
        );
    }

    #[test]
    fn test_insufficient_shares_display() {
        let err = DexError::InsufficientShares {
            tick: 1,
            fee: 0,
            requested: Amount::new(500),
            owned: Amount::new(200),
        };
        assert!(err.to_string().contains("requested 500"));
        assert!(err.to_string().contains("owned 200"));
    }
}
