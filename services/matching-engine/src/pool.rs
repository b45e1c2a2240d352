//! Tick pool: discrete-price liquidity with proportional share ownership
//!
//! A pool holds reserves of both tokens of a pair at one (tick, fee) and
//! tracks share ownership per address. Shares are minted proportional to
//! the token0-denominated value contributed, and burned for a proportional
//! slice of both reserves. Pools are created on first deposit and never
//! destroyed; reserves and shares may return to zero.

use dex_types::errors::DexError;
use dex_types::ids::Address;
use dex_types::numeric::Amount;
use dex_types::pair::TradePair;
use dex_types::tick;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Canonical pool identity: pair + tick (token0 in token1 terms) + fee.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PoolKey {
    pub pair: TradePair,
    pub tick_index_0_to_1: i64,
    pub fee: u64,
}

/// `floor(a * num / den)` over the Decimal bridge.
fn mul_div_floor(a: Amount, num: Amount, den: Amount) -> Option<Amount> {
    if den.is_zero() {
        return None;
    }
    let a = a.as_decimal()?;
    let num = num.as_decimal()?;
    let den = den.as_decimal()?;
    Amount::from_decimal_floor(a.checked_mul(num)?.checked_div(den)?)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickPool {
    pub key: PoolKey,
    pub reserves0: Amount,
    pub reserves1: Amount,
    pub total_shares: Amount,
    /// False once any deposit arrived with `disable_swap`: the pool's
    /// liquidity is then passive and excluded from limit-order matching.
    pub swappable: bool,
    shares: BTreeMap<Address, Amount>,
}

impl TickPool {
    pub fn new(key: PoolKey) -> Self {
        Self {
            key,
            reserves0: Amount::zero(),
            reserves1: Amount::zero(),
            total_shares: Amount::zero(),
            swappable: true,
            shares: BTreeMap::new(),
        }
    }

    pub fn shares_of(&self, address: &Address) -> Amount {
        self.shares.get(address).copied().unwrap_or(Amount::zero())
    }

    /// Price of token1 in token0 terms at this pool's tick.
    fn price_1_in_0(&self) -> Option<Decimal> {
        tick::tick_to_price(-self.key.tick_index_0_to_1)
    }

    /// token0-denominated value of an (amount0, amount1) pair.
    fn value_in_token0(&self, amount0: Amount, amount1: Amount) -> Option<Decimal> {
        let p = self.price_1_in_0()?;
        let a0 = amount0.as_decimal()?;
        let a1 = amount1.as_decimal()?;
        a0.checked_add(a1.checked_mul(p)?)
    }

    /// Credit a deposit, minting shares proportional to contributed value.
    /// The first deposit sets the baseline: shares == floored value.
    pub fn deposit(
        &mut self,
        receiver: &Address,
        amount0: Amount,
        amount1: Amount,
    ) -> Result<Amount, DexError> {
        if amount0.is_zero() && amount1.is_zero() {
            return Err(DexError::ZeroDeposit);
        }
        let deposit_value = self
            .value_in_token0(amount0, amount1)
            .ok_or(DexError::AmountOverflow)?;

        let pool_value = self
            .value_in_token0(self.reserves0, self.reserves1)
            .ok_or(DexError::AmountOverflow)?;

        let minted = if self.total_shares.is_zero() || pool_value.is_zero() {
            Amount::from_decimal_floor(deposit_value).ok_or(DexError::AmountOverflow)?
        } else {
            let total = self.total_shares.as_decimal().ok_or(DexError::AmountOverflow)?;
            let minted = deposit_value
                .checked_mul(total)
                .and_then(|v| v.checked_div(pool_value))
                .ok_or(DexError::AmountOverflow)?;
            Amount::from_decimal_floor(minted).ok_or(DexError::AmountOverflow)?
        };

        self.reserves0 = self
            .reserves0
            .checked_add(amount0)
            .ok_or(DexError::AmountOverflow)?;
        self.reserves1 = self
            .reserves1
            .checked_add(amount1)
            .ok_or(DexError::AmountOverflow)?;
        self.total_shares = self
            .total_shares
            .checked_add(minted)
            .ok_or(DexError::AmountOverflow)?;
        let holding = self.shares.entry(receiver.clone()).or_insert(Amount::zero());
        *holding = holding.checked_add(minted).ok_or(DexError::AmountOverflow)?;
        Ok(minted)
    }

    /// Burn shares, returning the proportional slice of both reserves.
    pub fn withdraw(
        &mut self,
        owner: &Address,
        shares_to_remove: Amount,
    ) -> Result<(Amount, Amount), DexError> {
        let owned = self.shares_of(owner);
        if shares_to_remove > owned {
            return Err(DexError::InsufficientShares {
                tick: self.key.tick_index_0_to_1,
                fee: self.key.fee,
                requested: shares_to_remove,
                owned,
            });
        }
        let out0 = mul_div_floor(self.reserves0, shares_to_remove, self.total_shares)
            .ok_or(DexError::AmountOverflow)?;
        let out1 = mul_div_floor(self.reserves1, shares_to_remove, self.total_shares)
            .ok_or(DexError::AmountOverflow)?;

        self.reserves0 -= out0;
        self.reserves1 -= out1;
        self.total_shares -= shares_to_remove;
        self.shares
            .insert(owner.clone(), owned - shares_to_remove);
        Ok((out0, out1))
    }

    /// Reserves available to a taker whose output token is token0 / token1.
    pub fn reserves_out(&self, out_is_token0: bool) -> Amount {
        if out_is_token0 {
            self.reserves0
        } else {
            self.reserves1
        }
    }

    /// Apply a swap against this pool: the taker takes `out` of one side
    /// and pays `in_paid` into the other. Caller has bounded `out` by
    /// `reserves_out`.
    pub(crate) fn swap_consume(&mut self, out_is_token0: bool, out: Amount, in_paid: Amount) {
        if out_is_token0 {
            self.reserves0 -= out;
            self.reserves1 += in_paid;
        } else {
            self.reserves1 -= out;
            self.reserves0 += in_paid;
        }
    }
}
