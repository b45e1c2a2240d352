//! Limit-order tranche: a FIFO liquidity queue at one price tick
//!
//! A tranche aggregates limit orders sharing (directed pair, tick, fee,
//! order-type class, expiration). `reserves_in` is the unfilled input
//! still for sale; `reserves_out` is filled output awaiting withdrawal.
//! Fills drain the contributor queue front-first, which keeps the ledger
//! sum invariants exact: the input-side credit for each contributor is
//! floored pro-rata with the rounding dust assigned to the last entry
//! touched, so credits always sum to exactly what the taker paid.

use dex_types::errors::DexError;
use dex_types::ids::{Address, TrancheKey};
use dex_types::numeric::Amount;
use dex_types::order::{LimitOrderType, TrancheStatus};
use dex_types::pair::DirectedPair;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// When a tranche stops accepting matches on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Expiration {
    /// GTC: lives until canceled or drained
    None,
    /// JIT: swept at the end of the block it was placed in
    EndOfBlock(u64),
    /// GTT: expires once block time reaches this value
    Time(i64),
}

/// One contributor's position in the FIFO queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrancheEntry {
    pub address: Address,
    pub unfilled: Amount,
}

/// Result of draining part of the queue during a fill.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub address: Address,
    /// Input-side reserves of this entry consumed by the taker.
    pub consumed: Amount,
    /// Output-side credit owed to this contributor.
    pub credited: Amount,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LimitOrderTranche {
    pub key: TrancheKey,
    /// Maker direction: contributors sell `token_in` for `token_out`.
    pub pair: DirectedPair,
    pub tick_index_in_to_out: i64,
    pub fee: u64,
    pub order_type: LimitOrderType,
    pub expiration: Expiration,
    /// Unfilled input remaining for sale.
    pub reserves_in: Amount,
    /// Filled output available for withdrawal.
    pub reserves_out: Amount,
    /// Cumulative input ever placed (share basis, monotonic).
    pub total_shares: Amount,
    pub status: TrancheStatus,
    entries: VecDeque<TrancheEntry>,
}

impl LimitOrderTranche {
    pub fn new(
        key: TrancheKey,
        pair: DirectedPair,
        tick_index_in_to_out: i64,
        fee: u64,
        order_type: LimitOrderType,
        expiration: Expiration,
    ) -> Self {
        Self {
            key,
            pair,
            tick_index_in_to_out,
            fee,
            order_type,
            expiration,
            reserves_in: Amount::zero(),
            reserves_out: Amount::zero(),
            total_shares: Amount::zero(),
            status: TrancheStatus::Open,
            entries: VecDeque::new(),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &TrancheEntry> {
        self.entries.iter()
    }

    pub fn is_expired(&self, now: i64) -> bool {
        matches!(self.expiration, Expiration::Time(t) if t <= now)
    }

    /// Append a contributor at the back of the queue (time priority).
    pub fn place(&mut self, address: &Address, amount: Amount) -> Result<(), DexError> {
        self.reserves_in = self
            .reserves_in
            .checked_add(amount)
            .ok_or(DexError::AmountOverflow)?;
        self.total_shares = self
            .total_shares
            .checked_add(amount)
            .ok_or(DexError::AmountOverflow)?;
        self.entries.push_back(TrancheEntry {
            address: address.clone(),
            unfilled: amount,
        });
        self.refresh_status();
        Ok(())
    }

    /// Consume `out_take` of `reserves_in` front-first against `in_paid`
    /// of the output token. Returns the per-contributor distribution.
    ///
    /// Caller guarantees `out_take <= reserves_in`.
    pub fn fill(&mut self, out_take: Amount, in_paid: Amount) -> Result<Vec<Fill>, DexError> {
        let mut fills: Vec<Fill> = Vec::new();
        let mut remaining = out_take;
        let mut credited_total = Amount::zero();

        while !remaining.is_zero() {
            let Some(front) = self.entries.front_mut() else {
                break;
            };
            let consumed = front.unfilled.min(remaining);
            front.unfilled -= consumed;
            remaining -= consumed;

            // Pro-rata floor; the dust goes to the last entry below.
            let credited = prorate_floor(in_paid, consumed, out_take)?;
            credited_total = credited_total
                .checked_add(credited)
                .ok_or(DexError::AmountOverflow)?;
            fills.push(Fill {
                address: front.address.clone(),
                consumed,
                credited,
            });
            if front.unfilled.is_zero() {
                self.entries.pop_front();
            }
        }

        // Assign rounding dust so the credits sum to exactly in_paid.
        if let Some(last) = fills.last_mut() {
            let dust = in_paid.saturating_sub(credited_total);
            last.credited = last
                .credited
                .checked_add(dust)
                .ok_or(DexError::AmountOverflow)?;
        }

        self.reserves_in -= out_take - remaining;
        self.reserves_out = self
            .reserves_out
            .checked_add(in_paid)
            .ok_or(DexError::AmountOverflow)?;
        self.refresh_status();
        Ok(fills)
    }

    /// Remove every entry belonging to `address`, returning the refunded
    /// unfilled total. Reserves are reduced accordingly.
    pub fn cancel_entries(&mut self, address: &Address) -> Amount {
        let mut refunded = Amount::zero();
        self.entries.retain(|e| {
            if &e.address == address {
                refunded += e.unfilled;
                false
            } else {
                true
            }
        });
        self.reserves_in -= refunded;
        self.refresh_status();
        refunded
    }

    /// Deduct a withdrawal of filled output.
    pub fn withdraw_filled(&mut self, amount: Amount) {
        self.reserves_out -= amount;
        self.refresh_status();
    }

    /// Terminal transition; never reopens.
    pub fn close(&mut self) {
        self.status = TrancheStatus::Closed;
    }

    /// Drain all entries, returning the refund per contributor. Used by
    /// the JIT sweep and lazy GTT expiry.
    pub(crate) fn drain_unfilled(&mut self) -> Vec<(Address, Amount)> {
        let refunds: Vec<(Address, Amount)> = self
            .entries
            .drain(..)
            .filter(|e| !e.unfilled.is_zero())
            .map(|e| (e.address, e.unfilled))
            .collect();
        self.reserves_in = Amount::zero();
        refunds
    }

    /// Recompute the forward-only lifecycle state from reserves. A Closed
    /// tranche stays Closed.
    fn refresh_status(&mut self) {
        if self.status == TrancheStatus::Closed {
            return;
        }
        self.status = match (self.reserves_in.is_zero(), self.reserves_out.is_zero()) {
            (false, true) => TrancheStatus::Open,
            (false, false) => TrancheStatus::PartiallyFilled,
            (true, false) => TrancheStatus::Filled,
            (true, true) => {
                if self.total_shares.is_zero() {
                    TrancheStatus::Open
                } else {
                    TrancheStatus::Closed
                }
            }
        };
    }
}

/// `floor(total_credit * part / whole)`.
fn prorate_floor(total_credit: Amount, part: Amount, whole: Amount) -> Result<Amount, DexError> {
    if whole.is_zero() {
        return Ok(Amount::zero());
    }
    let t = total_credit.as_decimal().ok_or(DexError::AmountOverflow)?;
    let p = part.as_decimal().ok_or(DexError::AmountOverflow)?;
    let w = whole.as_decimal().ok_or(DexError::AmountOverflow)?;
    let exact = t
        .checked_mul(p)
        .and_then(|v| v.checked_div(w))
        .ok_or(DexError::AmountOverflow)?;
    Amount::from_decimal_floor(exact).ok_or(DexError::AmountOverflow)
}
