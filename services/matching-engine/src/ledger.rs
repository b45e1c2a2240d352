//! Per-(tranche, depositor) claim ledger
//!
//! One record per (TrancheKey, address) tracking the depositor's share of
//! a tranche's unfilled and filled reserves. Records persist after a
//! tranche closes so queries keep resolving historical placements; only
//! the claimable/unfilled amounts are zeroed by settlement.

use dex_types::ids::{Address, TrancheKey};
use dex_types::numeric::Amount;
use dex_types::order::LimitOrderType;
use dex_types::pair::DirectedPair;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrancheUserRecord {
    pub address: Address,
    pub tranche_key: TrancheKey,
    pub pair: DirectedPair,
    pub tick_index_in_to_out: i64,
    pub order_type: LimitOrderType,
    /// Cumulative input ever placed by this depositor (monotonic).
    pub shares_owned: Amount,
    /// Filled output awaiting withdrawal.
    pub amount_filled_claimable: Amount,
    /// Unfilled input still resting in the tranche.
    pub amount_unfilled_remaining: Amount,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrancheUserLedger {
    records: BTreeMap<(TrancheKey, Address), TrancheUserRecord>,
}

impl TrancheUserLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &TrancheKey, address: &Address) -> Option<&TrancheUserRecord> {
        self.records.get(&(key.clone(), address.clone()))
    }

    pub(crate) fn get_mut(
        &mut self,
        key: &TrancheKey,
        address: &Address,
    ) -> Option<&mut TrancheUserRecord> {
        self.records.get_mut(&(key.clone(), address.clone()))
    }

    /// Record a placement, creating the record on first contact.
    pub(crate) fn record_placement(
        &mut self,
        key: &TrancheKey,
        address: &Address,
        pair: &DirectedPair,
        tick_index_in_to_out: i64,
        order_type: LimitOrderType,
        amount: Amount,
    ) {
        let record = self
            .records
            .entry((key.clone(), address.clone()))
            .or_insert_with(|| TrancheUserRecord {
                address: address.clone(),
                tranche_key: key.clone(),
                pair: pair.clone(),
                tick_index_in_to_out,
                order_type,
                shares_owned: Amount::zero(),
                amount_filled_claimable: Amount::zero(),
                amount_unfilled_remaining: Amount::zero(),
            });
        record.shares_owned += amount;
        record.amount_unfilled_remaining += amount;
    }

    /// Move `consumed` from unfilled to `credited` of claimable.
    pub(crate) fn record_fill(
        &mut self,
        key: &TrancheKey,
        address: &Address,
        consumed: Amount,
        credited: Amount,
    ) {
        if let Some(record) = self.get_mut(key, address) {
            record.amount_unfilled_remaining =
                record.amount_unfilled_remaining.saturating_sub(consumed);
            record.amount_filled_claimable += credited;
        }
    }

    /// All records, ordered by (TrancheKey, address).
    pub fn iter(&self) -> impl Iterator<Item = &TrancheUserRecord> {
        self.records.values()
    }

    pub fn by_address<'a>(
        &'a self,
        address: &'a Address,
    ) -> impl Iterator<Item = &'a TrancheUserRecord> {
        self.records.values().filter(move |r| &r.address == address)
    }

    /// Sum of (unfilled, claimable) across one tranche's records; the
    /// engine's invariant ties these to the tranche reserves.
    pub fn tranche_totals(&self, key: &TrancheKey) -> (Amount, Amount) {
        self.records
            .values()
            .filter(|r| &r.tranche_key == key)
            .fold((Amount::zero(), Amount::zero()), |(u, c), r| {
                (
                    u + r.amount_unfilled_remaining,
                    c + r.amount_filled_claimable,
                )
            })
    }
}
