//! Deterministic DEX state machine
//!
//! `MatchingEngine` applies one message at a time against a single owned
//! state. Every handler works on a clone of the state and commits it only
//! on success, so a failed message can never leave a partial write behind.
//! All collections are ordered maps and all arithmetic is integer or
//! fixed-point, so replaying the same message sequence always produces
//! the same state.

use std::collections::BTreeMap;

use dex_types::errors::DexError;
use dex_types::ids::{Address, TrancheKey};
use dex_types::numeric::Amount;
use dex_types::order::{LimitOrderType, TrancheStatus};
use dex_types::pair::DirectedPair;
use dex_types::tick;
use tracing::{debug, info};

use crate::bank::Bank;
use crate::book::DirectedBook;
use crate::events::TickUpdate;
use crate::ledger::TrancheUserLedger;
use crate::matching::crossing;
use crate::matching::executor::{self, SwapOutcome};
use crate::msg::{
    CancelLimitOrderMsg, CancelLimitOrderResponse, DepositMsg, DepositResponse, MultiHopSwapMsg,
    MultiHopSwapResponse, PlaceLimitOrderMsg, PlaceLimitOrderResponse, WithdrawFilledLimitOrderMsg,
    WithdrawFilledLimitOrderResponse, WithdrawalMsg, WithdrawalResponse,
};
use crate::pool::{PoolKey, TickPool};
use crate::query::QueryService;
use crate::tranche::{Expiration, LimitOrderTranche};

/// Block position, advanced externally via `begin_block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockClock {
    pub height: u64,
    /// Unix seconds.
    pub time: i64,
}

/// The whole mutable world: balances, pools, tranches, per-user claims,
/// and the per-direction liquidity books derived from them.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DexState {
    pub bank: Bank,
    pub pools: BTreeMap<PoolKey, TickPool>,
    pub tranches: BTreeMap<TrancheKey, LimitOrderTranche>,
    pub ledger: TrancheUserLedger,
    pub books: BTreeMap<DirectedPair, DirectedBook>,
    /// Open GTC/GTT tranche per (maker direction, tick, expiration), for
    /// aggregation.
    pub standing: BTreeMap<(DirectedPair, i64, Expiration), TrancheKey>,
    pub tranche_seq: u64,
    pub block: BlockClock,
}

impl DexState {
    pub(crate) fn new() -> Self {
        Self {
            bank: Bank::new(),
            pools: BTreeMap::new(),
            tranches: BTreeMap::new(),
            ledger: TrancheUserLedger::new(),
            books: BTreeMap::new(),
            standing: BTreeMap::new(),
            tranche_seq: 0,
            block: BlockClock::default(),
        }
    }

    pub(crate) fn next_tranche_key(&mut self) -> TrancheKey {
        let key = TrancheKey::from_sequence(self.tranche_seq);
        self.tranche_seq += 1;
        key
    }

    /// Rest a new tranche and index it in the opposing direction's book.
    pub(crate) fn post_tranche(
        &mut self,
        pair: &DirectedPair,
        tick_index_in_to_out: i64,
        order_type: LimitOrderType,
        expiration: Expiration,
        receiver: &Address,
        amount: Amount,
    ) -> Result<TrancheKey, DexError> {
        // GTC and GTT placements at the same location and expiration join
        // the open tranche. A tranche whose unfilled reserves ran out has
        // left the book and its status only moves forward, so it is never
        // reused; the next placement starts a fresh tranche and replaces
        // the standing entry.
        let aggregates = matches!(
            order_type,
            LimitOrderType::GoodTilCanceled | LimitOrderType::GoodTilTime
        );
        let standing_key = (pair.clone(), tick_index_in_to_out, expiration);
        let reuse = if aggregates {
            self.standing.get(&standing_key).and_then(|k| {
                self.tranches
                    .get(k)
                    .filter(|t| t.status.is_active())
                    .map(|_| k.clone())
            })
        } else {
            None
        };

        let key = match reuse {
            Some(key) => key,
            None => {
                let key = self.next_tranche_key();
                let tranche = LimitOrderTranche::new(
                    key.clone(),
                    pair.clone(),
                    tick_index_in_to_out,
                    0,
                    order_type,
                    expiration,
                );
                self.tranches.insert(key.clone(), tranche);
                let book_tick = crossing::tranche_book_tick(tick_index_in_to_out);
                self.books
                    .entry(pair.reversed())
                    .or_default()
                    .insert_tranche(book_tick, key.clone());
                if aggregates {
                    self.standing.insert(standing_key, key.clone());
                }
                key
            }
        };

        let tranche = self
            .tranches
            .get_mut(&key)
            .ok_or(DexError::NoActiveLimitOrder)?;
        tranche.place(receiver, amount)?;
        self.ledger.record_placement(
            &key,
            receiver,
            pair,
            tick_index_in_to_out,
            order_type,
            amount,
        );
        Ok(key)
    }

    /// Drain and close a tranche, refunding every contributor's unfilled
    /// input and zeroing the matching ledger records. Used by the JIT
    /// sweep, lazy GTT expiry, and full cancellation.
    pub(crate) fn close_tranche_with_refund(
        &mut self,
        key: &TrancheKey,
    ) -> Result<Option<TickUpdate>, DexError> {
        let Some(tranche) = self.tranches.get_mut(key) else {
            return Ok(None);
        };
        let refunds = tranche.drain_unfilled();
        tranche.close();
        let pair = tranche.pair.clone();
        let tick = tranche.tick_index_in_to_out;
        let fee = tranche.fee;
        let denom_in = pair.token_in().to_string();

        for (address, amount) in refunds {
            self.bank.credit(&address, &denom_in, amount)?;
            if let Some(record) = self.ledger.get_mut(key, &address) {
                record.amount_unfilled_remaining = Amount::zero();
            }
        }
        if let Some(book) = self.books.get_mut(&pair.reversed()) {
            book.remove_tranche(crossing::tranche_book_tick(tick), key);
        }
        Ok(Some(TickUpdate {
            token_in: pair.token_in().to_string(),
            token_out: pair.token_out().to_string(),
            tick_index: tick,
            fee,
            tranche_key: Some(key.clone()),
            reserves: Amount::zero(),
        }))
    }

    /// Re-derive a pool's book attachments from its current reserves and
    /// swappable flag. At most one pool can rest at a given taker-view
    /// tick per direction; a later attachment replaces an earlier one.
    pub(crate) fn sync_pool_books(&mut self, pool_key: &PoolKey) -> Result<(), DexError> {
        let Some(pool) = self.pools.get(pool_key) else {
            return Ok(());
        };
        let has_reserves = !pool.reserves0.is_zero() || !pool.reserves1.is_zero();
        let active = pool.swappable && has_reserves;

        let token0 = pool_key.pair.token0().to_string();
        let token1 = pool_key.pair.token1().to_string();
        let sell0 = DirectedPair::new(&token0, &token1)?;
        let sell1 = sell0.reversed();
        let c = pool_key.tick_index_0_to_1;
        // A 0->1 taker consumes token1 reserves, a 1->0 taker token0.
        let tick_sell0 = crossing::pool_book_tick(c, pool_key.fee, true);
        let tick_sell1 = crossing::pool_book_tick(c, pool_key.fee, false);

        if active {
            for (pair, tick) in [(sell0, tick_sell0), (sell1, tick_sell1)] {
                let book = self.books.entry(pair).or_default();
                if let Some(prev) = book.pool_at(tick) {
                    if prev != *pool_key {
                        debug!(
                            tick,
                            displaced = ?prev,
                            attached = ?pool_key,
                            "pool attachment displaced another pool at this tick"
                        );
                    }
                }
                book.attach_pool(tick, pool_key.clone());
            }
        } else {
            if let Some(book) = self.books.get_mut(&sell0) {
                if book.pool_at(tick_sell0).as_ref() == Some(pool_key) {
                    book.detach_pool(tick_sell0);
                }
            }
            if let Some(book) = self.books.get_mut(&sell1) {
                if book.pool_at(tick_sell1).as_ref() == Some(pool_key) {
                    book.detach_pool(tick_sell1);
                }
            }
        }
        Ok(())
    }
}

/// Public engine facade: block lifecycle, message handlers, queries.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchingEngine {
    state: DexState,
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchingEngine {
    pub fn new() -> Self {
        Self {
            state: DexState::new(),
        }
    }

    /// Advance the block position. Height and time only move via this
    /// call, never from a wall clock.
    pub fn begin_block(&mut self, height: u64, time: i64) {
        self.state.block = BlockClock { height, time };
        debug!(height, time, "begin block");
    }

    /// Sweep just-in-time tranches placed in this block: refund unfilled
    /// input and close them. Returns the resulting tick updates.
    pub fn end_block(&mut self) -> Result<Vec<TickUpdate>, DexError> {
        let height = self.state.block.height;
        let expired: Vec<TrancheKey> = self
            .state
            .tranches
            .values()
            .filter(|t| {
                t.status != TrancheStatus::Closed
                    && matches!(t.expiration, Expiration::EndOfBlock(h) if h <= height)
            })
            .map(|t| t.key.clone())
            .collect();

        let mut events = Vec::new();
        for key in expired {
            if let Some(ev) = self.state.close_tranche_with_refund(&key)? {
                events.push(ev);
            }
        }
        if !events.is_empty() {
            info!(height, swept = events.len(), "swept just-in-time tranches");
        }
        Ok(events)
    }

    /// Credit spendable balance. Genesis / test funding hook.
    pub fn fund(&mut self, address: &Address, denom: &str, amount: Amount) -> Result<(), DexError> {
        self.state.bank.credit(address, denom, amount)
    }

    pub fn balance_of(&self, address: &Address, denom: &str) -> Amount {
        self.state.bank.balance_of(address, denom)
    }

    /// Sum of all spendable balances in one denom. Escrowed funds live in
    /// pool and tranche reserves instead. Diagnostic helper.
    pub fn bank_supply(&self, denom: &str) -> Amount {
        self.state.bank.total_supply(denom)
    }

    pub fn queries(&self) -> QueryService<'_> {
        QueryService::new(&self.state)
    }

    /// Add liquidity to one or more tick pools of a pair.
    pub fn deposit(
        &mut self,
        sender: &Address,
        msg: &DepositMsg,
    ) -> Result<DepositResponse, DexError> {
        let (pair, a_is_token0) =
            dex_types::pair::TradePair::from_unordered(&msg.token_a, &msg.token_b)?;
        let legs = msg.legs()?;

        let mut st = self.state.clone();
        let mut shares_minted = Vec::with_capacity(legs.len());
        let mut events = Vec::new();

        for leg in &legs {
            if leg.tick_index_a_to_b.unsigned_abs() > tick::MAX_TICK as u64 {
                return Err(DexError::TickOutOfRange {
                    tick: leg.tick_index_a_to_b,
                    max: tick::MAX_TICK,
                });
            }
            if !crate::query::FEE_TIERS.contains(&leg.fee) {
                return Err(DexError::InvalidFee { fee: leg.fee });
            }
            let tick_0_to_1 = if a_is_token0 {
                leg.tick_index_a_to_b
            } else {
                -leg.tick_index_a_to_b
            };
            let (amount0, amount1) = if a_is_token0 {
                (leg.amount_a, leg.amount_b)
            } else {
                (leg.amount_b, leg.amount_a)
            };

            st.bank.debit(sender, &msg.token_a, leg.amount_a)?;
            st.bank.debit(sender, &msg.token_b, leg.amount_b)?;

            let pool_key = PoolKey {
                pair: pair.clone(),
                tick_index_0_to_1: tick_0_to_1,
                fee: leg.fee,
            };
            let pool = st
                .pools
                .entry(pool_key.clone())
                .or_insert_with(|| TickPool::new(pool_key.clone()));
            if leg.options.disable_swap {
                pool.swappable = false;
            }
            let minted = pool.deposit(&msg.receiver, amount0, amount1)?;
            let r0 = pool.reserves0;
            shares_minted.push(minted);

            st.sync_pool_books(&pool_key)?;
            events.push(TickUpdate {
                token_in: pair.token0().to_string(),
                token_out: pair.token1().to_string(),
                tick_index: tick_0_to_1,
                fee: leg.fee,
                tranche_key: None,
                reserves: r0,
            });
        }

        info!(
            %sender,
            pair = %pair,
            legs = legs.len(),
            "deposit applied"
        );
        self.state = st;
        Ok(DepositResponse {
            shares_minted,
            events,
        })
    }

    /// Burn pool shares for a proportional slice of both reserves.
    pub fn withdrawal(
        &mut self,
        sender: &Address,
        msg: &WithdrawalMsg,
    ) -> Result<WithdrawalResponse, DexError> {
        let (pair, a_is_token0) =
            dex_types::pair::TradePair::from_unordered(&msg.token_a, &msg.token_b)?;
        let legs = msg.legs()?;

        let mut st = self.state.clone();
        let mut amounts_a = Vec::with_capacity(legs.len());
        let mut amounts_b = Vec::with_capacity(legs.len());
        let mut events = Vec::new();

        for leg in &legs {
            let tick_0_to_1 = if a_is_token0 {
                leg.tick_index_a_to_b
            } else {
                -leg.tick_index_a_to_b
            };
            let pool_key = PoolKey {
                pair: pair.clone(),
                tick_index_0_to_1: tick_0_to_1,
                fee: leg.fee,
            };
            let pool = st
                .pools
                .get_mut(&pool_key)
                .ok_or_else(|| DexError::PoolNotFound {
                    pair: pair.to_string(),
                    tick: tick_0_to_1,
                    fee: leg.fee,
                })?;
            let (out0, out1) = pool.withdraw(sender, leg.shares_to_remove)?;
            let r0 = pool.reserves0;

            st.bank.credit(&msg.receiver, pair.token0(), out0)?;
            st.bank.credit(&msg.receiver, pair.token1(), out1)?;
            st.sync_pool_books(&pool_key)?;

            let (out_a, out_b) = if a_is_token0 { (out0, out1) } else { (out1, out0) };
            amounts_a.push(out_a);
            amounts_b.push(out_b);
            events.push(TickUpdate {
                token_in: pair.token0().to_string(),
                token_out: pair.token1().to_string(),
                tick_index: tick_0_to_1,
                fee: leg.fee,
                tranche_key: None,
                reserves: r0,
            });
        }

        info!(%sender, pair = %pair, legs = legs.len(), "withdrawal applied");
        self.state = st;
        Ok(WithdrawalResponse {
            amounts_a,
            amounts_b,
            events,
        })
    }

    /// Swap immediately against crossing liquidity, then rest the
    /// remainder at the limit tick when the order type allows.
    pub fn place_limit_order(
        &mut self,
        sender: &Address,
        msg: &PlaceLimitOrderMsg,
    ) -> Result<PlaceLimitOrderResponse, DexError> {
        let pair = DirectedPair::new(&msg.token_in, &msg.token_out)?;
        if msg.tick_index_in_to_out.unsigned_abs() > tick::MAX_TICK as u64 {
            return Err(DexError::TickOutOfRange {
                tick: msg.tick_index_in_to_out,
                max: tick::MAX_TICK,
            });
        }
        if msg.amount_in.is_zero() {
            return Err(DexError::ZeroAmount);
        }
        let expiration = match msg.order_type {
            LimitOrderType::GoodTilTime => match msg.expiration_time {
                None => return Err(DexError::ExpirationRequired),
                Some(t) if t <= self.state.block.time => {
                    return Err(DexError::ExpirationInPast)
                }
                Some(t) => Expiration::Time(t),
            },
            LimitOrderType::JustInTime => {
                if msg.expiration_time.is_some() {
                    return Err(DexError::UnexpectedExpiration);
                }
                Expiration::EndOfBlock(self.state.block.height)
            }
            LimitOrderType::GoodTilCanceled
            | LimitOrderType::FillOrKill
            | LimitOrderType::ImmediateOrCancel => {
                if msg.expiration_time.is_some() {
                    return Err(DexError::UnexpectedExpiration);
                }
                Expiration::None
            }
        };

        let mut st = self.state.clone();
        let SwapOutcome {
            amount_in_used,
            amount_out,
            mut events,
        } = executor::run_taker_swap(
            &mut st,
            &pair,
            msg.amount_in,
            Some(msg.tick_index_in_to_out),
            msg.max_amount_out,
        )?;
        let remaining = msg.amount_in - amount_in_used;
        let capped = msg
            .max_amount_out
            .is_some_and(|cap| amount_out >= cap);

        let (posted, tranche_key) = match msg.order_type {
            LimitOrderType::FillOrKill => {
                if !remaining.is_zero() && !capped {
                    return Err(DexError::FillOrKillUnsatisfied {
                        amount_in: msg.amount_in,
                        unmatched: remaining,
                    });
                }
                (Amount::zero(), None)
            }
            LimitOrderType::ImmediateOrCancel => (Amount::zero(), None),
            LimitOrderType::GoodTilCanceled
            | LimitOrderType::GoodTilTime
            | LimitOrderType::JustInTime => {
                if remaining.is_zero() || capped {
                    (Amount::zero(), None)
                } else {
                    let key = st.post_tranche(
                        &pair,
                        msg.tick_index_in_to_out,
                        msg.order_type,
                        expiration,
                        &msg.receiver,
                        remaining,
                    )?;
                    let reserves = st
                        .tranches
                        .get(&key)
                        .map(|t| t.reserves_in)
                        .unwrap_or(Amount::zero());
                    events.push(TickUpdate {
                        token_in: msg.token_in.clone(),
                        token_out: msg.token_out.clone(),
                        tick_index: msg.tick_index_in_to_out,
                        fee: 0,
                        tranche_key: Some(key.clone()),
                        reserves,
                    });
                    (remaining, Some(key))
                }
            }
        };

        let coin_in_used = amount_in_used
            .checked_add(posted)
            .ok_or(DexError::AmountOverflow)?;
        st.bank.debit(sender, &msg.token_in, coin_in_used)?;
        st.bank.credit(&msg.receiver, &msg.token_out, amount_out)?;

        info!(
            %sender,
            pair = %pair,
            tick = msg.tick_index_in_to_out,
            order_type = msg.order_type.code(),
            swapped_in = %amount_in_used,
            swapped_out = %amount_out,
            posted = %posted,
            "limit order placed"
        );
        self.state = st;
        Ok(PlaceLimitOrderResponse {
            tranche_key,
            coin_in_used,
            taker_coin_out: amount_out,
            events,
        })
    }

    /// Claim the filled (output-side) proceeds of a limit order. Succeeds
    /// with a zero payout when nothing new has filled.
    pub fn withdraw_filled_limit_order(
        &mut self,
        sender: &Address,
        msg: &WithdrawFilledLimitOrderMsg,
    ) -> Result<WithdrawFilledLimitOrderResponse, DexError> {
        if self.state.ledger.get(&msg.tranche_key, sender).is_none() {
            return Err(DexError::NoLedgerRecord {
                address: sender.to_string(),
                tranche_key: msg.tranche_key.to_string(),
            });
        }

        let mut st = self.state.clone();
        let mut events = Vec::new();

        // Lazily settle an expired tranche before paying out.
        let expired = st
            .tranches
            .get(&msg.tranche_key)
            .is_some_and(|t| t.status != TrancheStatus::Closed && t.is_expired(st.block.time));
        if expired {
            if let Some(ev) = st.close_tranche_with_refund(&msg.tranche_key)? {
                events.push(ev);
            }
        }

        let claimable = st
            .ledger
            .get(&msg.tranche_key, sender)
            .map(|r| r.amount_filled_claimable)
            .unwrap_or(Amount::zero());

        if let Some(tranche) = st.tranches.get_mut(&msg.tranche_key) {
            tranche.withdraw_filled(claimable);
            let denom_out = tranche.pair.token_out().to_string();
            let reserves = tranche.reserves_in;
            let (tick_index, fee) = (tranche.tick_index_in_to_out, tranche.fee);
            let (token_in, token_out) = (
                tranche.pair.token_in().to_string(),
                tranche.pair.token_out().to_string(),
            );
            st.bank.credit(sender, &denom_out, claimable)?;
            events.push(TickUpdate {
                token_in,
                token_out,
                tick_index,
                fee,
                tranche_key: Some(msg.tranche_key.clone()),
                reserves,
            });
        }
        if let Some(record) = st.ledger.get_mut(&msg.tranche_key, sender) {
            record.amount_filled_claimable = Amount::zero();
        }

        debug!(%sender, tranche_key = %msg.tranche_key, withdrawn = %claimable, "filled proceeds withdrawn");
        self.state = st;
        Ok(WithdrawFilledLimitOrderResponse {
            amount_withdrawn: claimable,
            events,
        })
    }

    /// Refund the sender's unfilled input resting in a tranche. Fails when
    /// the tranche is gone, expired, or holds nothing of the sender's.
    pub fn cancel_limit_order(
        &mut self,
        sender: &Address,
        msg: &CancelLimitOrderMsg,
    ) -> Result<CancelLimitOrderResponse, DexError> {
        let active = self.state.tranches.get(&msg.tranche_key).is_some_and(|t| {
            t.status != TrancheStatus::Closed
                && !t.is_expired(self.state.block.time)
                && t.entries()
                    .any(|e| &e.address == sender && !e.unfilled.is_zero())
        });
        if !active {
            return Err(DexError::NoActiveLimitOrder);
        }

        let mut st = self.state.clone();
        let tranche = st
            .tranches
            .get_mut(&msg.tranche_key)
            .ok_or(DexError::NoActiveLimitOrder)?;
        let refunded = tranche.cancel_entries(sender);
        let denom_in = tranche.pair.token_in().to_string();
        let reserves = tranche.reserves_in;
        let (token_in, token_out) = (
            tranche.pair.token_in().to_string(),
            tranche.pair.token_out().to_string(),
        );
        let (tick_index, fee) = (tranche.tick_index_in_to_out, tranche.fee);
        let emptied = tranche.reserves_in.is_zero();
        let book_pair = tranche.pair.reversed();

        st.bank.credit(sender, &denom_in, refunded)?;
        if let Some(record) = st.ledger.get_mut(&msg.tranche_key, sender) {
            record.amount_unfilled_remaining = Amount::zero();
        }
        if emptied {
            if let Some(book) = st.books.get_mut(&book_pair) {
                book.remove_tranche(crossing::tranche_book_tick(tick_index), &msg.tranche_key);
            }
        }

        info!(%sender, tranche_key = %msg.tranche_key, refunded = %refunded, "limit order canceled");
        self.state = st;
        Ok(CancelLimitOrderResponse {
            amount_refunded: refunded,
            events: vec![TickUpdate {
                token_in,
                token_out,
                tick_index,
                fee,
                tranche_key: Some(msg.tranche_key.clone()),
                reserves,
            }],
        })
    }

    /// Swap through a chain of pairs. Each hop takes whatever price the
    /// books offer; the overall realized price must meet the exit limit.
    pub fn multi_hop_swap(
        &mut self,
        sender: &Address,
        msg: &MultiHopSwapMsg,
    ) -> Result<MultiHopSwapResponse, DexError> {
        if msg.route.len() < 2 {
            return Err(DexError::InvalidRoute);
        }
        if msg.amount_in.is_zero() {
            return Err(DexError::ZeroAmount);
        }

        let mut st = self.state.clone();
        st.bank.debit(sender, &msg.route[0], msg.amount_in)?;

        let mut events = Vec::new();
        let mut amount = msg.amount_in;
        for (i, hop) in msg.route.windows(2).enumerate() {
            let pair =
                DirectedPair::new(&hop[0], &hop[1]).map_err(|_| DexError::InvalidRoute)?;
            let outcome = executor::run_taker_swap(&mut st, &pair, amount, None, None)?;
            if outcome.amount_out.is_zero() {
                return Err(DexError::InsufficientLiquidity {
                    token_in: hop[0].clone(),
                    token_out: hop[1].clone(),
                });
            }
            // Unspendable dust of the hop's input token.
            let leftover = amount - outcome.amount_in_used;
            if !leftover.is_zero() {
                let dust_owner = if i == 0 { sender } else { &msg.receiver };
                st.bank.credit(dust_owner, &hop[0], leftover)?;
            }
            amount = outcome.amount_out;
            events.extend(outcome.events);
        }

        let realized = amount
            .as_decimal()
            .and_then(|out| {
                msg.amount_in
                    .as_decimal()
                    .and_then(|inp| out.checked_div(inp))
            })
            .ok_or(DexError::AmountOverflow)?;
        if realized < msg.exit_limit_price {
            return Err(DexError::LimitPriceNotSatisfied {
                realized,
                limit: msg.exit_limit_price,
            });
        }

        let denom_out = match msg.route.last() {
            Some(d) => d.clone(),
            None => return Err(DexError::InvalidRoute),
        };
        st.bank.credit(&msg.receiver, &denom_out, amount)?;

        info!(
            %sender,
            hops = msg.route.len() - 1,
            amount_in = %msg.amount_in,
            coin_out = %amount,
            "multi-hop swap applied"
        );
        self.state = st;
        Ok(MultiHopSwapResponse {
            coin_out: amount,
            events,
        })
    }
}
