//! Taker swap executor
//!
//! Walks the opposing liquidity book ascending by taker-view tick,
//! consuming FIFO tranches first and pool reserves second at each tick,
//! until the input is exhausted, the output cap is reached, or no
//! crossing tick remains. Output is floored and input ceiled, so the
//! rounding remainder always stays with resting liquidity.
//!
//! The executor mutates tranches, pools, the books, and the user ledger,
//! but never the taker's bank balances; settlement of the taker's side is
//! the message handler's job. Callers run it against a scratch state when
//! they may still reject the message (fill-or-kill).

use dex_types::errors::DexError;
use dex_types::numeric::Amount;
use dex_types::pair::DirectedPair;
use dex_types::tick;
use tracing::debug;

use crate::engine::DexState;
use crate::events::TickUpdate;
use crate::matching::crossing;

/// Net result of one taker walk.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapOutcome {
    pub amount_in_used: Amount,
    pub amount_out: Amount,
    pub events: Vec<TickUpdate>,
}

/// How much output the taker still wants at `price`, bounded by the
/// remaining input and the optional output cap. Zero means the walk is
/// done (dust input or cap reached).
fn want_out(
    remaining_in: Amount,
    price: rust_decimal::Decimal,
    out_so_far: Amount,
    max_amount_out: Option<Amount>,
) -> Result<Amount, DexError> {
    let from_in = tick::mul_floor(remaining_in, price).ok_or(DexError::AmountOverflow)?;
    Ok(match max_amount_out {
        Some(cap) => from_in.min(cap.saturating_sub(out_so_far)),
        None => from_in,
    })
}

pub(crate) fn run_taker_swap(
    state: &mut DexState,
    pair: &DirectedPair,
    amount_in: Amount,
    limit_tick: Option<i64>,
    max_amount_out: Option<Amount>,
) -> Result<SwapOutcome, DexError> {
    let now = state.block.time;
    let mut remaining = amount_in;
    let mut out_total = Amount::zero();
    let mut events: Vec<TickUpdate> = Vec::new();
    let mut last_tick: Option<i64> = None;

    'walk: while !remaining.is_zero() {
        let Some(current) = state
            .books
            .get(pair)
            .and_then(|b| b.next_tick(last_tick, limit_tick))
        else {
            break;
        };
        last_tick = Some(current);
        debug_assert!(crossing::crosses(current, limit_tick));
        let price = tick::taker_price(current).ok_or(DexError::AmountOverflow)?;

        // Tranches first, FIFO by key assignment order.
        loop {
            let Some(key) = state.books.get(pair).and_then(|b| b.front_tranche(current)) else {
                break;
            };
            let Some(tranche) = state.tranches.get(&key) else {
                // Stale book reference; drop it and keep walking.
                if let Some(book) = state.books.get_mut(pair) {
                    book.remove_tranche(current, &key);
                }
                continue;
            };
            if tranche.is_expired(now) {
                if let Some(ev) = state.close_tranche_with_refund(&key)? {
                    events.push(ev);
                }
                continue;
            }
            let avail = tranche.reserves_in;
            if avail.is_zero() {
                if let Some(book) = state.books.get_mut(pair) {
                    book.remove_tranche(current, &key);
                }
                continue;
            }

            let want = want_out(remaining, price, out_total, max_amount_out)?;
            if want.is_zero() {
                break 'walk;
            }
            let take = want.min(avail);
            let in_used = tick::div_ceil(take, price)
                .ok_or(DexError::AmountOverflow)?
                .min(remaining);

            let tranche = state
                .tranches
                .get_mut(&key)
                .ok_or(DexError::AmountOverflow)?;
            let fills = tranche.fill(take, in_used)?;
            let reserves_after = tranche.reserves_in;
            let (maker_in, maker_out) = (
                tranche.pair.token_in().to_string(),
                tranche.pair.token_out().to_string(),
            );
            let (maker_tick, maker_fee) = (tranche.tick_index_in_to_out, tranche.fee);

            for fill in &fills {
                state
                    .ledger
                    .record_fill(&key, &fill.address, fill.consumed, fill.credited);
            }
            remaining -= in_used;
            out_total = out_total
                .checked_add(take)
                .ok_or(DexError::AmountOverflow)?;
            events.push(TickUpdate {
                token_in: maker_in,
                token_out: maker_out,
                tick_index: maker_tick,
                fee: maker_fee,
                tranche_key: Some(key.clone()),
                reserves: reserves_after,
            });
            debug!(
                tranche_key = %key,
                take = %take,
                in_used = %in_used,
                "consumed tranche liquidity"
            );

            if reserves_after.is_zero() {
                if let Some(book) = state.books.get_mut(pair) {
                    book.remove_tranche(current, &key);
                }
            }
            if remaining.is_zero() {
                break 'walk;
            }
        }

        // Then the pool resting at this tick, if it still has reserves.
        if let Some(pool_key) = state.books.get(pair).and_then(|b| b.pool_at(current)) {
            let out_is_token0 = pair.token_out() == pool_key.pair.token0();
            let avail = state
                .pools
                .get(&pool_key)
                .map(|p| p.reserves_out(out_is_token0))
                .unwrap_or(Amount::zero());
            if !avail.is_zero() {
                let want = want_out(remaining, price, out_total, max_amount_out)?;
                if want.is_zero() {
                    break 'walk;
                }
                let take = want.min(avail);
                if !take.is_zero() {
                    let in_used = tick::div_ceil(take, price)
                        .ok_or(DexError::AmountOverflow)?
                        .min(remaining);
                    let pool = state
                        .pools
                        .get_mut(&pool_key)
                        .ok_or(DexError::AmountOverflow)?;
                    pool.swap_consume(out_is_token0, take, in_used);
                    let reserves_after = pool.reserves_out(out_is_token0);
                    remaining -= in_used;
                    out_total = out_total
                        .checked_add(take)
                        .ok_or(DexError::AmountOverflow)?;
                    events.push(TickUpdate {
                        token_in: pair.token_out().to_string(),
                        token_out: pair.token_in().to_string(),
                        tick_index: pool_key.tick_index_0_to_1,
                        fee: pool_key.fee,
                        tranche_key: None,
                        reserves: reserves_after,
                    });
                    debug!(
                        tick = pool_key.tick_index_0_to_1,
                        take = %take,
                        in_used = %in_used,
                        "consumed pool liquidity"
                    );
                }
            }
        }

        if let Some(book) = state.books.get_mut(pair) {
            book.prune(current);
        }
    }

    Ok(SwapOutcome {
        amount_in_used: amount_in - remaining,
        amount_out: out_total,
        events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{BlockClock, DexState};
    use crate::pool::{PoolKey, TickPool};
    use crate::tranche::Expiration;
    use dex_types::ids::Address;
    use dex_types::order::LimitOrderType;
    use dex_types::pair::TradePair;

    fn state() -> DexState {
        let mut st = DexState::new();
        st.block = BlockClock {
            height: 1,
            time: 1_000,
        };
        st
    }

    // Maker sells uibcusdc for untrn; opposing taker sells untrn.
    fn maker_pair() -> DirectedPair {
        DirectedPair::new("uibcusdc", "untrn").unwrap()
    }

    fn post(st: &mut DexState, tick: i64, who: &str, amount: u128) -> dex_types::ids::TrancheKey {
        st.post_tranche(
            &maker_pair(),
            tick,
            LimitOrderType::GoodTilCanceled,
            Expiration::None,
            &Address::new(who),
            Amount::new(amount),
        )
        .unwrap()
    }

    #[test]
    fn test_walk_consumes_best_tick_first() {
        let mut st = state();
        post(&mut st, 5, "alice", 10);
        post(&mut st, 0, "bob", 10);

        let taker = maker_pair().reversed();
        let outcome =
            run_taker_swap(&mut st, &taker, Amount::new(12), Some(5), None).unwrap();

        // bob's tick 0 tranche (unit price) drains before alice's tick 5
        let first_key = outcome.events[0].tranche_key.clone().unwrap();
        let bob_rec = st.ledger.get(&first_key, &Address::new("bob"));
        assert!(bob_rec.is_some_and(|r| r.amount_unfilled_remaining.is_zero()));
        assert_eq!(outcome.amount_in_used, Amount::new(12));
        // 10 at price 1 plus 2 more at tick 5 (floor of 2 * 1.0001^-5)
        assert_eq!(outcome.amount_out, Amount::new(11));
    }

    #[test]
    fn test_limit_tick_bounds_walk() {
        let mut st = state();
        post(&mut st, 5, "alice", 10);

        let taker = maker_pair().reversed();
        let outcome =
            run_taker_swap(&mut st, &taker, Amount::new(10), Some(4), None).unwrap();
        assert_eq!(outcome.amount_in_used, Amount::zero());
        assert_eq!(outcome.amount_out, Amount::zero());
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn test_same_tick_tranches_fill_in_key_order() {
        let mut st = state();
        // Distinct JIT tranches so GTC aggregation does not merge them
        let k1 = st
            .post_tranche(
                &maker_pair(),
                0,
                LimitOrderType::JustInTime,
                Expiration::EndOfBlock(1),
                &Address::new("alice"),
                Amount::new(10),
            )
            .unwrap();
        let _k2 = st
            .post_tranche(
                &maker_pair(),
                0,
                LimitOrderType::JustInTime,
                Expiration::EndOfBlock(1),
                &Address::new("bob"),
                Amount::new(10),
            )
            .unwrap();

        let taker = maker_pair().reversed();
        let outcome =
            run_taker_swap(&mut st, &taker, Amount::new(10), Some(0), None).unwrap();
        assert_eq!(outcome.amount_out, Amount::new(10));
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.events[0].tranche_key, Some(k1.clone()));
        assert!(st.tranches[&k1].reserves_in.is_zero());
    }

    #[test]
    fn test_pool_consumed_after_tranches_at_tick() {
        let mut st = state();
        post(&mut st, 0, "alice", 10);

        let (pair, _) = TradePair::from_unordered("untrn", "uibcusdc").unwrap();
        let pool_key = PoolKey {
            pair,
            tick_index_0_to_1: 0,
            fee: 0,
        };
        let mut pool = TickPool::new(pool_key.clone());
        pool.deposit(&Address::new("lp"), Amount::new(100), Amount::new(100))
            .unwrap();
        st.pools.insert(pool_key.clone(), pool);
        st.sync_pool_books(&pool_key).unwrap();

        // Taker sells untrn (token1), takes uibcusdc (token0): tranche
        // first, then pool reserves0 at the same tick.
        let taker = maker_pair().reversed();
        let outcome =
            run_taker_swap(&mut st, &taker, Amount::new(30), Some(0), None).unwrap();
        assert_eq!(outcome.amount_out, Amount::new(30));
        assert_eq!(outcome.events.len(), 2);
        assert!(outcome.events[0].tranche_key.is_some());
        assert!(outcome.events[1].tranche_key.is_none());
        assert_eq!(st.pools[&pool_key].reserves0, Amount::new(80));
        assert_eq!(st.pools[&pool_key].reserves1, Amount::new(120));
    }

    #[test]
    fn test_expired_tranche_refunded_not_matched() {
        let mut st = state();
        let key = st
            .post_tranche(
                &maker_pair(),
                0,
                LimitOrderType::GoodTilTime,
                Expiration::Time(500), // block time is 1_000
                &Address::new("alice"),
                Amount::new(10),
            )
            .unwrap();

        let taker = maker_pair().reversed();
        let outcome =
            run_taker_swap(&mut st, &taker, Amount::new(10), Some(0), None).unwrap();
        assert_eq!(outcome.amount_out, Amount::zero());
        // The sweep refunded the maker's unfilled input
        assert_eq!(
            st.bank.balance_of(&Address::new("alice"), "uibcusdc"),
            Amount::new(10)
        );
        assert!(st.tranches[&key].status.is_terminal());
    }

    #[test]
    fn test_max_amount_out_stops_walk() {
        let mut st = state();
        post(&mut st, 0, "alice", 100);

        let taker = maker_pair().reversed();
        let outcome = run_taker_swap(
            &mut st,
            &taker,
            Amount::new(100),
            Some(0),
            Some(Amount::new(30)),
        )
        .unwrap();
        assert_eq!(outcome.amount_out, Amount::new(30));
        assert_eq!(outcome.amount_in_used, Amount::new(30));
        assert_eq!(st.tranches.values().next().unwrap().reserves_in, Amount::new(70));
    }
}
