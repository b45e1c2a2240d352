//! Read-only query surface
//!
//! Queries borrow the engine state and never mutate it. Paginated listings
//! iterate the underlying ordered maps, so page contents are stable for a
//! given state.

use dex_types::ids::{Address, TrancheKey};
use dex_types::numeric::Amount;
use dex_types::order::{LimitOrderType, TrancheStatus};
use dex_types::pair::TradePair;
use dex_types::tick;
use serde::{Deserialize, Serialize};

use dex_types::errors::DexError;

use crate::engine::DexState;
use crate::ledger::TrancheUserRecord;
use crate::pool::PoolKey;

/// Module parameters, fixed at genesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Params {
    pub fee_tiers: Vec<u64>,
    pub max_tick_index: i64,
    pub page_limit: u64,
}

pub const FEE_TIERS: [u64; 12] = [0, 1, 2, 3, 4, 5, 10, 20, 50, 100, 150, 200];
pub const DEFAULT_PAGE_LIMIT: u64 = 100;

/// Offset pagination over an ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub offset: u64,
    pub limit: u64,
}

/// Snapshot view of one tranche.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrancheInfo {
    pub tranche_key: TrancheKey,
    pub token_in: String,
    pub token_out: String,
    pub tick_index_in_to_out: i64,
    pub order_type: LimitOrderType,
    pub status: TrancheStatus,
    pub reserves_in: Amount,
    pub reserves_out: Amount,
    pub total_shares: Amount,
}

/// Snapshot view of one tick pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolInfo {
    pub token0: String,
    pub token1: String,
    pub tick_index_0_to_1: i64,
    pub fee: u64,
    pub reserves0: Amount,
    pub reserves1: Amount,
    pub total_shares: Amount,
    pub swappable: bool,
}

pub struct QueryService<'a> {
    state: &'a DexState,
}

impl<'a> QueryService<'a> {
    pub(crate) fn new(state: &'a DexState) -> Self {
        Self { state }
    }

    pub fn params(&self) -> Params {
        Params {
            fee_tiers: FEE_TIERS.to_vec(),
            max_tick_index: tick::MAX_TICK,
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// One depositor's claim record in one tranche.
    pub fn limit_order_tranche_user(
        &self,
        address: &Address,
        tranche_key: &TrancheKey,
    ) -> Option<TrancheUserRecord> {
        self.state.ledger.get(tranche_key, address).cloned()
    }

    /// All claim records, ordered by (tranche key, address).
    pub fn limit_order_tranche_user_all(
        &self,
        page: Option<PageRequest>,
    ) -> Vec<TrancheUserRecord> {
        let page = page.unwrap_or(PageRequest {
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        });
        self.state
            .ledger
            .iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect()
    }

    /// All claim records belonging to one address.
    pub fn limit_order_tranche_user_all_by_address(
        &self,
        address: &Address,
    ) -> Vec<TrancheUserRecord> {
        self.state.ledger.by_address(address).cloned().collect()
    }

    pub fn limit_order_tranche(&self, tranche_key: &TrancheKey) -> Option<TrancheInfo> {
        self.state.tranches.get(tranche_key).map(|t| TrancheInfo {
            tranche_key: t.key.clone(),
            token_in: t.pair.token_in().to_string(),
            token_out: t.pair.token_out().to_string(),
            tick_index_in_to_out: t.tick_index_in_to_out,
            order_type: t.order_type,
            status: t.status,
            reserves_in: t.reserves_in,
            reserves_out: t.reserves_out,
            total_shares: t.total_shares,
        })
    }

    /// Pool lookup by unordered pair, directional tick, and fee.
    pub fn pool(
        &self,
        token_a: &str,
        token_b: &str,
        tick_index_a_to_b: i64,
        fee: u64,
    ) -> Result<Option<PoolInfo>, DexError> {
        let (pair, a_is_token0) = TradePair::from_unordered(token_a, token_b)?;
        let tick_0_to_1 = if a_is_token0 {
            tick_index_a_to_b
        } else {
            -tick_index_a_to_b
        };
        let key = PoolKey {
            pair,
            tick_index_0_to_1: tick_0_to_1,
            fee,
        };
        Ok(self.state.pools.get(&key).map(|p| PoolInfo {
            token0: p.key.pair.token0().to_string(),
            token1: p.key.pair.token1().to_string(),
            tick_index_0_to_1: p.key.tick_index_0_to_1,
            fee: p.key.fee,
            reserves0: p.reserves0,
            reserves1: p.reserves1,
            total_shares: p.total_shares,
            swappable: p.swappable,
        }))
    }

    /// Pool share balance of one address.
    pub fn pool_shares(
        &self,
        owner: &Address,
        token_a: &str,
        token_b: &str,
        tick_index_a_to_b: i64,
        fee: u64,
    ) -> Result<Amount, DexError> {
        let (pair, a_is_token0) = TradePair::from_unordered(token_a, token_b)?;
        let tick_0_to_1 = if a_is_token0 {
            tick_index_a_to_b
        } else {
            -tick_index_a_to_b
        };
        let key = PoolKey {
            pair,
            tick_index_0_to_1: tick_0_to_1,
            fee,
        };
        Ok(self
            .state
            .pools
            .get(&key)
            .map(|p| p.shares_of(owner))
            .unwrap_or(Amount::zero()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MatchingEngine;
    use crate::msg::{DepositMsg, PlaceLimitOrderMsg};

    fn seeded_engine() -> (MatchingEngine, Address) {
        let mut e = MatchingEngine::new();
        e.begin_block(1, 1_000);
        let alice = Address::new("alice");
        e.fund(&alice, "untrn", Amount::new(1_000)).unwrap();
        e.fund(&alice, "uibcusdc", Amount::new(1_000)).unwrap();
        e.deposit(
            &alice,
            &DepositMsg {
                receiver: alice.clone(),
                token_a: "untrn".to_string(),
                token_b: "uibcusdc".to_string(),
                amounts_a: vec![Amount::new(100)],
                amounts_b: vec![Amount::new(100)],
                tick_indexes_a_to_b: vec![1],
                fees: vec![0],
                options: vec![],
            },
        )
        .unwrap();
        (e, alice)
    }

    #[test]
    fn test_params() {
        let e = MatchingEngine::new();
        let params = e.queries().params();
        assert_eq!(params.fee_tiers.first(), Some(&0));
        assert_eq!(params.fee_tiers.last(), Some(&200));
        assert_eq!(params.max_tick_index, tick::MAX_TICK);
    }

    #[test]
    fn test_pool_query_direction_invariant() {
        let (e, _) = seeded_engine();
        // tick 1 untrn->uibcusdc equals tick -1 uibcusdc->untrn
        let p1 = e.queries().pool("untrn", "uibcusdc", 1, 0).unwrap().unwrap();
        let p2 = e.queries().pool("uibcusdc", "untrn", -1, 0).unwrap().unwrap();
        assert_eq!(p1, p2);
        assert_eq!(p1.reserves0, Amount::new(100));
    }

    #[test]
    fn test_pool_shares_query() {
        let (e, alice) = seeded_engine();
        let shares = e
            .queries()
            .pool_shares(&alice, "untrn", "uibcusdc", 1, 0)
            .unwrap();
        assert_eq!(shares, Amount::new(200));
    }

    #[test]
    fn test_tranche_user_queries() {
        let (mut e, alice) = seeded_engine();
        let resp = e
            .place_limit_order(
                &alice,
                &PlaceLimitOrderMsg {
                    receiver: alice.clone(),
                    token_in: "untrn".to_string(),
                    token_out: "uibcusdc".to_string(),
                    tick_index_in_to_out: 50,
                    amount_in: Amount::new(40),
                    order_type: LimitOrderType::GoodTilCanceled,
                    expiration_time: None,
                    max_amount_out: None,
                },
            )
            .unwrap();
        let key = resp.tranche_key.unwrap();

        let one = e.queries().limit_order_tranche_user(&alice, &key).unwrap();
        assert_eq!(one.shares_owned, Amount::new(40));

        let all = e.queries().limit_order_tranche_user_all(None);
        assert_eq!(all.len(), 1);
        let mine = e.queries().limit_order_tranche_user_all_by_address(&alice);
        assert_eq!(mine.len(), 1);

        let none = e
            .queries()
            .limit_order_tranche_user(&Address::new("bob"), &key);
        assert!(none.is_none());
    }

    #[test]
    fn test_pagination_bounds() {
        let (mut e, alice) = seeded_engine();
        for tick in [10, 20, 30] {
            e.place_limit_order(
                &alice,
                &PlaceLimitOrderMsg {
                    receiver: alice.clone(),
                    token_in: "untrn".to_string(),
                    token_out: "uibcusdc".to_string(),
                    tick_index_in_to_out: tick,
                    amount_in: Amount::new(10),
                    order_type: LimitOrderType::GoodTilCanceled,
                    expiration_time: None,
                    max_amount_out: None,
                },
            )
            .unwrap();
        }
        let page = e
            .queries()
            .limit_order_tranche_user_all(Some(PageRequest { offset: 1, limit: 1 }));
        assert_eq!(page.len(), 1);
        let past_end = e
            .queries()
            .limit_order_tranche_user_all(Some(PageRequest { offset: 10, limit: 5 }));
        assert!(past_end.is_empty());
    }
}
