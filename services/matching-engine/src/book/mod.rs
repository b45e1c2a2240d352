//! Liquidity book infrastructure
//!
//! One `DirectedBook` per taker direction, mapping taker-view ticks to the
//! liquidity resting there. BTreeMap keys iterate ascending, so the walk
//! naturally visits the best taker price first.

pub mod tick_liquidity;

pub use tick_liquidity::TickLiquidity;

use dex_types::ids::TrancheKey;
use std::collections::BTreeMap;

use crate::pool::PoolKey;

/// All matchable liquidity for one taker direction, keyed by taker-view
/// tick. A maker tranche placed at `tick_index_in_to_out = t` lands in the
/// opposing direction's book at key `t`; a pool's reserves land at the
/// pool's tick in taker orientation shifted by `+fee`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DirectedBook {
    levels: BTreeMap<i64, TickLiquidity>,
}

impl DirectedBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_tranche(&mut self, tick: i64, key: TrancheKey) {
        self.levels.entry(tick).or_default().push_tranche(key);
    }

    pub fn attach_pool(&mut self, tick: i64, key: PoolKey) {
        self.levels.entry(tick).or_default().set_pool(key);
    }

    pub fn detach_pool(&mut self, tick: i64) {
        if let Some(level) = self.levels.get_mut(&tick) {
            level.clear_pool();
        }
        self.prune(tick);
    }

    /// Next populated tick after `after` (exclusive), bounded by `limit`
    /// (inclusive) when present. Ascending = best taker price first.
    pub fn next_tick(&self, after: Option<i64>, limit: Option<i64>) -> Option<i64> {
        let start = match after {
            Some(t) => t.checked_add(1)?,
            None => i64::MIN,
        };
        let tick = *self.levels.range(start..).next()?.0;
        match limit {
            Some(l) if tick > l => None,
            _ => Some(tick),
        }
    }

    pub fn front_tranche(&self, tick: i64) -> Option<TrancheKey> {
        self.levels.get(&tick)?.front_tranche().cloned()
    }

    pub fn pool_at(&self, tick: i64) -> Option<PoolKey> {
        self.levels.get(&tick)?.pool().cloned()
    }

    pub fn remove_tranche(&mut self, tick: i64, key: &TrancheKey) {
        if let Some(level) = self.levels.get_mut(&tick) {
            level.remove_tranche(key);
        }
        self.prune(tick);
    }

    /// Drop the level when nothing rests there anymore.
    pub fn prune(&mut self, tick: i64) {
        if self.levels.get(&tick).is_some_and(|l| l.is_empty()) {
            self.levels.remove(&tick);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}
