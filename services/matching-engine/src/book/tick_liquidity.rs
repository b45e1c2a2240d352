//! Liquidity resting at a single taker-view tick
//!
//! Tranches queue FIFO by tranche-key assignment order; at most one pool
//! can sit at a tick for a given direction. Within a tick, tranches match
//! before pool reserves.

use dex_types::ids::TrancheKey;
use std::collections::VecDeque;

use crate::pool::PoolKey;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickLiquidity {
    tranches: VecDeque<TrancheKey>,
    pool: Option<PoolKey>,
}

impl TickLiquidity {
    pub fn push_tranche(&mut self, key: TrancheKey) {
        self.tranches.push_back(key);
    }

    pub fn front_tranche(&self) -> Option<&TrancheKey> {
        self.tranches.front()
    }

    pub fn remove_tranche(&mut self, key: &TrancheKey) -> bool {
        if let Some(pos) = self.tranches.iter().position(|k| k == key) {
            self.tranches.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn set_pool(&mut self, key: PoolKey) {
        self.pool = Some(key);
    }

    pub fn clear_pool(&mut self) {
        self.pool = None;
    }

    pub fn pool(&self) -> Option<&PoolKey> {
        self.pool.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.tranches.is_empty() && self.pool.is_none()
    }

    pub fn tranche_count(&self) -> usize {
        self.tranches.len()
    }
}
