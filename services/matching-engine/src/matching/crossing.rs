//! Crossing detection
//!
//! Taker-view tick conversions and the acceptance predicate. A taker
//! placing at limit tick T accepts any resting liquidity at taker-view
//! tick `k <= T`; books iterate ascending so the cheapest tick comes
//! first and the walk stops at the first non-crossing level.

/// Can a taker bounded by `limit` take liquidity at taker-view `tick`?
/// An unbounded taker (multi-hop routing) accepts any tick.
pub fn crosses(tick: i64, limit: Option<i64>) -> bool {
    match limit {
        Some(l) => tick <= l,
        None => true,
    }
}

/// Taker-view tick of a maker tranche placed at `tick_index_in_to_out`.
/// The maker's own orientation is the opposing direction, and the rates
/// line up exactly, so the key is the maker's tick unchanged.
pub fn tranche_book_tick(maker_tick_in_to_out: i64) -> i64 {
    maker_tick_in_to_out
}

/// Taker-view tick at which a pool's reserves are matchable.
///
/// A pool at canonical tick `c` (token0 priced in token1) offers token1
/// to 0->1 takers at `-c` and token0 to 1->0 takers at `c`; the fee
/// shifts both by `+fee`, worsening the taker's price.
pub fn pool_book_tick(tick_index_0_to_1: i64, fee: u64, out_is_token1: bool) -> i64 {
    let base = if out_is_token1 {
        -tick_index_0_to_1
    } else {
        tick_index_0_to_1
    };
    base.saturating_add(fee as i64)
}
