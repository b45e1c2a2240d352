//! Events emitted by state-changing messages
//!
//! TickUpdate is part of each operation's typed response rather than an
//! ambient side channel: handlers return the events they produced and the
//! surrounding framework republishes them. Every state-changing message
//! yields at least one.

use dex_types::ids::TrancheKey;
use dex_types::numeric::Amount;
use serde::{Deserialize, Serialize};

/// A change to the liquidity resting at one tick.
///
/// `tranche_key` identifies the affected tranche; pool-only updates carry
/// `None`. `reserves` is the remaining input-side liquidity at the updated
/// location after the change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickUpdate {
    pub token_in: String,
    pub token_out: String,
    pub tick_index: i64,
    pub fee: u64,
    #[serde(rename = "TrancheKey", skip_serializing_if = "Option::is_none")]
    pub tranche_key: Option<TrancheKey>,
    pub reserves: Amount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tranche_key_attribute_name() {
        let ev = TickUpdate {
            token_in: "untrn".to_string(),
            token_out: "uibcusdc".to_string(),
            tick_index: 1,
            fee: 0,
            tranche_key: Some(TrancheKey::from_sequence(3)),
            reserves: Amount::new(10),
        };
        let json = serde_json::to_value(&ev).unwrap();
        // Clients correlate by the TrancheKey attribute
        assert_eq!(json["TrancheKey"], "t/000000000003");
    }

    #[test]
    fn test_pool_update_omits_tranche_key() {
        let ev = TickUpdate {
            token_in: "untrn".to_string(),
            token_out: "uibcusdc".to_string(),
            tick_index: 0,
            fee: 0,
            tranche_key: None,
            reserves: Amount::new(90),
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert!(json.get("TrancheKey").is_none());
    }
}
