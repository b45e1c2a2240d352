//! Limit-order type codes and tranche lifecycle states

use crate::errors::DexError;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Order-execution policy, wire-encoded as a small integer code.
///
/// The set is closed: policy application matches exhaustively so a future
/// code cannot be silently mishandled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitOrderType {
    /// Code 0: remainder rests until filled or canceled
    GoodTilCanceled,
    /// Code 1: full match or reject the entire message
    FillOrKill,
    /// Code 2: match immediately, discard the remainder
    ImmediateOrCancel,
    /// Code 3: remainder rests for the current block only
    JustInTime,
    /// Code 4: remainder rests until a block-time deadline
    GoodTilTime,
}

impl LimitOrderType {
    pub const VALID_CODES: &'static str = "0, 1, 2, 3, 4";

    pub fn code(&self) -> i64 {
        match self {
            LimitOrderType::GoodTilCanceled => 0,
            LimitOrderType::FillOrKill => 1,
            LimitOrderType::ImmediateOrCancel => 2,
            LimitOrderType::JustInTime => 3,
            LimitOrderType::GoodTilTime => 4,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, DexError> {
        match code {
            0 => Ok(LimitOrderType::GoodTilCanceled),
            1 => Ok(LimitOrderType::FillOrKill),
            2 => Ok(LimitOrderType::ImmediateOrCancel),
            3 => Ok(LimitOrderType::JustInTime),
            4 => Ok(LimitOrderType::GoodTilTime),
            _ => Err(DexError::InvalidOrderType { value: code }),
        }
    }
}

impl fmt::Display for LimitOrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LimitOrderType::GoodTilCanceled => "GOOD_TIL_CANCELLED",
            LimitOrderType::FillOrKill => "FILL_OR_KILL",
            LimitOrderType::ImmediateOrCancel => "IMMEDIATE_OR_CANCEL",
            LimitOrderType::JustInTime => "JUST_IN_TIME",
            LimitOrderType::GoodTilTime => "GOOD_TIL_TIME",
        };
        write!(f, "{name}")
    }
}

impl Serialize for LimitOrderType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.code())
    }
}

struct OrderTypeVisitor;

impl Visitor<'_> for OrderTypeVisitor {
    type Value = LimitOrderType;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "one of: {}", LimitOrderType::VALID_CODES)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<LimitOrderType, E> {
        LimitOrderType::from_code(v).map_err(|e| E::custom(e.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<LimitOrderType, E> {
        match i64::try_from(v) {
            Ok(code) => self.visit_i64(code),
            Err(_) => Err(E::custom(format!(
                "invalid value: {v}, expected one of: {}",
                LimitOrderType::VALID_CODES
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for LimitOrderType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<LimitOrderType, D::Error> {
        deserializer.deserialize_i64(OrderTypeVisitor)
    }
}

/// Tranche lifecycle state. Transitions only move forward:
/// Open -> PartiallyFilled -> Filled -> Closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrancheStatus {
    /// Unfilled reserves present, accepting matches and placements
    Open,
    /// Both unfilled and filled reserves present
    PartiallyFilled,
    /// No unfilled reserves remain
    Filled,
    /// Terminal: drained, expired, or swept
    Closed,
}

impl TrancheStatus {
    /// Active tranches can still match or be canceled.
    pub fn is_active(&self) -> bool {
        matches!(self, TrancheStatus::Open | TrancheStatus::PartiallyFilled)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TrancheStatus::Closed)
    }
}
