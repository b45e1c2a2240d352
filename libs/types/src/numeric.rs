//! Integer amount type for reserves, shares, and balances
//!
//! All externally visible quantities are unsigned 128-bit integers carried
//! as strings on the wire (uint128). Price arithmetic bridges into
//! `rust_decimal` with explicit floor/ceil rounding; the bridge is fallible
//! because Decimal's mantissa is 96 bits.

use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Largest amount representable exactly in a Decimal mantissa (2^96 - 1).
const MAX_DECIMAL_AMOUNT: u128 = 79_228_162_514_264_337_593_543_950_335;

/// Non-negative token amount / share count.
///
/// Serialized as a decimal string per the uint128 wire convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Amount(u128);

impl Amount {
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn value(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    pub fn saturating_sub(self, other: Amount) -> Amount {
        Amount(self.0.saturating_sub(other.0))
    }

    pub fn min(self, other: Amount) -> Amount {
        Amount(self.0.min(other.0))
    }

    /// Bridge into Decimal; None when the value exceeds the 96-bit mantissa.
    pub fn as_decimal(&self) -> Option<Decimal> {
        if self.0 > MAX_DECIMAL_AMOUNT {
            return None;
        }
        Some(Decimal::from_i128_with_scale(self.0 as i128, 0))
    }

    /// Floor a non-negative Decimal back into an Amount.
    pub fn from_decimal_floor(d: Decimal) -> Option<Amount> {
        if d.is_sign_negative() {
            return None;
        }
        let floored = d.floor().normalize();
        let mantissa = floored.mantissa();
        if floored.scale() != 0 || mantissa < 0 {
            return None;
        }
        Some(Amount(mantissa as u128))
    }

    /// Ceil a non-negative Decimal back into an Amount.
    pub fn from_decimal_ceil(d: Decimal) -> Option<Amount> {
        if d.is_sign_negative() {
            return None;
        }
        let ceiled = d.ceil().normalize();
        let mantissa = ceiled.mantissa();
        if ceiled.scale() != 0 || mantissa < 0 {
            return None;
        }
        Some(Amount(mantissa as u128))
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, other: Amount) -> Amount {
        Amount(self.0 + other.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, other: Amount) {
        self.0 += other.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, other: Amount) -> Amount {
        Amount(self.0 - other.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, other: Amount) {
        self.0 -= other.0;
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Amount {
    fn from(v: u128) -> Self {
        Amount(v)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a uint128 amount encoded as a string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        v.parse::<u128>()
            .map(Amount)
            .map_err(|_| E::custom(format!("invalid uint128 amount: {v}")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount(v as u128))
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}
