//! Discrete price levels
//!
//! A tick index is a signed integer exponent over the base 1.0001. The
//! price granted to a taker buying `token_out` with `token_in` at
//! taker-view tick `k` is `1.0001^(-k)` token_out per token_in: lower
//! ticks are better prices for the taker, so liquidity books iterate
//! ascending with the best price first.
//!
//! All conversions run on `rust_decimal` via binary exponentiation, so
//! results are deterministic and never touch floating point.

use crate::numeric::Amount;
use rust_decimal::Decimal;

/// Largest representable tick magnitude. `1.0001^MAX_TICK` still fits a
/// Decimal mantissa with headroom for amount multiplication.
pub const MAX_TICK: i64 = 559_680;

/// `1.0001^exp` for `exp >= 0` by binary exponentiation.
fn pow_base(mut exp: u64) -> Decimal {
    let mut base = Decimal::from_str_exact("1.0001").unwrap_or(Decimal::ONE);
    let mut acc = Decimal::ONE;
    while exp > 0 {
        if exp & 1 == 1 {
            acc *= base;
        }
        exp >>= 1;
        if exp > 0 {
            base *= base;
        }
    }
    acc
}

/// `1.0001^tick`, or None when out of range.
pub fn tick_to_price(tick: i64) -> Option<Decimal> {
    if tick.unsigned_abs() > MAX_TICK as u64 {
        return None;
    }
    if tick >= 0 {
        Some(pow_base(tick as u64))
    } else {
        Some(Decimal::ONE / pow_base(tick.unsigned_abs()))
    }
}

/// Price received by a taker at taker-view tick `k`: `1.0001^(-k)`
/// token_out per token_in.
pub fn taker_price(tick: i64) -> Option<Decimal> {
    tick_to_price(-tick)
}

/// `floor(amount * price)`, used when paying out to a taker.
pub fn mul_floor(amount: Amount, price: Decimal) -> Option<Amount> {
    let d = amount.as_decimal()?;
    Amount::from_decimal_floor(d.checked_mul(price)?)
}

/// `ceil(amount / price)`, used when charging the taker's input so the
/// rounding remainder always favors resting liquidity.
pub fn div_ceil(amount: Amount, price: Decimal) -> Option<Amount> {
    if price.is_zero() {
        return None;
    }
    let d = amount.as_decimal()?;
    Amount::from_decimal_ceil(d.checked_div(price)?)
}
