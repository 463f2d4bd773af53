//! Shared numeric helpers for probability values.
//!
//! Probabilities travel as `f64` but are presented with two decimal places.
//! Rounding goes through `Decimal` so that values like `12.345` round the way
//! a human reading the JSON expects (half away from zero), not the way the
//! binary representation happens to land.
//!
//! Both rounding helpers return `0.0` for non-finite inputs (NaN, ±Inf).

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Lowest probability that may leave the service.
pub(crate) const PROBABILITY_MIN: f64 = 0.0;
/// Highest probability that may leave the service.
pub(crate) const PROBABILITY_MAX: f64 = 100.0;

/// Round an f64 to `dp` decimal places, half away from zero.
pub(crate) fn round_dp(v: f64, dp: u32) -> f64 {
    if !v.is_finite() {
        tracing::warn!("round_dp received non-finite value {}, defaulting to 0", v);
        return 0.0;
    }
    Decimal::from_f64(v)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(0.0)
}

/// Round an f64 to 2 decimal places.
pub(crate) fn round_2dp(v: f64) -> f64 {
    round_dp(v, 2)
}

/// Clamp into `[min, max]`. NaN collapses to `min`.
pub(crate) fn clamp(v: f64, min: f64, max: f64) -> f64 {
    if v.is_nan() {
        return min;
    }
    v.max(min).min(max)
}

/// Clamp into the probability range and round to 2 decimal places.
pub(crate) fn to_probability(v: f64) -> f64 {
    clamp(round_2dp(v), PROBABILITY_MIN, PROBABILITY_MAX)
}
