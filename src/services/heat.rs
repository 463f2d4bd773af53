//! Extreme-heat estimate.
//!
//! Unlike rain/wind/cloud the heat value carries no random jitter: it is a
//! sine of the heat seed, scaled by the climate zone. A small table of named
//! locations overrides the formula outright for places where the general
//! formula is known to be wrong.

use crate::models::DatasetMode;
use crate::services::climate::ClimateZone;
use crate::services::seed::{seeded_unit, LocationSeeds};

/// Lowest unscaled heat value.
const HEAT_BASE_FLOOR: f64 = 0.5;
/// Span of the unscaled heat value (`[0.5, 25.5)`).
const HEAT_BASE_SPAN: f64 = 25.0;

/// Extra multiplier for southern-India latitudes in India mode.
const INDIA_SOUTH_FACTOR: f64 = 0.7;
const INDIA_SOUTH_MIN_LAT: f64 = 8.0;
const INDIA_SOUTH_MAX_LAT: f64 = 15.0;

/// Name fragments that switch a request into India mode regardless of dataset.
const INDIA_NAME_MARKERS: &[&str] = &["india", "karnataka", "bengaluru", "bangalore", "rayasandra"];

/// A fixed heat probability for locations whose name contains any of `markers`.
#[derive(Debug, Clone, Copy)]
pub struct HeatOverride {
    pub markers: &'static [&'static str],
    pub probability: f64,
}

/// Named exceptions. Checked before the formula, first match wins.
pub const HEAT_OVERRIDES: &[HeatOverride] = &[HeatOverride {
    // Bengaluru sits on the Deccan plateau; >40°C days are historically rare
    markers: &["bengaluru", "bangalore", "rayasandra"],
    probability: 0.7,
}];

/// Return the override matching `name`, if any (case-insensitive substring match).
pub fn find_override(name: &str, overrides: &[HeatOverride]) -> Option<HeatOverride> {
    let lower = name.to_lowercase();
    overrides
        .iter()
        .find(|o| o.markers.iter().any(|m| lower.contains(m)))
        .copied()
}

/// Whether India-specific scaling applies.
pub fn is_india_mode(name: &str, dataset_mode: DatasetMode) -> bool {
    if dataset_mode == DatasetMode::Imd {
        return true;
    }
    let lower = name.to_lowercase();
    INDIA_NAME_MARKERS.iter().any(|m| lower.contains(m))
}

/// Unclamped extreme-heat value in percent.
pub fn estimate_extreme_heat(
    name: &str,
    latitude: f64,
    seeds: &LocationSeeds,
    dataset_mode: DatasetMode,
) -> f64 {
    if let Some(o) = find_override(name, HEAT_OVERRIDES) {
        tracing::debug!("Heat override applied for '{}': {}", name, o.probability);
        return o.probability;
    }

    let zone = ClimateZone::from_latitude(latitude);
    let mut heat = (HEAT_BASE_FLOOR + seeded_unit(seeds.heat) * HEAT_BASE_SPAN)
        * zone.coefficients().extreme_heat;

    if is_india_mode(name, dataset_mode)
        && (INDIA_SOUTH_MIN_LAT..=INDIA_SOUTH_MAX_LAT).contains(&latitude)
    {
        heat *= INDIA_SOUTH_FACTOR;
    }

    heat
}
