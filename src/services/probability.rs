//! Synthetic probability pipeline.
//!
//! seeds → per-condition base (seed + jitter) → climate-zone scaling →
//! per-condition clamp → composite "good weather" score.
//!
//! These numbers are not derived from observations. They only look
//! location-specific because the seeds come from the coordinates.

use rand::Rng;

use crate::helpers::{clamp, round_2dp, to_probability, PROBABILITY_MAX, PROBABILITY_MIN};
use crate::models::DatasetMode;
use crate::services::climate::ClimateZone;
use crate::services::heat::estimate_extreme_heat;
use crate::services::seed::{derive_seeds, LocationSeeds};

/// Constants shaping one condition's raw value: `floor + seed % range + U * jitter`,
/// and the bounds applied after climate scaling.
#[derive(Debug, Clone, Copy)]
pub struct ConditionShape {
    pub floor: f64,
    pub range: u32,
    pub jitter: f64,
    pub min: f64,
    pub max: f64,
}

/// Rain: 20-95% before scaling, clamped to [10, 95].
pub const RAIN: ConditionShape = ConditionShape {
    floor: 20.0,
    range: 60,
    jitter: 15.0,
    min: 10.0,
    max: 95.0,
};

/// Wind: 8-56% before scaling, clamped to [2, 60].
pub const WIND: ConditionShape = ConditionShape {
    floor: 8.0,
    range: 40,
    jitter: 8.0,
    min: 2.0,
    max: 60.0,
};

/// Cloud: 30-92% before scaling, clamped to [15, 95].
pub const CLOUD: ConditionShape = ConditionShape {
    floor: 30.0,
    range: 50,
    jitter: 12.0,
    min: 15.0,
    max: 95.0,
};

/// Composite weights. They sum to 1.0.
const GOOD_WEATHER_RAIN_WEIGHT: f64 = 0.45;
const GOOD_WEATHER_HEAT_WEIGHT: f64 = 0.30;
const GOOD_WEATHER_WIND_WEIGHT: f64 = 0.15;
const GOOD_WEATHER_CLOUD_WEIGHT: f64 = 0.10;

/// Final, clamped, two-decimal probabilities for one location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionProbabilities {
    pub rain: f64,
    pub extreme_heat: f64,
    pub high_wind: f64,
    pub cloudy: f64,
    pub good_weather: f64,
    pub zone: ClimateZone,
}

/// Raw (unscaled, unclamped) value for one condition.
pub fn base_value<R: Rng>(shape: &ConditionShape, seed: u32, rng: &mut R) -> f64 {
    let u: f64 = rng.random();
    shape.floor + f64::from(seed % shape.range) + u * shape.jitter
}

/// Scale by a zone coefficient, then round and clamp to the condition's bounds.
pub fn adjust(shape: &ConditionShape, raw: f64, coefficient: f64) -> f64 {
    clamp(round_2dp(raw * coefficient), shape.min, shape.max)
}

/// `100 - (0.45·rain + 0.30·heat + 0.15·wind + 0.10·cloud)`, clamped to [0, 100].
pub fn good_weather_score(rain: f64, heat: f64, wind: f64, cloud: f64) -> f64 {
    let penalty = rain * GOOD_WEATHER_RAIN_WEIGHT
        + heat * GOOD_WEATHER_HEAT_WEIGHT
        + wind * GOOD_WEATHER_WIND_WEIGHT
        + cloud * GOOD_WEATHER_CLOUD_WEIGHT;
    clamp(PROBABILITY_MAX - penalty, PROBABILITY_MIN, PROBABILITY_MAX)
}

/// Run the full pipeline for one location.
pub fn compute_probabilities<R: Rng>(
    name: &str,
    latitude: f64,
    longitude: f64,
    dataset_mode: DatasetMode,
    rng: &mut R,
) -> ConditionProbabilities {
    let seeds: LocationSeeds = derive_seeds(latitude, longitude);
    let zone = ClimateZone::from_latitude(latitude);
    let coefficients = zone.coefficients();

    let rain = adjust(&RAIN, base_value(&RAIN, seeds.primary, rng), coefficients.rain);
    let high_wind = adjust(&WIND, base_value(&WIND, seeds.product, rng), coefficients.wind);
    let cloudy = adjust(&CLOUD, base_value(&CLOUD, seeds.trig, rng), coefficients.cloud);
    let extreme_heat = to_probability(estimate_extreme_heat(name, latitude, &seeds, dataset_mode));

    // Scored from the rounded values so clients can recompute it
    let good_weather = to_probability(good_weather_score(rain, extreme_heat, high_wind, cloudy));

    tracing::debug!(
        "Probabilities for '{}' ({:.4}, {:.4}, {:?}): rain={} heat={} wind={} cloud={} good={}",
        name,
        latitude,
        longitude,
        zone,
        rain,
        extreme_heat,
        high_wind,
        cloudy,
        good_weather
    );

    ConditionProbabilities {
        rain: to_probability(rain),
        extreme_heat,
        high_wind: to_probability(high_wind),
        cloudy: to_probability(cloudy),
        good_weather,
        zone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn in_range(v: f64) -> bool {
        (0.0..=100.0).contains(&v)
    }

    #[test]
    fn test_all_probabilities_in_range_over_grid() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut lat = -90.0;
        while lat <= 90.0 {
            let mut lon = -180.0;
            while lon <= 180.0 {
                let p = compute_probabilities("Grid", lat, lon, DatasetMode::Combined, &mut rng);
                for v in [p.rain, p.extreme_heat, p.high_wind, p.cloudy, p.good_weather] {
                    assert!(in_range(v), "{} out of range at ({}, {})", v, lat, lon);
                }
                lon += 11.1;
            }
            lat += 4.9;
        }
    }

    #[test]
    fn test_condition_bounds_respected() {
        let mut rng = StdRng::seed_from_u64(11);
        for (lat, lon) in [(0.0, 0.0), (5.0, 5.0), (15.0, 75.0), (35.0, 139.0), (70.0, 25.0)] {
            let p = compute_probabilities("X", lat, lon, DatasetMode::Global, &mut rng);
            assert!((RAIN.min..=RAIN.max).contains(&p.rain));
            assert!((WIND.min..=WIND.max).contains(&p.high_wind));
            assert!((CLOUD.min..=CLOUD.max).contains(&p.cloudy));
        }
    }

    #[test]
    fn test_values_have_two_decimals() {
        let mut rng = StdRng::seed_from_u64(3);
        let p = compute_probabilities("Delhi", 28.7041, 77.1025, DatasetMode::Global, &mut rng);
        for v in [p.rain, p.extreme_heat, p.high_wind, p.cloudy, p.good_weather] {
            assert!(((v * 100.0).round() - v * 100.0).abs() < 1e-6, "{} has more than 2 decimals", v);
        }
    }

    #[test]
    fn test_good_weather_matches_composite() {
        let mut rng = StdRng::seed_from_u64(99);
        let p = compute_probabilities("Mumbai", 19.0760, 72.8777, DatasetMode::Imd, &mut rng);
        let expected = good_weather_score(p.rain, p.extreme_heat, p.high_wind, p.cloudy);
        assert!((p.good_weather - expected).abs() <= 0.005 + 1e-9);
    }

    #[test]
    fn test_good_weather_exact_formula() {
        // 100 - (50*0.45 + 10*0.30 + 20*0.15 + 40*0.10) = 100 - 32.5
        assert!((good_weather_score(50.0, 10.0, 20.0, 40.0) - 67.5).abs() < 1e-9);
    }

    #[test]
    fn test_good_weather_monotonic_in_each_input() {
        let base = [40.0, 10.0, 20.0, 50.0];
        let score = |v: [f64; 4]| good_weather_score(v[0], v[1], v[2], v[3]);
        for i in 0..4 {
            let mut prev = score(base);
            for step in 1..=20 {
                let mut v = base;
                v[i] += step as f64 * 5.0;
                let s = score(v);
                assert!(s <= prev, "score increased when input {} grew", i);
                prev = s;
            }
        }
    }

    #[test]
    fn test_good_weather_clamped() {
        assert!(good_weather_score(100.0, 100.0, 100.0, 100.0) < 1e-9);
        assert_eq!(good_weather_score(0.0, 0.0, 0.0, 0.0), 100.0);
        assert_eq!(good_weather_score(500.0, 500.0, 500.0, 500.0), 0.0);
    }

    #[test]
    fn test_base_value_band() {
        let mut rng = StdRng::seed_from_u64(1);
        for seed in [0, 59, 60, 9_999] {
            let v = base_value(&RAIN, seed, &mut rng);
            assert!((20.0..95.0).contains(&v), "rain base {} out of band", v);
        }
    }

    #[test]
    fn test_origin_does_not_panic() {
        let mut rng = StdRng::seed_from_u64(0);
        let p = compute_probabilities("Null Island", 0.0, 0.0, DatasetMode::Combined, &mut rng);
        assert_eq!(p.zone, ClimateZone::Tropical);
        assert!(in_range(p.good_weather));
    }

    #[test]
    fn test_override_flows_through_pipeline() {
        let mut rng = StdRng::seed_from_u64(5);
        let p = compute_probabilities("Bengaluru", 12.9716, 77.5946, DatasetMode::Imd, &mut rng);
        assert_eq!(p.extreme_heat, 0.7);
    }
}
