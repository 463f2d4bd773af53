//! Coordinate-derived seeds.
//!
//! Each synthetic condition draws its base value from a different seed so that
//! nearby locations do not produce identical rain/wind/cloud figures. Seeds are
//! pure functions of the absolute coordinates; no term divides by a coordinate,
//! so the equator and prime meridian are safe.

/// Upper bound (exclusive) of every integer seed.
pub const SEED_MODULUS: u32 = 10_000;

/// Upper bound (exclusive) of the heat seed.
const HEAT_SEED_MODULUS: f64 = 1_000.0;

/// Seeds derived from a single coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationSeeds {
    /// Sum of scaled latitude and longitude. Drives rain.
    pub primary: u32,
    /// Scaled product of latitude and longitude. Drives wind.
    pub product: u32,
    /// Sine/cosine mix of scaled coordinates. Drives cloud cover.
    pub trig: u32,
    /// Weighted linear combination.
    pub linear: u32,
    /// Sum of scaled squares.
    pub quadratic: u32,
    /// Fractional seed in `[0, 1000)` fed through a sine for extreme heat.
    pub heat: f64,
}

/// Derive all seeds for a coordinate pair.
///
/// Non-finite inputs are treated as 0 so the result is always usable.
pub fn derive_seeds(latitude: f64, longitude: f64) -> LocationSeeds {
    let lat = finite_abs(latitude);
    let lon = finite_abs(longitude);

    LocationSeeds {
        primary: to_seed(lat * 10_000.0 + lon * 10_000.0),
        product: to_seed(lat * lon * 100_000.0),
        trig: to_seed((lat * 1_000.0).sin() * 10_000.0 + (lon * 1_000.0).cos() * 10_000.0),
        linear: to_seed(lat * 1_234.0 + lon * 5_678.0),
        quadratic: to_seed(lat.powi(2) * 1_000.0 + lon.powi(2) * 1_000.0),
        heat: (lat * lon * 1_000.0).rem_euclid(HEAT_SEED_MODULUS),
    }
}

/// Deterministic value in `[0, 1)` from a seed: the fractional part of `sin(seed) * 10000`.
pub fn seeded_unit(seed: f64) -> f64 {
    let x = seed.sin() * 10_000.0;
    x - x.floor()
}

fn finite_abs(v: f64) -> f64 {
    if v.is_finite() {
        v.abs()
    } else {
        0.0
    }
}

/// Floor into `[0, SEED_MODULUS)` using a Euclidean remainder, so negative
/// intermediates (the trig seed) never yield a negative seed.
fn to_seed(raw: f64) -> u32 {
    let modulus = f64::from(SEED_MODULUS);
    let v = raw.floor().rem_euclid(modulus);
    // rem_euclid can return exactly `modulus` for tiny negative inputs
    if v >= modulus {
        0
    } else {
        v as u32
    }
}
