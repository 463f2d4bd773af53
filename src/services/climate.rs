//! Latitude-banded climate zones and their coefficient table.
//!
//! One canonical banding is used everywhere (condition scaling, heat scaling,
//! insight text): `<10°`, `<20°`, `<40°`, `>=40°` absolute latitude.

use serde::Serialize;
use utoipa::ToSchema;

/// Climate zone by absolute latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum ClimateZone {
    Tropical,
    Subtropical,
    Temperate,
    Cold,
}

/// Per-zone multipliers applied to the raw condition values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneCoefficients {
    pub rain: f64,
    pub wind: f64,
    pub cloud: f64,
    pub extreme_heat: f64,
}

const TROPICAL: ZoneCoefficients = ZoneCoefficients {
    rain: 1.3,
    wind: 0.7,
    cloud: 1.2,
    extreme_heat: 0.8,
};

const SUBTROPICAL: ZoneCoefficients = ZoneCoefficients {
    rain: 1.1,
    wind: 0.9,
    cloud: 1.05,
    extreme_heat: 1.2,
};

const TEMPERATE: ZoneCoefficients = ZoneCoefficients {
    rain: 0.9,
    wind: 1.1,
    cloud: 0.9,
    extreme_heat: 1.5,
};

const COLD: ZoneCoefficients = ZoneCoefficients {
    rain: 0.8,
    wind: 1.2,
    cloud: 0.8,
    extreme_heat: 0.5,
};

/// Band edges (absolute latitude, exclusive upper bound).
const TROPICAL_MAX_LAT: f64 = 10.0;
const SUBTROPICAL_MAX_LAT: f64 = 20.0;
const TEMPERATE_MAX_LAT: f64 = 40.0;

impl ClimateZone {
    /// Classify a latitude. Non-finite latitudes fall into `Tropical` (treated as 0°).
    pub fn from_latitude(latitude: f64) -> Self {
        let lat = if latitude.is_finite() { latitude.abs() } else { 0.0 };
        if lat < TROPICAL_MAX_LAT {
            ClimateZone::Tropical
        } else if lat < SUBTROPICAL_MAX_LAT {
            ClimateZone::Subtropical
        } else if lat < TEMPERATE_MAX_LAT {
            ClimateZone::Temperate
        } else {
            ClimateZone::Cold
        }
    }

    pub fn coefficients(self) -> ZoneCoefficients {
        match self {
            ClimateZone::Tropical => TROPICAL,
            ClimateZone::Subtropical => SUBTROPICAL,
            ClimateZone::Temperate => TEMPERATE,
            ClimateZone::Cold => COLD,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ClimateZone::Tropical => "Tropical",
            ClimateZone::Subtropical => "Subtropical",
            ClimateZone::Temperate => "Temperate",
            ClimateZone::Cold => "Cold",
        }
    }
}
