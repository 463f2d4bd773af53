//! Risk level and natural-language insight text.

use crate::services::probability::ConditionProbabilities;

/// Overall risk from the mean of the four penalty conditions.
pub fn risk_level(rain: f64, heat: f64, wind: f64, cloud: f64) -> &'static str {
    let avg = (rain + heat + wind + cloud) / 4.0;
    if avg > 70.0 {
        "High"
    } else if avg > 50.0 {
        "Moderate"
    } else if avg > 30.0 {
        "Low-Moderate"
    } else {
        "Low"
    }
}

fn rain_band(rain: f64) -> &'static str {
    if rain > 60.0 {
        "a high chance of rain"
    } else if rain > 30.0 {
        "a moderate chance of rain"
    } else {
        "a low chance of rain"
    }
}

fn heat_band(heat: f64) -> &'static str {
    if heat > 10.0 {
        "significant extreme heat probability"
    } else if heat > 5.0 {
        "moderate heat risk"
    } else {
        "low extreme heat probability"
    }
}

/// Build the insight paragraph for one location.
pub fn generate_insights(city_name: &str, p: &ConditionProbabilities) -> String {
    let risk = risk_level(p.rain, p.extreme_heat, p.high_wind, p.cloudy);
    format!(
        "Synthetic estimate for {} ({} zone): {} ({:.1}%) with {} ({:.1}%). \
         Wind conditions show {:.1}% high wind probability, while cloud cover is at {:.1}%. \
         Good-weather score: {:.1}%. Overall risk level: {}.",
        city_name,
        p.zone.label(),
        rain_band(p.rain),
        p.rain,
        heat_band(p.extreme_heat),
        p.extreme_heat,
        p.high_wind,
        p.cloudy,
        p.good_weather,
        risk,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::climate::ClimateZone;

    fn sample(rain: f64, heat: f64) -> ConditionProbabilities {
        ConditionProbabilities {
            rain,
            extreme_heat: heat,
            high_wind: 20.0,
            cloudy: 50.0,
            good_weather: 40.0,
            zone: ClimateZone::Subtropical,
        }
    }

    #[test]
    fn test_risk_level_bands() {
        assert_eq!(risk_level(80.0, 80.0, 80.0, 80.0), "High");
        assert_eq!(risk_level(60.0, 60.0, 60.0, 60.0), "Moderate");
        assert_eq!(risk_level(40.0, 40.0, 40.0, 40.0), "Low-Moderate");
        assert_eq!(risk_level(10.0, 10.0, 10.0, 10.0), "Low");
        // Boundaries are exclusive
        assert_eq!(risk_level(70.0, 70.0, 70.0, 70.0), "Moderate");
    }

    #[test]
    fn test_insight_rain_bands() {
        assert!(generate_insights("Pune", &sample(75.0, 1.0)).contains("a high chance of rain (75.0%)"));
        assert!(generate_insights("Pune", &sample(45.0, 1.0)).contains("a moderate chance of rain"));
        assert!(generate_insights("Pune", &sample(30.0, 1.0)).contains("a low chance of rain"));
    }

    #[test]
    fn test_insight_heat_bands() {
        assert!(generate_insights("Pune", &sample(20.0, 12.0)).contains("significant extreme heat"));
        assert!(generate_insights("Pune", &sample(20.0, 7.5)).contains("moderate heat risk"));
        assert!(generate_insights("Pune", &sample(20.0, 0.7)).contains("low extreme heat"));
    }

    #[test]
    fn test_insight_names_city_and_zone() {
        let text = generate_insights("Pune", &sample(20.0, 1.0));
        assert!(text.contains("Pune"));
        assert!(text.contains("Subtropical zone"));
        assert!(text.starts_with("Synthetic estimate"));
    }
}
