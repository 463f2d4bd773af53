//! Static city → coordinate table.
//!
//! Lookup is an exact match after trimming and lowercasing. There is no fuzzy
//! matching and no upstream geocoder behind it.

/// Coordinates of a supported city.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

const fn city(latitude: f64, longitude: f64) -> CityCoordinates {
    CityCoordinates {
        latitude,
        longitude,
    }
}

/// Supported cities, keyed by lowercase name.
pub const CITY_TABLE: &[(&str, CityCoordinates)] = &[
    ("mumbai", city(19.0760, 72.8777)),
    ("delhi", city(28.7041, 77.1025)),
    ("bangalore", city(12.9716, 77.5946)),
    ("bengaluru", city(12.9716, 77.5946)),
    ("chennai", city(13.0827, 80.2707)),
    ("kolkata", city(22.5726, 88.3639)),
    ("hyderabad", city(17.3850, 78.4867)),
    ("pune", city(18.5204, 73.8567)),
    ("ahmedabad", city(23.0225, 72.5714)),
    ("jaipur", city(26.9124, 75.7873)),
    ("lucknow", city(26.8467, 80.9462)),
    ("kanpur", city(26.4499, 80.3319)),
    ("nagpur", city(21.1458, 79.0882)),
    ("indore", city(22.7196, 75.8577)),
    ("thane", city(19.2183, 72.9781)),
    ("bhopal", city(23.2599, 77.4126)),
    ("visakhapatnam", city(17.6868, 83.2185)),
    ("pimpri", city(18.6298, 73.7997)),
    ("patna", city(25.5941, 85.1376)),
    ("vadodara", city(22.3072, 73.1812)),
    ("ludhiana", city(30.9010, 75.8573)),
    ("agra", city(27.1767, 78.0081)),
    ("nashik", city(19.9975, 73.7898)),
    ("faridabad", city(28.4089, 77.3178)),
    ("meerut", city(28.9845, 77.7064)),
    ("rajkot", city(22.3039, 70.8022)),
    ("kalyan", city(19.2437, 73.1355)),
    ("vasai", city(19.4259, 72.8225)),
    ("varanasi", city(25.3176, 82.9739)),
    ("srinagar", city(34.0837, 74.7973)),
    ("aurangabad", city(19.8762, 75.3433)),
    ("noida", city(28.5355, 77.3910)),
    ("solapur", city(17.6599, 75.9064)),
    ("ranchi", city(23.3441, 85.3096)),
    ("kochi", city(9.9312, 76.2673)),
    ("coimbatore", city(11.0168, 76.9558)),
    ("jabalpur", city(23.1815, 79.9864)),
    ("gwalior", city(26.2183, 78.1828)),
    ("vijayawada", city(16.5062, 80.6480)),
    ("jodhpur", city(26.2389, 73.0243)),
    ("madurai", city(9.9252, 78.1198)),
    ("raipur", city(21.2514, 81.6296)),
    ("chandigarh", city(30.7333, 76.7794)),
    ("tiruchirappalli", city(10.7905, 78.7047)),
    ("mysore", city(12.2958, 76.6394)),
    ("mysuru", city(12.2958, 76.6394)),
    ("bhubaneswar", city(20.2961, 85.8245)),
    ("amritsar", city(31.6340, 74.8723)),
    ("warangal", city(17.9689, 79.5941)),
    ("salem", city(11.6643, 78.1460)),
    ("mira", city(19.2952, 72.8544)),
    ("thiruvananthapuram", city(8.5241, 76.9366)),
    ("bhiwandi", city(19.3002, 73.0582)),
    ("saharanpur", city(29.9675, 77.5451)),
    ("gorakhpur", city(26.7606, 83.3732)),
    ("bikaner", city(28.0229, 73.3119)),
    ("amravati", city(20.9374, 77.7796)),
    ("jalandhar", city(31.3260, 75.5762)),
    ("ulhasnagar", city(19.2215, 73.1645)),
    ("jammu", city(32.7266, 74.8570)),
    ("sangli", city(16.8524, 74.5815)),
    ("mangalore", city(12.9141, 74.8560)),
    ("erode", city(11.3428, 77.7274)),
    ("belgaum", city(15.8497, 74.4977)),
    ("ambattur", city(13.1077, 80.1614)),
    ("tirunelveli", city(8.7139, 77.7567)),
    ("malegaon", city(20.5598, 74.5252)),
    ("gaya", city(24.7914, 85.0002)),
    ("jalgaon", city(21.0077, 75.5626)),
    ("udaipur", city(24.5854, 73.7125)),
    ("maheshtala", city(22.5086, 88.2532)),
];

/// Look up a city by name (case- and surrounding-whitespace-insensitive).
pub fn lookup_city(name: &str) -> Option<CityCoordinates> {
    let key = name.trim().to_lowercase();
    if key.is_empty() {
        return None;
    }
    CITY_TABLE
        .iter()
        .find(|(city_name, _)| *city_name == key)
        .map(|(_, coords)| *coords)
}

/// Find the first supported city mentioned as a word in free text.
///
/// Used by the assistant to spot "rain in Pune" style questions.
pub fn find_city_in_text(text: &str) -> Option<(&'static str, CityCoordinates)> {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
        .collect();
    CITY_TABLE
        .iter()
        .find(|(city_name, _)| words.contains(city_name))
        .map(|(name, coords)| (*name, *coords))
}
