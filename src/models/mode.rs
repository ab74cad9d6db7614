use serde::{Deserialize, Serialize};

/// Transport mode as labelled by the on-device classifier.
///
/// Serialized with the trip API vocabulary (`walk`, `bike`, `bus`, `subway`,
/// `car`), which is also what users pick from when declaring their mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransportMode {
    #[serde(rename = "walk", alias = "WALKING")]
    Walking,
    #[serde(rename = "bike", alias = "CYCLING")]
    Cycling,
    #[serde(rename = "bus", alias = "BUS")]
    Bus,
    #[serde(rename = "subway", alias = "SUBWAY")]
    Subway,
    #[serde(rename = "car", alias = "DRIVING")]
    Driving,
}

impl Default for TransportMode {
    fn default() -> Self {
        TransportMode::Walking
    }
}

impl TransportMode {
    pub const ALL: [TransportMode; 5] = [
        TransportMode::Walking,
        TransportMode::Cycling,
        TransportMode::Bus,
        TransportMode::Subway,
        TransportMode::Driving,
    ];

    /// Value used by the trip API's `transport_modes_dict`.
    pub fn as_dict_str(&self) -> &'static str {
        match self {
            TransportMode::Walking => "walk",
            TransportMode::Cycling => "bike",
            TransportMode::Bus => "bus",
            TransportMode::Subway => "subway",
            TransportMode::Driving => "car",
        }
    }

    /// Accepts both the dict vocabulary and the classifier's upper-case labels.
    pub fn from_dict_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "walk" | "walking" => Some(TransportMode::Walking),
            "bike" | "cycling" => Some(TransportMode::Cycling),
            "bus" => Some(TransportMode::Bus),
            "subway" => Some(TransportMode::Subway),
            "car" | "driving" => Some(TransportMode::Driving),
            _ => None,
        }
    }

    pub fn is_green(&self) -> bool {
        *self != TransportMode::Driving
    }
}

/// Rewrites a declared mode into the dict vocabulary (`DRIVING` becomes `car`).
/// Strings outside the vocabulary are kept as given.
pub fn normalize_dict_mode(value: &str) -> String {
    TransportMode::from_dict_str(value)
        .map(|mode| mode.as_dict_str().to_string())
        .unwrap_or_else(|| value.to_string())
}

/// Dict value of a user-declared mode string. Only `car` is not green.
pub fn is_green_dict_mode(dict_mode: &str) -> bool {
    dict_mode != TransportMode::Driving.as_dict_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dict_vocabulary_maps_driving_to_car() {
        let dict: Vec<&str> = TransportMode::ALL.iter().map(|m| m.as_dict_str()).collect();
        assert_eq!(dict, vec!["walk", "bike", "bus", "subway", "car"]);
    }

    #[test]
    fn parses_dict_and_classifier_labels() {
        assert_eq!(TransportMode::from_dict_str("car"), Some(TransportMode::Driving));
        assert_eq!(TransportMode::from_dict_str("DRIVING"), Some(TransportMode::Driving));
        assert_eq!(TransportMode::from_dict_str(" Bike "), Some(TransportMode::Cycling));
        assert_eq!(TransportMode::from_dict_str("ferry"), None);
    }

    #[test]
    fn serde_uses_dict_values_and_accepts_labels() {
        let json = serde_json::to_string(&TransportMode::Driving).unwrap();
        assert_eq!(json, "\"car\"");
        let mode: TransportMode = serde_json::from_str("\"SUBWAY\"").unwrap();
        assert_eq!(mode, TransportMode::Subway);
    }

    #[test]
    fn declared_modes_normalize_to_dict_values() {
        assert_eq!(normalize_dict_mode("DRIVING"), "car");
        assert_eq!(normalize_dict_mode(" Car "), "car");
        assert_eq!(normalize_dict_mode("walking"), "walk");
        assert_eq!(normalize_dict_mode("scooter"), "scooter");
        assert!(!is_green_dict_mode(&normalize_dict_mode("driving")));
    }

    #[test]
    fn only_car_is_not_green() {
        assert!(is_green_dict_mode("walk"));
        assert!(is_green_dict_mode("bus"));
        assert!(!is_green_dict_mode("car"));
        assert!(!TransportMode::Driving.is_green());
    }
}
