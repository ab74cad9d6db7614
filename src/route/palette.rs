//! Color and stroke lookup for rendered route segments.
//!
//! The splitter only ever produces a [`ColorKey`]; turning a key into an
//! actual color is the presentation layer's job, through [`RoutePalette`].

use serde::{Deserialize, Serialize};

use crate::models::route::{
    RouteStep, TRAVEL_MODE_BICYCLING, TRAVEL_MODE_DRIVING, TRAVEL_MODE_TRANSIT, TRAVEL_MODE_WALKING,
};
use crate::models::TransportMode;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColorKey {
    Walking,
    Cycling,
    Bus,
    Subway,
    Rail,
    Tram,
    Driving,
    Remaining,
}

impl ColorKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorKey::Walking => "walking",
            ColorKey::Cycling => "cycling",
            ColorKey::Bus => "bus",
            ColorKey::Subway => "subway",
            ColorKey::Rail => "rail",
            ColorKey::Tram => "tram",
            ColorKey::Driving => "driving",
            ColorKey::Remaining => "remaining",
        }
    }

    pub fn for_mode(mode: TransportMode) -> Self {
        match mode {
            TransportMode::Walking => ColorKey::Walking,
            TransportMode::Cycling => ColorKey::Cycling,
            TransportMode::Bus => ColorKey::Bus,
            TransportMode::Subway => ColorKey::Subway,
            TransportMode::Driving => ColorKey::Driving,
        }
    }

    pub fn for_step(step: &RouteStep) -> Self {
        Self::for_travel_mode(&step.travel_mode, step.vehicle_type())
    }

    pub fn for_travel_mode(travel_mode: &str, vehicle_type: Option<&str>) -> Self {
        match travel_mode {
            TRAVEL_MODE_WALKING => ColorKey::Walking,
            TRAVEL_MODE_TRANSIT => Self::for_vehicle(vehicle_type),
            TRAVEL_MODE_DRIVING => ColorKey::Driving,
            TRAVEL_MODE_BICYCLING => ColorKey::Cycling,
            _ => ColorKey::Remaining,
        }
    }

    fn for_vehicle(vehicle_type: Option<&str>) -> Self {
        let vehicle = vehicle_type.map(str::to_ascii_uppercase);
        match vehicle.as_deref() {
            Some("SUBWAY" | "METRO_RAIL") => ColorKey::Subway,
            Some("BUS" | "INTERCITY_BUS" | "TROLLEYBUS") => ColorKey::Bus,
            Some(
                "RAIL" | "HEAVY_RAIL" | "COMMUTER_TRAIN" | "HIGH_SPEED_TRAIN"
                | "LONG_DISTANCE_TRAIN",
            ) => ColorKey::Rail,
            Some("TRAM" | "MONORAIL") => ColorKey::Tram,
            _ => ColorKey::Bus,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    Solid,
    Dotted,
}

impl StrokeStyle {
    pub fn for_key(key: ColorKey) -> Self {
        if key == ColorKey::Walking {
            StrokeStyle::Dotted
        } else {
            StrokeStyle::Solid
        }
    }
}

/// Hex colors and stroke widths, overridable from the settings file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RoutePalette {
    pub walking: String,
    pub cycling: String,
    pub bus: String,
    pub subway: String,
    pub rail: String,
    pub tram: String,
    pub driving: String,
    pub remaining: String,

    /// Width of walking legs, whether drawn per step or as a whole route
    pub walking_width: f32,
    /// Width of non-walking legs in a multi-colored transit route
    pub transit_width: f32,
    /// Width of a single-colored whole route
    pub route_width: f32,
}

impl Default for RoutePalette {
    fn default() -> Self {
        Self {
            walking: "#4CAF50".into(),
            cycling: "#00BCD4".into(),
            bus: "#FF9800".into(),
            subway: "#2196F3".into(),
            rail: "#673AB7".into(),
            tram: "#E91E63".into(),
            driving: "#607D8B".into(),
            remaining: "#9E9E9E".into(),
            walking_width: 8.0,
            transit_width: 14.0,
            route_width: 12.0,
        }
    }
}

impl RoutePalette {
    pub fn hex(&self, key: ColorKey) -> &str {
        match key {
            ColorKey::Walking => &self.walking,
            ColorKey::Cycling => &self.cycling,
            ColorKey::Bus => &self.bus,
            ColorKey::Subway => &self.subway,
            ColorKey::Rail => &self.rail,
            ColorKey::Tram => &self.tram,
            ColorKey::Driving => &self.driving,
            ColorKey::Remaining => &self.remaining,
        }
    }

    pub fn step_width(&self, key: ColorKey) -> f32 {
        if key == ColorKey::Walking {
            self.walking_width
        } else {
            self.transit_width
        }
    }

    pub fn route_width(&self, key: ColorKey) -> f32 {
        if key == ColorKey::Walking {
            self.walking_width
        } else {
            self.route_width
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transit(vehicle: Option<&str>) -> ColorKey {
        ColorKey::for_travel_mode("TRANSIT", vehicle)
    }

    #[test]
    fn walking_ignores_vehicle_type() {
        assert_eq!(ColorKey::for_travel_mode("WALKING", Some("BUS")), ColorKey::Walking);
    }

    #[test]
    fn transit_vehicle_classes() {
        assert_eq!(transit(Some("SUBWAY")), ColorKey::Subway);
        assert_eq!(transit(Some("subway")), ColorKey::Subway);
        assert_eq!(transit(Some("METRO_RAIL")), ColorKey::Subway);
        assert_eq!(transit(Some("BUS")), ColorKey::Bus);
        assert_eq!(transit(Some("INTERCITY_BUS")), ColorKey::Bus);
        assert_eq!(transit(Some("TROLLEYBUS")), ColorKey::Bus);
        for rail in ["RAIL", "HEAVY_RAIL", "COMMUTER_TRAIN", "HIGH_SPEED_TRAIN", "LONG_DISTANCE_TRAIN"] {
            assert_eq!(transit(Some(rail)), ColorKey::Rail, "{rail}");
        }
        assert_eq!(transit(Some("TRAM")), ColorKey::Tram);
        assert_eq!(transit(Some("MONORAIL")), ColorKey::Tram);
    }

    #[test]
    fn unknown_or_missing_vehicle_defaults_to_bus() {
        assert_eq!(transit(None), ColorKey::Bus);
        assert_eq!(transit(Some("FERRY")), ColorKey::Bus);
    }

    #[test]
    fn other_travel_modes() {
        assert_eq!(ColorKey::for_travel_mode("DRIVING", None), ColorKey::Driving);
        assert_eq!(ColorKey::for_travel_mode("BICYCLING", None), ColorKey::Cycling);
        assert_eq!(ColorKey::for_travel_mode("FLYING", None), ColorKey::Remaining);
        assert_eq!(ColorKey::for_travel_mode("", None), ColorKey::Remaining);
    }

    #[test]
    fn only_walking_is_dotted() {
        assert_eq!(StrokeStyle::for_key(ColorKey::Walking), StrokeStyle::Dotted);
        assert_eq!(StrokeStyle::for_key(ColorKey::Bus), StrokeStyle::Solid);
        assert_eq!(StrokeStyle::for_key(ColorKey::Remaining), StrokeStyle::Solid);
    }

    #[test]
    fn palette_lookup_and_widths() {
        let palette = RoutePalette::default();
        assert_eq!(palette.hex(ColorKey::Walking), "#4CAF50");
        assert_eq!(palette.step_width(ColorKey::Walking), 8.0);
        assert_eq!(palette.step_width(ColorKey::Rail), 14.0);
        assert_eq!(palette.route_width(ColorKey::Driving), 12.0);
    }
}
