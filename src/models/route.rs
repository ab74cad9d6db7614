use geo::{Coord, LineString};
use serde::{Deserialize, Serialize};

pub const TRAVEL_MODE_TRANSIT: &str = "TRANSIT";
pub const TRAVEL_MODE_WALKING: &str = "WALKING";
pub const TRAVEL_MODE_DRIVING: &str = "DRIVING";
pub const TRAVEL_MODE_BICYCLING: &str = "BICYCLING";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<GeoPoint> for Coord<f64> {
    fn from(point: GeoPoint) -> Self {
        Coord {
            x: point.lng,
            y: point.lat,
        }
    }
}

/// Builds a lon/lat line string from route points.
pub fn line_string(points: &[GeoPoint]) -> LineString<f64> {
    points.iter().copied().map(Coord::from).collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransitDetails {
    #[serde(default)]
    pub line_name: String,
    #[serde(default)]
    pub line_short_name: Option<String>,
    #[serde(default)]
    pub departure_stop: String,
    #[serde(default)]
    pub arrival_stop: String,
    #[serde(default)]
    pub num_stops: u32,
    /// BUS, SUBWAY, RAIL, ... as reported by the directions provider.
    pub vehicle_type: String,
    #[serde(default)]
    pub headsign: Option<String>,
}

/// One leg of a recommended route. Immutable once received.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RouteStep {
    #[serde(default)]
    pub instruction: String,
    /// Meters.
    pub distance: f64,
    /// Seconds.
    #[serde(default)]
    pub duration: i64,
    pub travel_mode: String,
    #[serde(default)]
    pub transit_details: Option<TransitDetails>,
    #[serde(default)]
    pub polyline_points: Option<Vec<GeoPoint>>,
}

impl RouteStep {
    pub fn is_transit(&self) -> bool {
        self.travel_mode == TRAVEL_MODE_TRANSIT
    }

    pub fn is_walking(&self) -> bool {
        self.travel_mode == TRAVEL_MODE_WALKING
    }

    pub fn vehicle_type(&self) -> Option<&str> {
        self.transit_details
            .as_ref()
            .map(|details| details.vehicle_type.as_str())
    }

    pub fn has_polyline(&self) -> bool {
        self.polyline_points
            .as_ref()
            .is_some_and(|points| !points.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RouteAlternative {
    pub index: u32,
    /// Kilometers.
    pub total_distance: f64,
    /// Minutes.
    pub estimated_duration: u32,
    /// Kilograms CO2.
    pub total_carbon: f64,
    #[serde(default)]
    pub route_points: Vec<GeoPoint>,
    #[serde(default)]
    pub route_steps: Vec<RouteStep>,
    #[serde(default)]
    pub summary: String,
}

/// Route recommendation as delivered by the recommendation service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecommendedRoute {
    #[serde(default)]
    pub route_id: Option<String>,
    /// `low_carbon`, `balanced`, or absent.
    #[serde(default)]
    pub route_type: Option<String>,
    /// Kilometers.
    #[serde(default)]
    pub total_distance: f64,
    /// Minutes.
    #[serde(default)]
    pub estimated_duration: u32,
    /// Kilograms CO2.
    #[serde(default)]
    pub total_carbon: f64,
    /// Kilograms CO2 saved compared to driving.
    #[serde(default)]
    pub carbon_saved: f64,
    #[serde(default)]
    pub route_points: Option<Vec<GeoPoint>>,
    #[serde(default)]
    pub route_steps: Option<Vec<RouteStep>>,
    #[serde(default)]
    pub route_alternatives: Option<Vec<RouteAlternative>>,
    /// Legacy duration field (minutes), used when `estimated_duration` is 0.
    #[serde(default)]
    pub duration: Option<u32>,
}

impl RecommendedRoute {
    pub fn steps(&self) -> &[RouteStep] {
        self.route_steps.as_deref().unwrap_or(&[])
    }

    pub fn points(&self) -> &[GeoPoint] {
        self.route_points.as_deref().unwrap_or(&[])
    }

    pub fn has_alternatives(&self) -> bool {
        self.route_alternatives
            .as_ref()
            .is_some_and(|alternatives| !alternatives.is_empty())
    }
}
