use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GeoPoint, TransportMode, TransportModeSegment};

/// Fix from the location provider. `distance_meters` is the cumulative
/// distance traveled since trip start, accumulated by the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    pub observed_at: DateTime<Utc>,
    pub point: GeoPoint,
    pub distance_meters: f64,
}

/// Output of the transport-mode classifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModePrediction {
    pub mode: TransportMode,
    /// In `[0, 1]`; values above 0 are meaningful.
    pub confidence: f32,
    pub observed_at: DateTime<Utc>,
}

/// Payload handed to the trip-completion API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripCompletionData {
    pub detected_mode: Option<String>,
    pub user_selected_mode: String,
    pub is_green_trip: bool,
    pub carbon_saved_grams: i64,
    pub ml_confidence: Option<f64>,
    pub distance_meters: f64,
    pub transport_modes: Vec<TransportModeSegment>,
}
