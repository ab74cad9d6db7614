use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::TransportMode;

/// A maximal run of identical mode predictions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModeSegment {
    pub mode: TransportMode,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl ModeSegment {
    pub fn starting_at(mode: TransportMode, at: DateTime<Utc>) -> Self {
        Self {
            mode,
            start_time: at,
            end_time: at,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn duration_ms(&self) -> i64 {
        self.duration().num_milliseconds()
    }
}

/// Per-mode share of a finished trip, in the shape the trip API expects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransportModeSegment {
    pub mode: TransportMode,
    /// Kilometers.
    pub sub_distance: f64,
    /// Seconds.
    pub sub_duration: i64,
}
