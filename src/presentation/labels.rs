use serde::{Deserialize, Serialize};

use crate::models::TransportMode;

pub fn mode_icon(mode: TransportMode) -> &'static str {
    match mode {
        TransportMode::Walking => "🚶",
        TransportMode::Cycling => "🚴",
        TransportMode::Bus => "🚌",
        TransportMode::Subway => "🚇",
        TransportMode::Driving => "🚗",
    }
}

pub fn mode_text(mode: TransportMode) -> &'static str {
    match mode {
        TransportMode::Walking => "Walking",
        TransportMode::Cycling => "Cycling",
        TransportMode::Bus => "Bus",
        TransportMode::Subway => "Subway",
        TransportMode::Driving => "Driving",
    }
}

/// Display strings for one classifier result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DetectionDisplay {
    pub dict_mode: String,
    pub icon: String,
    pub text: String,
    pub confidence_percent: i32,
    /// Shown while following a route.
    pub navigation_text: String,
    /// Shown while free-tracking.
    pub tracking_text: String,
}

pub fn describe_detection(mode: TransportMode, confidence: f32) -> DetectionDisplay {
    let icon = mode_icon(mode);
    let text = mode_text(mode);
    let pct = (confidence * 100.0) as i32;

    DetectionDisplay {
        dict_mode: mode.as_dict_str().to_string(),
        icon: icon.to_string(),
        text: text.to_string(),
        confidence_percent: pct,
        navigation_text: format!("{icon} Current transport: {text} ({pct}%)"),
        tracking_text: format!("{icon} Detected: {text} ({pct}%)"),
    }
}
