use crate::carbon::CarbonModel;
use crate::models::{is_green_dict_mode, normalize_dict_mode, TransportMode, TripCompletionData};
use crate::segmentation::ModeSegmentTracker;

use super::state::DEFAULT_USER_MODE;

/// Builds the completion payload from a closed segment list.
///
/// The green flag and the saved carbon follow what the user declared, not what
/// the classifier detected; the detected mode is reported alongside.
pub fn assemble_completion(
    tracker: &ModeSegmentTracker,
    user_selected_mode: Option<&str>,
    distance_meters: f64,
    carbon: &CarbonModel,
) -> TripCompletionData {
    let user_selected_mode = normalize_dict_mode(user_selected_mode.unwrap_or(DEFAULT_USER_MODE));
    let user_mode = TransportMode::from_dict_str(&user_selected_mode);

    let detected_mode = if tracker.is_empty() {
        None
    } else {
        Some(tracker.dominant_mode().as_dict_str().to_string())
    };

    let ml_confidence = if tracker.is_empty() || tracker.last_confidence() <= 0.0 {
        None
    } else {
        Some(tracker.last_confidence() as f64)
    };

    TripCompletionData {
        detected_mode,
        is_green_trip: is_green_dict_mode(&user_selected_mode),
        carbon_saved_grams: carbon.saved_grams(distance_meters, user_mode) as i64,
        ml_confidence,
        distance_meters,
        transport_modes: tracker.to_distance_weighted_segments(distance_meters),
        user_selected_mode,
    }
}
