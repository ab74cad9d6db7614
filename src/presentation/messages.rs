use crate::carbon::CarbonModel;
use crate::models::TransportMode;

const MOCK_TRIP_PREFIX: &str = "MOCK_";
const RESTORED_TRIP_ID: &str = "restored-trip";

/// Progress line shown while a trip is recording.
pub fn encouragement_message(
    carbon: &CarbonModel,
    distance_meters: f64,
    mode: Option<TransportMode>,
) -> String {
    let saved_grams = carbon.saved_grams(distance_meters, mode);

    match mode {
        Some(TransportMode::Walking | TransportMode::Cycling) => {
            if saved_grams >= 1.0 {
                format!("Carbon reduced {saved_grams:.0} g | Keep it up 💪")
            } else {
                "Green travel | Keep it up 💪".to_string()
            }
        }
        Some(TransportMode::Bus | TransportMode::Subway) => {
            if saved_grams >= 1.0 {
                format!("Green travel in progress 🚌 | Carbon reduced {saved_grams:.0} g")
            } else {
                "Green travel in progress 🚌".to_string()
            }
        }
        _ => format!("Traveled: {:.2} km", distance_meters / 1000.0),
    }
}

pub fn milestone_message(
    carbon: &CarbonModel,
    milestone_meters: f64,
    mode: Option<TransportMode>,
) -> String {
    let saved_grams = carbon.saved_grams(milestone_meters, mode);

    match mode {
        Some(TransportMode::Walking) => format!(
            "Congrats! You've walked {milestone_meters:.0} m, carbon reduced {saved_grams:.0} g 🎉"
        ),
        Some(TransportMode::Cycling) => format!(
            "Congrats! You've cycled {milestone_meters:.0} m, carbon reduced {saved_grams:.0} g 🚴"
        ),
        Some(TransportMode::Bus | TransportMode::Subway) => format!(
            "Congrats! You've traveled {milestone_meters:.0} m, carbon reduced {saved_grams:.0} g 🌱"
        ),
        _ => format!("Congrats! You've traveled {milestone_meters:.0} m"),
    }
}

/// End-of-trip notice. `carbon_kg` is saved carbon for a green trip, emitted
/// carbon otherwise.
pub fn completion_message(is_green_trip: bool, carbon_kg: f64, green_points: i64) -> String {
    if is_green_trip {
        format!(
            "🎉 Green trip completed! Carbon reduced {carbon_kg:.2} kg, earned {green_points} points"
        )
    } else {
        format!("Trip completed, carbon emission {carbon_kg:.2} kg")
    }
}

/// `MM:SS`, or `H:MM:SS` once an hour has passed.
pub fn format_elapsed(elapsed_ms: i64) -> String {
    let total_secs = elapsed_ms.max(0) / 1000;
    let seconds = total_secs % 60;
    let minutes = (total_secs / 60) % 60;
    let hours = total_secs / 3600;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Trip ids minted offline or restored from a crash are never sent to the backend.
pub fn is_valid_trip_id(trip_id: Option<&str>) -> bool {
    match trip_id {
        Some(id) => !id.starts_with(MOCK_TRIP_PREFIX) && id != RESTORED_TRIP_ID,
        None => false,
    }
}
