use std::{env, fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use serde::Deserialize;

use ecotrip_lib::{
    init_logging, presentation::completion_message, CarbonModel, LocationUpdate, ModePrediction,
    RecommendedRoute, SettingsStore, TransportMode, TripController, TripEvent,
};

const DEFAULT_SETTINGS_FILE: &str = "ecotrip-settings.json";

/// A recorded trip: what the user declared, the route they followed and
/// every event both collaborators produced, with timestamps.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordedTrip {
    #[serde(default)]
    user_selected_mode: Option<String>,
    #[serde(default)]
    route: Option<RecommendedRoute>,
    /// Alternative switched to right after the start.
    #[serde(default)]
    selected_alternative: Option<usize>,
    started_at: DateTime<Utc>,
    stopped_at: DateTime<Utc>,
    #[serde(default)]
    locations: Vec<LocationUpdate>,
    #[serde(default)]
    predictions: Vec<ModePrediction>,
    /// Points the backend awarded, if the recording captured them.
    #[serde(default)]
    green_points: i64,
}

enum Recorded {
    Location(LocationUpdate),
    Prediction(ModePrediction),
}

impl Recorded {
    fn observed_at(&self) -> DateTime<Utc> {
        match self {
            Recorded::Location(update) => update.observed_at,
            Recorded::Prediction(prediction) => prediction.observed_at,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let Some(trip_path) = env::args().nth(1).map(PathBuf::from) else {
        bail!("usage: ecotrip-replay <trip.json>");
    };

    let settings_path = env::var("ECOTRIP_SETTINGS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_FILE));
    let settings = SettingsStore::new(settings_path)?.engine();
    let carbon = CarbonModel::new(settings.carbon.clone());

    let contents = fs::read_to_string(&trip_path)
        .with_context(|| format!("Failed to read trip from {}", trip_path.display()))?;
    let trip: RecordedTrip = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid trip recording {}", trip_path.display()))?;

    info!(
        "replaying {} locations and {} predictions from {}",
        trip.locations.len(),
        trip.predictions.len(),
        trip_path.display()
    );

    let (engine, mut events) = TripController::spawn(settings);

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => info!("[{}] {json}", event.name()),
                Err(err) => info!("[{}] unserializable event: {err}", event.name()),
            }
            if let TripEvent::MilestoneReached(milestone) = &event {
                println!("{}", milestone.message);
            }
        }
    });

    let started = engine
        .start_trip_at(trip.user_selected_mode.clone(), trip.route, trip.started_at)
        .await?;
    info!("trip {} started", started.trip_id);

    if let Some(index) = trip.selected_alternative {
        engine.select_alternative(index).await?;
    }

    // Interleave both streams in recorded order
    let mut recorded: Vec<Recorded> = trip
        .locations
        .into_iter()
        .map(Recorded::Location)
        .chain(trip.predictions.into_iter().map(Recorded::Prediction))
        .collect();
    recorded.sort_by_key(Recorded::observed_at);

    for event in recorded {
        match event {
            Recorded::Location(update) => engine.send_location(update).await?,
            Recorded::Prediction(prediction) => engine.send_prediction(prediction).await?,
        }
    }

    let data = engine.stop_trip_at(trip.stopped_at).await?;
    engine.shutdown().await?;
    drop(engine);
    printer.await.context("event printer task failed")?;

    let user_mode = TransportMode::from_dict_str(&data.user_selected_mode);
    let carbon_kg = if data.is_green_trip {
        data.carbon_saved_grams as f64 / 1000.0
    } else {
        carbon.emission_kg(data.distance_meters, user_mode)
    };
    println!("{}", completion_message(data.is_green_trip, carbon_kg, trip.green_points));
    println!("{}", serde_json::to_string_pretty(&data)?);

    Ok(())
}
