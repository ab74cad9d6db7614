//! Trip tracking engine: turns a location stream and a transport-mode
//! prediction stream into mode segments, route render plans, progress
//! notices and a carbon-accounted completion payload.

pub mod carbon;
pub mod milestone;
pub mod models;
pub mod presentation;
pub mod route;
pub mod segmentation;
pub mod settings;
pub mod trip;
pub mod utils;

pub use carbon::{CarbonConfig, CarbonModel, EcoRating};
pub use milestone::{Milestone, MilestoneTracker};
pub use models::{
    GeoPoint, LocationUpdate, ModePrediction, ModeSegment, RecommendedRoute, RouteAlternative,
    RouteStep, TransportMode, TransportModeSegment, TripCompletionData,
};
pub use route::{RenderPlan, RouteGeometrySplitter, RoutePalette, TrackingMode};
pub use settings::{EngineSettings, SettingsStore};
pub use trip::{TripController, TripEvent, TripSnapshot, TripStarted, TripStatus};
pub use utils::logging::init_logging;
