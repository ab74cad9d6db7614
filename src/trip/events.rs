use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::milestone::Milestone;
use crate::models::{TransportMode, TripCompletionData};
use crate::presentation::{DetectionDisplay, RouteInfoTexts};
use crate::route::{RenderPlan, TrackingMode};

use super::state::TripStatus;

/// How the selected route is tracked and drawn.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlan {
    /// Position in the route's alternatives, `None` for the primary route.
    pub alternative: Option<usize>,
    pub tracking_mode: TrackingMode,
    pub render_plan: RenderPlan,
    pub route_info: RouteInfoTexts,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripStarted {
    pub trip_id: String,
    pub started_at: DateTime<Utc>,
    pub route_plan: Option<RoutePlan>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StateChangedEvent {
    pub status: TripStatus,
    pub trip_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModeDetectedEvent {
    pub detection: DetectionDisplay,
    pub dominant_mode: TransportMode,
    pub segment_count: usize,
    /// The prediction opened a new segment.
    pub mode_changed: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub distance_meters: f64,
    pub carbon_saved_grams: f64,
    pub elapsed_ms: i64,
    pub elapsed_text: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneEvent {
    pub milestone: Milestone,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripCompletedEvent {
    pub trip_id: String,
    pub data: TripCompletionData,
}

/// Everything the engine reports, in the order it happened.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum TripEvent {
    StateChanged(StateChangedEvent),
    RoutePlanned(RoutePlan),
    ModeDetected(ModeDetectedEvent),
    Progress(ProgressEvent),
    MilestoneReached(MilestoneEvent),
    Completed(TripCompletedEvent),
}

impl TripEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TripEvent::StateChanged(_) => "state-changed",
            TripEvent::RoutePlanned(_) => "route-planned",
            TripEvent::ModeDetected(_) => "mode-detected",
            TripEvent::Progress(_) => "progress",
            TripEvent::MilestoneReached(_) => "milestone-reached",
            TripEvent::Completed(_) => "completed",
        }
    }
}
