use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::milestone::{Milestone, MilestoneTracker};
use crate::models::{
    normalize_dict_mode, GeoPoint, LocationUpdate, ModePrediction, ModeSegment, TransportMode,
};
use crate::segmentation::{ModeSegmentTracker, SegmentChange};

/// Declared mode used when the user did not pick one.
pub const DEFAULT_USER_MODE: &str = "walk";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TripStatus {
    #[default]
    Idle,
    Tracking,
    Stopped,
}

/// What a location fix changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationOutcome {
    pub distance_meters: f64,
    pub elapsed_ms: i64,
    pub milestone: Option<Milestone>,
}

/// Read-only view of a trip handed out to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripSnapshot {
    pub status: TripStatus,
    pub trip_id: Option<String>,
    pub user_selected_mode: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub stopped_at: Option<DateTime<Utc>>,
    pub distance_meters: f64,
    pub elapsed_ms: i64,
    pub last_point: Option<GeoPoint>,
    pub current_mode: Option<TransportMode>,
    pub segments: Vec<ModeSegment>,
}

/// All state for the trip in progress. Owned by the engine task alone.
#[derive(Debug, Clone)]
pub struct TripSession {
    status: TripStatus,
    trip_id: Option<String>,
    user_selected_mode: Option<String>,
    started_at: Option<DateTime<Utc>>,
    stopped_at: Option<DateTime<Utc>>,
    /// Latest time seen from either stream.
    last_event_at: Option<DateTime<Utc>>,
    distance_meters: f64,
    last_point: Option<GeoPoint>,
    tracker: ModeSegmentTracker,
    milestones: MilestoneTracker,
}

impl TripSession {
    pub fn new(milestones: MilestoneTracker) -> Self {
        Self {
            status: TripStatus::Idle,
            trip_id: None,
            user_selected_mode: None,
            started_at: None,
            stopped_at: None,
            last_event_at: None,
            distance_meters: 0.0,
            last_point: None,
            tracker: ModeSegmentTracker::new(),
            milestones,
        }
    }

    pub fn status(&self) -> TripStatus {
        self.status
    }

    pub fn is_tracking(&self) -> bool {
        self.status == TripStatus::Tracking
    }

    pub fn trip_id(&self) -> Option<&str> {
        self.trip_id.as_deref()
    }

    pub fn tracker(&self) -> &ModeSegmentTracker {
        &self.tracker
    }

    pub fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    /// Declared mode string, `walk` when none was given.
    pub fn user_selected_mode(&self) -> &str {
        self.user_selected_mode
            .as_deref()
            .unwrap_or(DEFAULT_USER_MODE)
    }

    /// Declared mode parsed; `None` for strings outside the mode vocabulary.
    pub fn user_mode(&self) -> Option<TransportMode> {
        TransportMode::from_dict_str(self.user_selected_mode())
    }

    pub fn begin(&mut self, trip_id: String, user_selected_mode: Option<String>, at: DateTime<Utc>) {
        self.milestones.reset();
        self.tracker.reset();

        self.status = TripStatus::Tracking;
        self.trip_id = Some(trip_id);
        self.user_selected_mode = user_selected_mode.as_deref().map(normalize_dict_mode);
        self.started_at = Some(at);
        self.stopped_at = None;
        self.last_event_at = Some(at);
        self.distance_meters = 0.0;
        self.last_point = None;
    }

    /// Ignored unless tracking. Distance is cumulative and never decreases, and
    /// at most one milestone fires per fix.
    pub fn record_location(&mut self, update: &LocationUpdate) -> Option<LocationOutcome> {
        if !self.is_tracking() {
            return None;
        }

        self.observe(update.observed_at);
        self.distance_meters = self.distance_meters.max(update.distance_meters);
        self.last_point = Some(update.point);

        Some(LocationOutcome {
            distance_meters: self.distance_meters,
            elapsed_ms: self.elapsed_ms_at(update.observed_at),
            milestone: self.milestones.poll(self.distance_meters),
        })
    }

    /// Ignored unless tracking.
    pub fn record_prediction(&mut self, prediction: &ModePrediction) -> Option<SegmentChange> {
        if !self.is_tracking() {
            return None;
        }

        self.observe(prediction.observed_at);
        Some(self.tracker.on_mode_prediction(
            prediction.mode,
            prediction.confidence,
            prediction.observed_at,
        ))
    }

    /// Closes the open segment and freezes the trip. Returns false if no trip
    /// was being tracked.
    pub fn stop(&mut self, at: DateTime<Utc>) -> bool {
        if !self.is_tracking() {
            return false;
        }

        let stopped_at = self.last_event_at.map_or(at, |last| at.max(last));
        self.tracker.close(stopped_at);
        self.stopped_at = Some(stopped_at);
        self.status = TripStatus::Stopped;
        true
    }

    /// Elapsed time from trip start to `at`, or to the stop instant once stopped.
    pub fn elapsed_ms_at(&self, at: DateTime<Utc>) -> i64 {
        let Some(started_at) = self.started_at else {
            return 0;
        };
        let end = self.stopped_at.unwrap_or(at);
        (end - started_at).num_milliseconds().max(0)
    }

    /// Elapsed time runs to the latest event seen, so the trip is measured on
    /// the clock its events carry.
    pub fn snapshot(&self) -> TripSnapshot {
        TripSnapshot {
            status: self.status,
            trip_id: self.trip_id.clone(),
            user_selected_mode: self.user_selected_mode.clone(),
            started_at: self.started_at,
            stopped_at: self.stopped_at,
            distance_meters: self.distance_meters,
            elapsed_ms: self.last_event_at.map_or(0, |now| self.elapsed_ms_at(now)),
            last_point: self.last_point,
            current_mode: self.tracker.current_mode(),
            segments: self.tracker.segments().to_vec(),
        }
    }

    fn observe(&mut self, at: DateTime<Utc>) {
        self.last_event_at = Some(self.last_event_at.map_or(at, |last| last.max(at)));
    }
}
