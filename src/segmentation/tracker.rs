use chrono::{DateTime, Utc};

use crate::models::{ModeSegment, TransportMode, TransportModeSegment};

/// What a prediction did to the segment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentChange {
    /// A new segment was opened at this index (first prediction or mode change).
    Started(usize),
    /// The segment at this index was extended.
    Extended(usize),
}

/// Run-length encodes the stream of mode predictions for one trip.
#[derive(Debug, Clone, Default)]
pub struct ModeSegmentTracker {
    segments: Vec<ModeSegment>,
    last_confidence: f32,
}

impl ModeSegmentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[ModeSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last_confidence(&self) -> f32 {
        self.last_confidence
    }

    pub fn current_mode(&self) -> Option<TransportMode> {
        self.segments.last().map(|segment| segment.mode)
    }

    pub fn reset(&mut self) {
        self.segments.clear();
        self.last_confidence = 0.0;
    }

    pub fn on_mode_prediction(
        &mut self,
        mode: TransportMode,
        confidence: f32,
        observed_at: DateTime<Utc>,
    ) -> SegmentChange {
        self.last_confidence = confidence;

        match self.segments.last_mut() {
            Some(last) if last.mode == mode => {
                // Late events never move a segment boundary backwards
                last.end_time = observed_at.max(last.end_time);
                SegmentChange::Extended(self.segments.len() - 1)
            }
            Some(last) => {
                let at = observed_at.max(last.end_time);
                last.end_time = at;
                self.segments.push(ModeSegment::starting_at(mode, at));
                SegmentChange::Started(self.segments.len() - 1)
            }
            None => {
                self.segments.push(ModeSegment::starting_at(mode, observed_at));
                SegmentChange::Started(0)
            }
        }
    }

    /// Closes the open segment at `at`, used when the trip stops.
    pub fn close(&mut self, at: DateTime<Utc>) {
        if let Some(last) = self.segments.last_mut() {
            last.end_time = at.max(last.end_time);
        }
    }

    /// Mode with the largest summed duration. Ties go to the mode seen first.
    pub fn dominant_mode(&self) -> TransportMode {
        let mut totals: Vec<(TransportMode, i64)> = Vec::new();
        for segment in &self.segments {
            match totals.iter_mut().find(|(mode, _)| *mode == segment.mode) {
                Some((_, total)) => *total += segment.duration_ms(),
                None => totals.push((segment.mode, segment.duration_ms())),
            }
        }

        let mut best: Option<(TransportMode, i64)> = None;
        for (mode, total) in totals {
            match best {
                Some((_, best_total)) if total <= best_total => {}
                _ => best = Some((mode, total)),
            }
        }

        best.map(|(mode, _)| mode).unwrap_or_default()
    }

    pub fn to_distance_weighted_segments(
        &self,
        total_distance_meters: f64,
    ) -> Vec<TransportModeSegment> {
        super::allocation::allocate_by_duration(&self.segments, total_distance_meters)
    }
}
