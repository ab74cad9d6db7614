use serde::{Deserialize, Serialize};

pub const DEFAULT_MILESTONES_M: [f64; 5] = [1000.0, 2000.0, 3000.0, 5000.0, 10000.0];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub index: usize,
    pub threshold_m: f64,
}

/// Distance thresholds that each fire once per trip.
#[derive(Debug, Clone)]
pub struct MilestoneTracker {
    thresholds: Vec<f64>,
    reached: Vec<bool>,
}

impl Default for MilestoneTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MILESTONES_M.to_vec())
    }
}

impl MilestoneTracker {
    /// Thresholds are sorted ascending; duplicates and non-finite values are dropped.
    pub fn new(mut thresholds: Vec<f64>) -> Self {
        thresholds.retain(|t| t.is_finite());
        thresholds.sort_by(|a, b| a.total_cmp(b));
        thresholds.dedup();

        let reached = vec![false; thresholds.len()];
        Self {
            thresholds,
            reached,
        }
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// First threshold at or below `distance_m` that has not fired yet.
    pub fn check(&self, distance_m: f64) -> Option<Milestone> {
        self.thresholds
            .iter()
            .zip(&self.reached)
            .enumerate()
            .find(|(_, (threshold, reached))| !**reached && distance_m >= **threshold)
            .map(|(index, (threshold, _))| Milestone {
                index,
                threshold_m: *threshold,
            })
    }

    pub fn mark_reached(&mut self, milestone: Milestone) {
        if let Some(reached) = self.reached.get_mut(milestone.index) {
            *reached = true;
        }
    }

    /// `check` followed by `mark_reached`.
    pub fn poll(&mut self, distance_m: f64) -> Option<Milestone> {
        let milestone = self.check(distance_m)?;
        self.mark_reached(milestone);
        Some(milestone)
    }

    pub fn reached_count(&self) -> usize {
        self.reached.iter().filter(|r| **r).count()
    }

    pub fn reset(&mut self) {
        self.reached.iter_mut().for_each(|r| *r = false);
    }
}
