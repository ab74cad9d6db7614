use std::ops::Range;

use geo::{HaversineLength, LineString};
use serde::{Deserialize, Serialize};

use crate::models::route::line_string;
use crate::models::{GeoPoint, RecommendedRoute, RouteAlternative, RouteStep, TransportMode};
use crate::route::analysis::analyze_steps;
use crate::route::palette::{ColorKey, RoutePalette, StrokeStyle};

// Set to true to trace every split decision
const ENABLE_LOGS: bool = false;

use crate::log_debug;

/// A drawable polyline needs at least this many points.
pub const MIN_SEGMENT_POINTS: usize = 2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RenderStrategy {
    /// Each step drawn from its own geometry.
    PerStep,
    /// Overview geometry cut up by each step's share of the distance.
    ProportionalFallback,
    /// Overview geometry drawn in a single color.
    WholeRoute,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PolylineSegment {
    /// Index of the step this segment was drawn for; `None` for a whole route.
    pub step_index: Option<usize>,
    pub color: ColorKey,
    pub stroke: StrokeStyle,
    pub width: f32,
    pub points: Vec<GeoPoint>,
}

impl PolylineSegment {
    pub fn line_string(&self) -> LineString<f64> {
        line_string(&self.points)
    }

    pub fn length_meters(&self) -> f64 {
        self.line_string().haversine_length()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderPlan {
    pub strategy: RenderStrategy,
    pub segments: Vec<PolylineSegment>,
}

impl RenderPlan {
    pub fn point_count(&self) -> usize {
        self.segments.iter().map(|segment| segment.points.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Point ranges of the overview polyline consumed by each step.
///
/// Every step but the last takes `round(total * share)` points, at least
/// [`MIN_SEGMENT_POINTS`]; the last takes whatever remains. Ranges are
/// contiguous, clamped to `total_points`, and together cover the whole
/// overview. Steps reached after the overview is used up get an empty range.
/// Rounding drift is not rebalanced, so early steps can starve later ones.
pub fn fallback_ranges(total_points: usize, step_distances: &[f64]) -> Vec<Range<usize>> {
    let total_distance: f64 = step_distances.iter().sum();
    let last = step_distances.len().saturating_sub(1);
    let mut cursor = 0usize;

    step_distances
        .iter()
        .enumerate()
        .map(|(index, distance)| {
            if cursor >= total_points {
                return cursor..cursor;
            }

            let wanted = if index == last {
                total_points - cursor
            } else {
                let share = total_points as f64 * distance / total_distance;
                (share.round() as usize).max(MIN_SEGMENT_POINTS)
            };

            let end = (cursor + wanted).min(total_points);
            let range = cursor..end;
            cursor = end;
            range
        })
        .collect()
}

/// Decides how a route's geometry is partitioned into colored polylines.
#[derive(Debug, Clone, Default)]
pub struct RouteGeometrySplitter {
    palette: RoutePalette,
}

impl RouteGeometrySplitter {
    pub fn new(palette: RoutePalette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &RoutePalette {
        &self.palette
    }

    pub fn plan_route(&self, route: &RecommendedRoute, route_mode: TransportMode) -> RenderPlan {
        self.plan(route.steps(), route.points(), route_mode)
    }

    pub fn plan_alternative(
        &self,
        alternative: &RouteAlternative,
        route_mode: TransportMode,
    ) -> RenderPlan {
        self.plan(&alternative.route_steps, &alternative.route_points, route_mode)
    }

    /// `route_mode` colors the route when it is not split per step.
    pub fn plan(
        &self,
        steps: &[RouteStep],
        overview: &[GeoPoint],
        route_mode: TransportMode,
    ) -> RenderPlan {
        let analysis = analyze_steps(steps);

        if analysis.has_transit_steps && analysis.has_step_polylines {
            let plan = self.per_step(steps);
            if !plan.is_empty() {
                return plan;
            }
            // Step geometry exists but none of it is drawable
            return self.whole_route(overview, route_mode);
        }

        if analysis.has_transit_steps && !steps.is_empty() && !overview.is_empty() {
            return self.proportional(steps, overview, route_mode);
        }

        self.whole_route(overview, route_mode)
    }

    fn per_step(&self, steps: &[RouteStep]) -> RenderPlan {
        let segments = steps
            .iter()
            .enumerate()
            .filter_map(|(index, step)| {
                let points = step.polyline_points.as_ref()?;
                if points.len() < MIN_SEGMENT_POINTS {
                    return None;
                }
                Some(self.step_segment(index, step, points.clone()))
            })
            .collect::<Vec<_>>();

        log_debug!(
            "per-step split: {} steps, {} drawable segments",
            steps.len(),
            segments.len()
        );

        RenderPlan {
            strategy: RenderStrategy::PerStep,
            segments,
        }
    }

    fn proportional(
        &self,
        steps: &[RouteStep],
        overview: &[GeoPoint],
        route_mode: TransportMode,
    ) -> RenderPlan {
        let total_step_distance: f64 = steps.iter().map(|step| step.distance).sum();
        if overview.len() < MIN_SEGMENT_POINTS || total_step_distance <= 0.0 {
            log_debug!(
                "fallback split skipped ({} points, {} m of steps)",
                overview.len(),
                total_step_distance
            );
            return self.whole_route(overview, route_mode);
        }

        let distances: Vec<f64> = steps.iter().map(|step| step.distance).collect();
        let ranges = fallback_ranges(overview.len(), &distances);

        let segments = steps
            .iter()
            .zip(ranges)
            .enumerate()
            .filter(|(_, (_, range))| range.len() >= MIN_SEGMENT_POINTS)
            .map(|(index, (step, range))| {
                log_debug!(
                    "fallback step {index}: mode={}, points={}",
                    step.travel_mode,
                    range.len()
                );
                self.step_segment(index, step, overview[range].to_vec())
            })
            .collect();

        RenderPlan {
            strategy: RenderStrategy::ProportionalFallback,
            segments,
        }
    }

    fn whole_route(&self, overview: &[GeoPoint], route_mode: TransportMode) -> RenderPlan {
        let color = ColorKey::for_mode(route_mode);
        let segments = if overview.is_empty() {
            Vec::new()
        } else {
            vec![PolylineSegment {
                step_index: None,
                color,
                stroke: StrokeStyle::for_key(color),
                width: self.palette.route_width(color),
                points: overview.to_vec(),
            }]
        };

        RenderPlan {
            strategy: RenderStrategy::WholeRoute,
            segments,
        }
    }

    fn step_segment(&self, index: usize, step: &RouteStep, points: Vec<GeoPoint>) -> PolylineSegment {
        let color = ColorKey::for_step(step);
        PolylineSegment {
            step_index: Some(index),
            color,
            stroke: StrokeStyle::for_key(color),
            width: self.palette.step_width(color),
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransitDetails;

    fn overview(n: usize) -> Vec<GeoPoint> {
        (0..n)
            .map(|i| GeoPoint::new(1.29 + i as f64 * 0.001, 103.77 + i as f64 * 0.001))
            .collect()
    }

    fn step(mode: &str, distance: f64, vehicle: Option<&str>, points: Option<Vec<GeoPoint>>) -> RouteStep {
        RouteStep {
            travel_mode: mode.into(),
            distance,
            transit_details: vehicle.map(|v| TransitDetails {
                vehicle_type: v.into(),
                ..TransitDetails::default()
            }),
            polyline_points: points,
            ..RouteStep::default()
        }
    }

    fn splitter() -> RouteGeometrySplitter {
        RouteGeometrySplitter::default()
    }

    #[test]
    fn transit_then_walk_over_24_points() {
        let steps = [
            step("TRANSIT", 1000.0, Some("BUS"), None),
            step("WALKING", 200.0, None, None),
        ];
        let plan = splitter().plan(&steps, &overview(24), TransportMode::Bus);

        assert_eq!(plan.strategy, RenderStrategy::ProportionalFallback);
        assert_eq!(plan.segments.len(), 2);
        assert_eq!(plan.segments[0].points.len(), 20);
        assert_eq!(plan.segments[1].points.len(), 4);
        assert_eq!(plan.segments[0].color, ColorKey::Bus);
        assert_eq!(plan.segments[1].color, ColorKey::Walking);
        assert_eq!(plan.segments[1].stroke, StrokeStyle::Dotted);
        assert_eq!(plan.point_count(), 24);
    }

    #[test]
    fn fallback_ranges_cover_every_point_exactly_once() {
        let cases: [(usize, &[f64]); 5] = [
            (24, &[1000.0, 200.0]),
            (100, &[10.0, 500.0, 30.0, 460.0]),
            (7, &[1.0, 1.0, 1.0, 1.0, 1.0]),
            (3, &[5000.0, 1.0, 1.0]),
            (50, &[0.0, 0.0, 300.0]),
        ];

        for (total, distances) in cases {
            let ranges = fallback_ranges(total, distances);
            assert_eq!(ranges.len(), distances.len());

            let consumed: usize = ranges.iter().map(|r| r.len()).sum();
            assert_eq!(consumed, total, "total={total} distances={distances:?}");

            let mut cursor = 0;
            for range in &ranges {
                assert_eq!(range.start, cursor);
                cursor = range.end;
            }
        }
    }

    #[test]
    fn fallback_floors_small_steps_at_two_points() {
        let ranges = fallback_ranges(100, &[1.0, 999.0]);
        assert_eq!(ranges[0], 0..2);
        assert_eq!(ranges[1], 2..100);
    }

    #[test]
    fn steps_after_overview_is_exhausted_render_nothing() {
        let steps = [
            step("TRANSIT", 5000.0, Some("SUBWAY"), None),
            step("WALKING", 10.0, None, None),
            step("TRANSIT", 10.0, Some("BUS"), None),
        ];
        let plan = splitter().plan(&steps, &overview(4), TransportMode::Subway);

        // first step rounds to 4 points and takes the whole overview
        assert_eq!(plan.segments.len(), 1);
        assert_eq!(plan.segments[0].step_index, Some(0));
        assert_eq!(plan.segments[0].points.len(), 4);
    }

    #[test]
    fn single_point_remainder_is_consumed_but_not_drawn() {
        let steps = [
            step("TRANSIT", 900.0, Some("BUS"), None),
            step("WALKING", 100.0, None, None),
        ];
        // round(10 * 0.9) = 9, remainder 1
        let plan = splitter().plan(&steps, &overview(10), TransportMode::Bus);
        assert_eq!(plan.segments.len(), 1);
        assert_eq!(plan.segments[0].points.len(), 9);
    }

    #[test]
    fn every_drawn_fallback_segment_has_two_points() {
        let steps: Vec<RouteStep> = (0..9)
            .map(|i| step(if i % 2 == 0 { "WALKING" } else { "TRANSIT" }, 37.0 * (i + 1) as f64, Some("RAIL"), None))
            .collect();
        let plan = splitter().plan(&steps, &overview(17), TransportMode::Walking);
        assert!(plan.segments.iter().all(|s| s.points.len() >= MIN_SEGMENT_POINTS));
    }

    #[test]
    fn zero_step_distance_draws_whole_overview() {
        let steps = [
            step("TRANSIT", 0.0, Some("BUS"), None),
            step("WALKING", 0.0, None, None),
        ];
        let plan = splitter().plan(&steps, &overview(12), TransportMode::Bus);
        assert_eq!(plan.strategy, RenderStrategy::WholeRoute);
        assert_eq!(plan.segments.len(), 1);
        assert_eq!(plan.segments[0].points.len(), 12);
        assert_eq!(plan.segments[0].color, ColorKey::Bus);
    }

    #[test]
    fn single_point_overview_is_drawn_whole() {
        let steps = [step("TRANSIT", 100.0, Some("BUS"), None)];
        let plan = splitter().plan(&steps, &overview(1), TransportMode::Bus);
        assert_eq!(plan.strategy, RenderStrategy::WholeRoute);
        assert_eq!(plan.point_count(), 1);
    }

    #[test]
    fn per_step_uses_each_steps_geometry() {
        let steps = [
            step("WALKING", 100.0, None, Some(overview(3))),
            step("TRANSIT", 2000.0, Some("TRAM"), Some(overview(8))),
            step("TRANSIT", 500.0, Some("BUS"), None),
            step("TRANSIT", 500.0, Some("RAIL"), Some(overview(1))),
        ];
        let plan = splitter().plan(&steps, &overview(40), TransportMode::Bus);

        assert_eq!(plan.strategy, RenderStrategy::PerStep);
        assert_eq!(plan.segments.len(), 2);
        assert_eq!(plan.segments[0].color, ColorKey::Walking);
        assert_eq!(plan.segments[0].width, 8.0);
        assert_eq!(plan.segments[1].color, ColorKey::Tram);
        assert_eq!(plan.segments[1].step_index, Some(1));
        assert_eq!(plan.segments[1].width, 14.0);
        assert_eq!(plan.segments[1].stroke, StrokeStyle::Solid);
    }

    #[test]
    fn non_transit_route_uses_selected_mode_color() {
        let steps = [step("WALKING", 800.0, None, Some(overview(5)))];
        let plan = splitter().plan(&steps, &overview(30), TransportMode::Walking);

        assert_eq!(plan.strategy, RenderStrategy::WholeRoute);
        assert_eq!(plan.segments.len(), 1);
        assert_eq!(plan.segments[0].points.len(), 30);
        assert_eq!(plan.segments[0].color, ColorKey::Walking);
        assert_eq!(plan.segments[0].stroke, StrokeStyle::Dotted);
    }

    #[test]
    fn undrawable_step_geometry_falls_back_to_overview() {
        let steps = [
            step("TRANSIT", 900.0, Some("BUS"), Some(overview(1))),
            step("WALKING", 100.0, None, Some(overview(1))),
        ];
        let plan = splitter().plan(&steps, &overview(15), TransportMode::Bus);

        assert_eq!(plan.strategy, RenderStrategy::WholeRoute);
        assert_eq!(plan.segments.len(), 1);
        assert_eq!(plan.segments[0].points.len(), 15);
        assert_eq!(plan.segments[0].color, ColorKey::Bus);
    }

    #[test]
    fn transit_without_overview_or_geometry_draws_nothing() {
        let steps = [step("TRANSIT", 100.0, Some("BUS"), None)];
        let plan = splitter().plan(&steps, &[], TransportMode::Bus);
        assert_eq!(plan.strategy, RenderStrategy::WholeRoute);
        assert!(plan.is_empty());
    }

    #[test]
    fn segment_length_is_haversine() {
        let segment = PolylineSegment {
            step_index: None,
            color: ColorKey::Bus,
            stroke: StrokeStyle::Solid,
            width: 12.0,
            points: vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)],
        };
        // one degree of longitude on the equator
        let length = segment.length_meters();
        assert!((length - 111_195.0).abs() < 100.0, "{length}");
    }
}
