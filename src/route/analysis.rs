use serde::{Deserialize, Serialize};

use crate::models::{GeoPoint, RouteStep};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteAnalysis {
    pub has_transit_steps: bool,
    pub has_step_polylines: bool,
}

pub fn analyze_steps(steps: &[RouteStep]) -> RouteAnalysis {
    RouteAnalysis {
        has_transit_steps: steps.iter().any(RouteStep::is_transit),
        has_step_polylines: steps.iter().any(RouteStep::has_polyline),
    }
}

/// How a trip about to start will be tracked and drawn.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrackingMode {
    /// A route is loaded, so progress is measured against it.
    pub is_navigation_mode: bool,
    pub has_transit_with_polylines: bool,
    pub has_transit_fallback: bool,
}

pub fn determine_tracking_mode(route_points: &[GeoPoint], steps: &[RouteStep]) -> TrackingMode {
    let has_route_points = !route_points.is_empty();
    let analysis = analyze_steps(steps);

    TrackingMode {
        is_navigation_mode: has_route_points,
        has_transit_with_polylines: analysis.has_transit_steps && analysis.has_step_polylines,
        has_transit_fallback: analysis.has_transit_steps
            && !analysis.has_step_polylines
            && !steps.is_empty()
            && has_route_points,
    }
}
