use serde::{Deserialize, Serialize};

use crate::carbon::CarbonModel;
use crate::models::{RecommendedRoute, RouteAlternative};
use crate::route::analyze_steps;

const LOW_CARBON: &str = "low_carbon";
const BALANCED: &str = "balanced";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfoTexts {
    pub route_type_text: String,
    pub carbon_saved_text: String,
    pub carbon_color_hex: String,
    pub eco_rating: String,
    pub header_text: String,
    pub duration_text: String,
    pub show_cumulative_impact: bool,
    pub show_route_options: bool,
    pub show_route_steps: bool,
}

pub fn route_type_text(route_type: Option<&str>) -> &'static str {
    match route_type {
        Some(LOW_CARBON) => "Low Carbon Route",
        Some(BALANCED) => "Balanced Route",
        _ => "Recommended Route",
    }
}

pub fn carbon_color_hex(total_carbon_kg: f64) -> &'static str {
    if total_carbon_kg == 0.0 {
        "#4CAF50"
    } else if total_carbon_kg < 0.5 {
        "#8BC34A"
    } else if total_carbon_kg < 1.5 {
        "#FFC107"
    } else {
        "#FF5722"
    }
}

pub fn carbon_saved_text(carbon_saved_kg: f64, total_carbon_kg: f64) -> String {
    if carbon_saved_kg > 0.0 {
        format!("🌍 Reduced {carbon_saved_kg:.2} kg CO₂ vs driving")
    } else {
        format!("Carbon emission: {total_carbon_kg:.2} kg")
    }
}

/// Builds the route summary card from a recommended route.
#[derive(Debug, Clone, Default)]
pub struct RouteInfoFormatter {
    carbon: CarbonModel,
}

impl RouteInfoFormatter {
    pub fn new(carbon: CarbonModel) -> Self {
        Self { carbon }
    }

    pub fn format(&self, route: &RecommendedRoute) -> RouteInfoTexts {
        let type_text = route_type_text(route.route_type.as_deref());
        let eco_rating = self
            .carbon
            .eco_rating(route.total_carbon, route.total_distance)
            .as_stars();

        let duration_minutes = if route.estimated_duration > 0 {
            route.estimated_duration
        } else {
            route.duration.unwrap_or(0)
        };

        RouteInfoTexts {
            route_type_text: type_text.to_string(),
            carbon_saved_text: carbon_saved_text(route.carbon_saved, route.total_carbon),
            carbon_color_hex: carbon_color_hex(route.total_carbon).to_string(),
            header_text: format!("{type_text}  Eco Rating: {eco_rating}"),
            eco_rating,
            duration_text: format!("Estimated: {duration_minutes} min"),
            show_cumulative_impact: route.carbon_saved > 0.0,
            show_route_options: route.has_alternatives(),
            show_route_steps: analyze_steps(route.steps()).has_transit_steps,
        }
    }

    /// Card for an alternative the user switched to. The alternative carries no
    /// saved figure of its own, so it is recomputed against driving.
    pub fn format_alternative(
        &self,
        route: &RecommendedRoute,
        alternative: &RouteAlternative,
    ) -> RouteInfoTexts {
        let driving_kg = alternative.total_distance * self.carbon.config().driving_kg_per_km;
        let selected = RecommendedRoute {
            total_distance: alternative.total_distance,
            estimated_duration: alternative.estimated_duration,
            total_carbon: alternative.total_carbon,
            carbon_saved: (driving_kg - alternative.total_carbon).max(0.0),
            route_points: Some(alternative.route_points.clone()),
            route_steps: Some(alternative.route_steps.clone()),
            duration: None,
            ..route.clone()
        };
        self.format(&selected)
    }
}
