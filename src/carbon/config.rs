use serde::{Deserialize, Serialize};

/// Emission factors and eco-rating breakpoints. These are policy numbers,
/// tunable through the settings file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CarbonConfig {
    /// kg CO2 per km for walking and cycling
    pub active_kg_per_km: f64,

    /// kg CO2 per km for bus and subway
    pub transit_kg_per_km: f64,

    /// kg CO2 per km for driving; also the baseline every saving is measured against
    pub driving_kg_per_km: f64,

    /// Ascending kg/km breakpoints for 4, 3 and 2 stars. Exactly 0 kg/km is 5 stars,
    /// anything at or above the last breakpoint is 1 star.
    pub eco_rating_breakpoints: [f64; 3],
}

impl Default for CarbonConfig {
    fn default() -> Self {
        Self {
            active_kg_per_km: 0.0,
            transit_kg_per_km: 0.05,
            driving_kg_per_km: 0.15,
            eco_rating_breakpoints: [0.03, 0.06, 0.10],
        }
    }
}
