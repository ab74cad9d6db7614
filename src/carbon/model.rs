use serde::{Deserialize, Serialize};

use crate::carbon::config::CarbonConfig;
use crate::models::TransportMode;

/// 1 to 5 stars of carbon efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct EcoRating(u8);

impl EcoRating {
    pub const MAX_STARS: u8 = 5;

    pub fn stars(&self) -> u8 {
        self.0
    }

    pub fn as_stars(&self) -> String {
        "⭐".repeat(self.0 as usize)
    }
}

/// Stateless emission calculations. Cheap to clone; the engine loop and the
/// route formatter each hold their own copy.
#[derive(Debug, Clone, Default)]
pub struct CarbonModel {
    config: CarbonConfig,
}

impl CarbonModel {
    pub fn new(config: CarbonConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CarbonConfig {
        &self.config
    }

    /// kg CO2 per km. Unknown modes are charged like driving.
    pub fn emission_factor_per_km(&self, mode: Option<TransportMode>) -> f64 {
        match mode {
            Some(TransportMode::Walking | TransportMode::Cycling) => self.config.active_kg_per_km,
            Some(TransportMode::Bus | TransportMode::Subway) => self.config.transit_kg_per_km,
            Some(TransportMode::Driving) | None => self.config.driving_kg_per_km,
        }
    }

    /// kg CO2 emitted covering `distance_meters` with `mode`.
    pub fn emission_kg(&self, distance_meters: f64, mode: Option<TransportMode>) -> f64 {
        distance_meters / 1000.0 * self.emission_factor_per_km(mode)
    }

    /// Grams of CO2 avoided compared to driving the same distance, never negative.
    pub fn saved_grams(&self, distance_meters: f64, mode: Option<TransportMode>) -> f64 {
        let distance_km = distance_meters / 1000.0;
        let mode_kg = distance_km * self.emission_factor_per_km(mode);
        let driving_kg = distance_km * self.config.driving_kg_per_km;
        ((driving_kg - mode_kg) * 1000.0).max(0.0)
    }

    pub fn eco_rating(&self, total_carbon_kg: f64, total_distance_km: f64) -> EcoRating {
        let per_km = if total_distance_km > 0.0 {
            total_carbon_kg / total_distance_km
        } else {
            total_carbon_kg
        };

        let [four, three, two] = self.config.eco_rating_breakpoints;
        let stars = if per_km == 0.0 {
            5
        } else if per_km < four {
            4
        } else if per_km < three {
            3
        } else if per_km < two {
            2
        } else {
            1
        };

        EcoRating(stars)
    }
}
