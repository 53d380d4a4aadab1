//! Weekly population dynamics for producers, grazers, and decomposers.
//!
//! [`step`] is a pure function of the current [`EcosystemState`]: no
//! randomness, no hidden state. The update order is fixed — grazers feed
//! on the already-updated producer stock, and nutrient uptake uses the
//! new producer stock too. Swapping the order changes trajectories.

use serde::{Deserialize, Serialize};

use crate::constants::{baseline, bounds, floors, OPTIMAL_TEMPERATURE};
use crate::parameters::EnvironmentalParameters;

/// Counts of the three simulated groups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationState {
    /// Primary producers, never below 100.
    pub phytoplankton: f64,
    /// Grazers, never below 50.
    pub zooplankton: f64,
    /// Decomposers, never below 500.
    pub bacteria: f64,
}

impl Default for PopulationState {
    fn default() -> Self {
        Self::baseline()
    }
}

impl PopulationState {
    pub fn baseline() -> Self {
        Self {
            phytoplankton: baseline::PHYTOPLANKTON,
            zooplankton: baseline::ZOOPLANKTON,
            bacteria: baseline::BACTERIA,
        }
    }

    pub fn total(&self) -> f64 {
        self.phytoplankton + self.zooplankton + self.bacteria
    }

    /// Whether every group sits at or above its floor.
    pub fn respects_floors(&self) -> bool {
        self.phytoplankton >= floors::PHYTOPLANKTON
            && self.zooplankton >= floors::ZOOPLANKTON
            && self.bacteria >= floors::BACTERIA
    }
}

/// Everything the dynamics read: week, drivers, and populations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EcosystemState {
    pub week: u32,
    pub parameters: EnvironmentalParameters,
    pub populations: PopulationState,
}

/// Environmental growth multipliers derived from the drivers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthFactors {
    /// `1 − |T − 20| / 30`. Goes negative far from the optimum (thermal stress).
    pub temperature: f64,
    pub nutrients: f64,
    pub light: f64,
}

impl GrowthFactors {
    pub fn from_parameters(params: &EnvironmentalParameters) -> Self {
        Self {
            temperature: 1.0 - (params.temperature - OPTIMAL_TEMPERATURE).abs() / 30.0,
            nutrients: params.nutrients / 100.0,
            light: params.light / 100.0,
        }
    }
}

/// Dynamics coefficients.
mod rates {
    pub const PHYTO_NUTRIENT_WEIGHT: f64 = 0.3;
    pub const PHYTO_LIGHT_WEIGHT: f64 = 0.2;
    pub const PHYTO_TEMP_WEIGHT: f64 = 0.1;
    pub const PHYTO_GROWTH_SCALE: f64 = 0.1;
    pub const GRAZING_PER_ZOOPLANKTON: f64 = 0.1;

    pub const ZOO_FOOD_REFERENCE: f64 = 5000.0;
    pub const ZOO_FOOD_GAIN: f64 = 0.15;
    pub const ZOO_MORTALITY: f64 = 0.08;

    pub const BACT_TEMP_WEIGHT: f64 = 0.12;
    pub const BACT_NUTRIENT_WEIGHT: f64 = 0.1;
    pub const BACT_GROWTH_SCALE: f64 = 0.1;
    pub const BACT_MORTALITY: f64 = 0.02;

    pub const NUTRIENT_UPTAKE_PER_PHYTO: f64 = 0.0001;
    pub const NUTRIENT_REGENERATION: f64 = 0.5;
}

/// Advance the ecosystem by one application of the weekly dynamics.
///
/// The dynamics run exactly once regardless of `weeks_advanced`; only the
/// week counter moves by `weeks_advanced`.
pub fn step(state: &EcosystemState, weeks_advanced: u32) -> EcosystemState {
    use rates::*;

    let factors = GrowthFactors::from_parameters(&state.parameters);
    let pop = &state.populations;

    // 1. Producers, grazed by the pre-step zooplankton stock
    let phyto_growth = (PHYTO_NUTRIENT_WEIGHT * factors.nutrients
        + PHYTO_LIGHT_WEIGHT * factors.light
        + PHYTO_TEMP_WEIGHT * factors.temperature)
        * PHYTO_GROWTH_SCALE;
    let phytoplankton = (pop.phytoplankton * (1.0 + phyto_growth)
        - pop.zooplankton * GRAZING_PER_ZOOPLANKTON)
        .max(floors::PHYTOPLANKTON);

    // 2. Grazers, fed by the updated producer stock
    let zooplankton = (pop.zooplankton
        * (1.0 + (phytoplankton / ZOO_FOOD_REFERENCE) * ZOO_FOOD_GAIN - ZOO_MORTALITY))
        .max(floors::ZOOPLANKTON);

    // 3. Decomposers
    let bacteria = (pop.bacteria
        * (1.0
            + (BACT_TEMP_WEIGHT * factors.temperature
                + BACT_NUTRIENT_WEIGHT * factors.nutrients)
                * BACT_GROWTH_SCALE
            - BACT_MORTALITY))
        .max(floors::BACTERIA);

    // 4. Uptake first, then regeneration
    let after_uptake =
        (state.parameters.nutrients - phytoplankton * NUTRIENT_UPTAKE_PER_PHYTO).max(0.0);
    let nutrients = bounds::NUTRIENTS.clamp(after_uptake + NUTRIENT_REGENERATION);

    EcosystemState {
        week: state.week.saturating_add(weeks_advanced),
        parameters: EnvironmentalParameters {
            nutrients,
            ..state.parameters
        },
        populations: PopulationState {
            phytoplankton,
            zooplankton,
            bacteria,
        },
    }
}
