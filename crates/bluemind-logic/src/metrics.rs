//! Derived ecosystem indices.
//!
//! Metrics are always recomputed from a state and never mutated
//! incrementally. Every index is clamped into its documented range.

use serde::{Deserialize, Serialize};

use crate::constants::{bounds, OPTIMAL_TEMPERATURE, REFERENCE_CARRYING_CAPACITY};
use crate::parameters::EnvironmentalParameters;
use crate::population::PopulationState;

/// Indices derived from drivers and populations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Acidity, within [7, 9].
    pub ph: f64,
    /// Dissolved oxygen in mg/L, within [4, 12].
    pub dissolved_oxygen: f64,
    /// Carbon sequestration rate, never negative.
    pub carbon_sequestration_rate: f64,
    /// Evenness around an equal one-third split, within [0, 1].
    pub biodiversity_index: f64,
    /// Composite health score, within [0, 100].
    pub ecosystem_health_score: f64,
}

/// Target share for each of the three groups.
const EVEN_SHARE: f64 = 0.33;

pub fn compute(params: &EnvironmentalParameters, pop: &PopulationState) -> DerivedMetrics {
    DerivedMetrics {
        ph: ph(params),
        dissolved_oxygen: dissolved_oxygen(params),
        carbon_sequestration_rate: carbon_sequestration_rate(params, pop),
        biodiversity_index: biodiversity_index(pop),
        ecosystem_health_score: ecosystem_health_score(params, pop),
    }
}

pub fn ph(params: &EnvironmentalParameters) -> f64 {
    bounds::PH.clamp(
        8.2 - (params.temperature - OPTIMAL_TEMPERATURE) * 0.01 + (params.salinity - 35.0) * 0.02,
    )
}

pub fn dissolved_oxygen(params: &EnvironmentalParameters) -> f64 {
    bounds::DISSOLVED_OXYGEN.clamp(8.0 - (params.temperature - 10.0) * 0.15)
}

pub fn carbon_sequestration_rate(params: &EnvironmentalParameters, pop: &PopulationState) -> f64 {
    ((pop.phytoplankton / 1000.0) * (params.nutrients / 100.0) * 10.0).max(0.0)
}

pub fn biodiversity_index(pop: &PopulationState) -> f64 {
    let total = pop.total();
    if total <= 0.0 {
        return 0.0;
    }
    let deviation = [pop.phytoplankton, pop.zooplankton, pop.bacteria]
        .iter()
        .map(|count| (EVEN_SHARE - count / total).abs())
        .sum::<f64>();
    bounds::BIODIVERSITY.clamp(1.0 - deviation)
}

pub fn ecosystem_health_score(params: &EnvironmentalParameters, pop: &PopulationState) -> f64 {
    let thermal = 100.0 - (params.temperature - OPTIMAL_TEMPERATURE).abs() * 3.0;
    let abundance = (pop.total() / REFERENCE_CARRYING_CAPACITY * 100.0).min(100.0);
    bounds::HEALTH_SCORE.clamp((thermal + params.nutrients + abundance) / 3.0)
}

impl DerivedMetrics {
    /// Whether every index lies inside its documented range.
    pub fn is_within_bounds(&self) -> bool {
        bounds::PH.contains(self.ph)
            && bounds::DISSOLVED_OXYGEN.contains(self.dissolved_oxygen)
            && self.carbon_sequestration_rate >= 0.0
            && bounds::BIODIVERSITY.contains(self.biodiversity_index)
            && bounds::HEALTH_SCORE.contains(self.ecosystem_health_score)
    }
}
