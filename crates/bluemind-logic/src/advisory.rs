//! Rule-based management recommendations.
//!
//! Each rule inspects the current drivers, populations, or metrics and
//! contributes at most one [`Advisory`]. When no rule fires the result is
//! a single [`Advisory::ContinueMonitoring`].

use serde::{Deserialize, Serialize};

use crate::metrics::DerivedMetrics;
use crate::parameters::EnvironmentalParameters;
use crate::population::PopulationState;

/// Rule thresholds.
pub mod thresholds {
    pub const COLD_WATER: f64 = 15.0;
    pub const WARM_WATER: f64 = 25.0;
    pub const LOW_NUTRIENTS: f64 = 20.0;
    pub const HIGH_NUTRIENTS: f64 = 80.0;
    pub const LOW_PHYTOPLANKTON: f64 = 500.0;
    /// Grazers above this fraction of producers count as overgrazing.
    pub const OVERGRAZING_RATIO: f64 = 0.8;
    pub const ACIDIFICATION_PH: f64 = 7.8;
    pub const HYPOXIA_OXYGEN: f64 = 5.0;
    pub const HEALTHY_SCORE: f64 = 80.0;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Advisory {
    ColdWater,
    WarmWater,
    NutrientLimited,
    BloomRisk,
    LowProducers,
    Overgrazing,
    Acidification,
    Hypoxia,
    Healthy,
    ContinueMonitoring,
}

impl Advisory {
    pub fn message(self) -> &'static str {
        match self {
            Self::ColdWater => "Temperature is low - monitor for cold-adapted species",
            Self::WarmWater => "High temperature detected - increased risk of thermal stress",
            Self::NutrientLimited => "Low nutrient levels - phytoplankton growth may be limited",
            Self::BloomRisk => "High nutrients - monitor for harmful algal blooms",
            Self::LowProducers => "Low phytoplankton - increase light and nutrients",
            Self::Overgrazing => "Overgrazing detected - zooplankton population too high",
            Self::Acidification => "Acidification detected - consider alkalinity enhancement",
            Self::Hypoxia => "Low oxygen - risk of hypoxic conditions",
            Self::Healthy => "Ecosystem is healthy - maintain current conditions",
            Self::ContinueMonitoring => "Continue monitoring ecosystem parameters",
        }
    }
}

pub fn recommendations(
    params: &EnvironmentalParameters,
    pop: &PopulationState,
    metrics: &DerivedMetrics,
) -> Vec<Advisory> {
    use thresholds::*;

    let mut out = Vec::new();

    if params.temperature < COLD_WATER {
        out.push(Advisory::ColdWater);
    } else if params.temperature > WARM_WATER {
        out.push(Advisory::WarmWater);
    }

    if params.nutrients < LOW_NUTRIENTS {
        out.push(Advisory::NutrientLimited);
    } else if params.nutrients > HIGH_NUTRIENTS {
        out.push(Advisory::BloomRisk);
    }

    if pop.phytoplankton < LOW_PHYTOPLANKTON {
        out.push(Advisory::LowProducers);
    }
    if pop.zooplankton > pop.phytoplankton * OVERGRAZING_RATIO {
        out.push(Advisory::Overgrazing);
    }

    if metrics.ph < ACIDIFICATION_PH {
        out.push(Advisory::Acidification);
    }
    if metrics.dissolved_oxygen < HYPOXIA_OXYGEN {
        out.push(Advisory::Hypoxia);
    }

    if metrics.ecosystem_health_score > HEALTHY_SCORE {
        out.push(Advisory::Healthy);
    }

    if out.is_empty() {
        out.push(Advisory::ContinueMonitoring);
    }
    out
}
