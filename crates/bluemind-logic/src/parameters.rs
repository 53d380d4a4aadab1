//! Environmental drivers and their clamped updates.
//!
//! The four drivers are always held inside their bounds. Out-of-range
//! input is normalized by clamping and never rejected, so every update
//! succeeds.
//!
//! ```
//! use bluemind_logic::parameters::{set_parameters, EnvironmentalParameters, ParameterUpdate};
//!
//! let current = EnvironmentalParameters::default();
//! let next = set_parameters(
//!     &current,
//!     &ParameterUpdate {
//!         temperature: Some(1000.0),
//!         ..Default::default()
//!     },
//! );
//! assert_eq!(next.temperature, 35.0);
//! assert_eq!(next.light, current.light);
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{baseline, bounds, Bounds};

/// The four externally controlled drivers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalParameters {
    /// Water temperature in °C, within [0, 35].
    pub temperature: f64,
    /// Nutrient saturation in percent, within [0, 100].
    pub nutrients: f64,
    /// Light as percent of surface irradiance, within [0, 100].
    pub light: f64,
    /// Salinity in PSU, within [30, 40].
    pub salinity: f64,
}

impl Default for EnvironmentalParameters {
    fn default() -> Self {
        Self {
            temperature: baseline::TEMPERATURE,
            nutrients: baseline::NUTRIENTS,
            light: baseline::LIGHT,
            salinity: baseline::SALINITY,
        }
    }
}

impl EnvironmentalParameters {
    /// Build a parameter set, clamping every field into its bounds.
    pub fn new(temperature: f64, nutrients: f64, light: f64, salinity: f64) -> Self {
        set_parameters(
            &Self::default(),
            &ParameterUpdate {
                temperature: Some(temperature),
                nutrients: Some(nutrients),
                light: Some(light),
                salinity: Some(salinity),
            },
        )
    }

    /// Whether every field lies inside its bounds.
    pub fn is_within_bounds(&self) -> bool {
        bounds::TEMPERATURE.contains(self.temperature)
            && bounds::NUTRIENTS.contains(self.nutrients)
            && bounds::LIGHT.contains(self.light)
            && bounds::SALINITY.contains(self.salinity)
    }
}

/// A partial update: `None` fields are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterUpdate {
    pub temperature: Option<f64>,
    pub nutrients: Option<f64>,
    pub light: Option<f64>,
    pub salinity: Option<f64>,
}

impl ParameterUpdate {
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.nutrients.is_none()
            && self.light.is_none()
            && self.salinity.is_none()
    }
}

/// Apply a partial update, clamping each provided field into its bounds.
///
/// NaN values are treated as "not provided" so the field keeps its
/// current value; infinities clamp to the nearest bound.
pub fn set_parameters(
    current: &EnvironmentalParameters,
    update: &ParameterUpdate,
) -> EnvironmentalParameters {
    EnvironmentalParameters {
        temperature: apply(current.temperature, update.temperature, bounds::TEMPERATURE),
        nutrients: apply(current.nutrients, update.nutrients, bounds::NUTRIENTS),
        light: apply(current.light, update.light, bounds::LIGHT),
        salinity: apply(current.salinity, update.salinity, bounds::SALINITY),
    }
}

fn apply(current: f64, requested: Option<f64>, range: Bounds) -> f64 {
    match requested {
        Some(value) if !value.is_nan() => range.clamp(value),
        _ => current,
    }
}
