//! Fixed bounds, floors, and baseline values shared across the engine.

/// Inclusive `[min, max]` range for a single environmental driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Environmental driver bounds.
pub mod bounds {
    use super::Bounds;

    /// Water temperature in °C.
    pub const TEMPERATURE: Bounds = Bounds::new(0.0, 35.0);
    /// Nutrient saturation in percent.
    pub const NUTRIENTS: Bounds = Bounds::new(0.0, 100.0);
    /// Light as percent of surface irradiance.
    pub const LIGHT: Bounds = Bounds::new(0.0, 100.0);
    /// Salinity in PSU.
    pub const SALINITY: Bounds = Bounds::new(30.0, 40.0);

    /// Derived pH range.
    pub const PH: Bounds = Bounds::new(7.0, 9.0);
    /// Derived dissolved oxygen range in mg/L.
    pub const DISSOLVED_OXYGEN: Bounds = Bounds::new(4.0, 12.0);
    pub const BIODIVERSITY: Bounds = Bounds::new(0.0, 1.0);
    pub const HEALTH_SCORE: Bounds = Bounds::new(0.0, 100.0);
}

/// Species floors enforced after every step.
pub mod floors {
    pub const PHYTOPLANKTON: f64 = 100.0;
    pub const ZOOPLANKTON: f64 = 50.0;
    pub const BACTERIA: f64 = 500.0;
}

/// Values a new or reset record starts from.
pub mod baseline {
    pub const PHYTOPLANKTON: f64 = 1000.0;
    pub const ZOOPLANKTON: f64 = 500.0;
    pub const BACTERIA: f64 = 2000.0;

    pub const TEMPERATURE: f64 = 20.0;
    pub const NUTRIENTS: f64 = 50.0;
    pub const LIGHT: f64 = 75.0;
    pub const SALINITY: f64 = 35.0;
}

/// Upper limit on weeks a single run or forecast may cover.
pub const MAX_WEEKS: u32 = 520;

/// Thermal optimum for growth, °C.
pub const OPTIMAL_TEMPERATURE: f64 = 20.0;

/// Reference total population treated as full carrying capacity by the
/// health score.
pub const REFERENCE_CARRYING_CAPACITY: f64 = 5000.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_clamp() {
        assert_eq!(bounds::TEMPERATURE.clamp(1000.0), 35.0);
        assert_eq!(bounds::TEMPERATURE.clamp(-5.0), 0.0);
        assert_eq!(bounds::SALINITY.clamp(12.0), 30.0);
        assert_eq!(bounds::LIGHT.clamp(42.0), 42.0);
    }

    #[test]
    fn test_baseline_within_bounds() {
        assert!(bounds::TEMPERATURE.contains(baseline::TEMPERATURE));
        assert!(bounds::NUTRIENTS.contains(baseline::NUTRIENTS));
        assert!(bounds::LIGHT.contains(baseline::LIGHT));
        assert!(bounds::SALINITY.contains(baseline::SALINITY));
        assert!(baseline::PHYTOPLANKTON >= floors::PHYTOPLANKTON);
        assert!(baseline::ZOOPLANKTON >= floors::ZOOPLANKTON);
        assert!(baseline::BACTERIA >= floors::BACTERIA);
    }
}
