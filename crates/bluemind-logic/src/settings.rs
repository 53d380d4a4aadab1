//! Engine and harness settings.
//!
//! Settings are plain serde data loaded from JSON, with every field
//! defaulted so a partial file is enough. [`validate_settings`] returns a
//! list of human-readable problems instead of failing on the first one.
//!
//! ```
//! use bluemind_logic::settings::{validate_settings, SimulationSettings};
//!
//! let settings = SimulationSettings::from_json_str(r#"{"weeks": 12}"#).unwrap();
//! assert_eq!(settings.weeks, 12);
//! assert!(validate_settings(&settings).is_empty());
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::constants::MAX_WEEKS;
use crate::parameters::EnvironmentalParameters;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Owner recorded on records the harness creates.
    pub owner: String,
    /// Scenario preset name; see [`presets`].
    pub scenario: String,
    /// Explicit starting drivers. Overrides the preset when present.
    pub initial_parameters: Option<EnvironmentalParameters>,
    /// Number of step calls the harness drives.
    pub weeks: u32,
    /// Week increment passed to each step call.
    pub weeks_per_step: u32,
    /// Horizon for forecasts.
    pub forecast_weeks: u32,
    /// Seed for sensor readings. `None` draws from entropy.
    pub sensor_seed: Option<u64>,
    pub sensor_latitude: f64,
    pub sensor_depth: f64,
    /// Write the record store here after the run.
    pub store_path: Option<PathBuf>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            owner: "local".to_string(),
            scenario: "baseline".to_string(),
            initial_parameters: None,
            weeks: 52,
            weeks_per_step: 1,
            forecast_weeks: 4,
            sensor_seed: Some(42),
            sensor_latitude: 35.0,
            sensor_depth: 0.0,
            store_path: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read settings from {path:?}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid settings: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl SimulationSettings {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load and validate settings from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&contents)?;
        let errors = validate_settings(&settings);
        if errors.is_empty() {
            Ok(settings)
        } else {
            Err(SettingsError::Invalid(errors))
        }
    }

    /// Starting drivers: the explicit override, else the named preset.
    pub fn resolved_parameters(&self) -> EnvironmentalParameters {
        self.initial_parameters
            .or_else(|| preset(&self.scenario).map(|p| p.parameters))
            .unwrap_or_default()
    }
}

/// Named starting conditions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioPreset {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: EnvironmentalParameters,
}

pub fn presets() -> Vec<ScenarioPreset> {
    vec![
        ScenarioPreset {
            name: "baseline",
            description: "Temperate coastal water at the thermal optimum.",
            parameters: EnvironmentalParameters::default(),
        },
        ScenarioPreset {
            name: "warming",
            description: "Marine heatwave: warm, well-lit, moderately fed water.",
            parameters: EnvironmentalParameters {
                temperature: 30.0,
                nutrients: 45.0,
                light: 85.0,
                salinity: 36.0,
            },
        },
        ScenarioPreset {
            name: "eutrophication",
            description: "Runoff-fed estuary with excess nutrients and brackish water.",
            parameters: EnvironmentalParameters {
                temperature: 22.0,
                nutrients: 90.0,
                light: 60.0,
                salinity: 31.0,
            },
        },
        ScenarioPreset {
            name: "oligotrophic",
            description: "Nutrient-poor open ocean gyre.",
            parameters: EnvironmentalParameters {
                temperature: 24.0,
                nutrients: 8.0,
                light: 95.0,
                salinity: 37.0,
            },
        },
        ScenarioPreset {
            name: "polar",
            description: "Cold, dim high-latitude water.",
            parameters: EnvironmentalParameters {
                temperature: 2.0,
                nutrients: 70.0,
                light: 25.0,
                salinity: 34.0,
            },
        },
    ]
}

pub fn preset(name: &str) -> Option<ScenarioPreset> {
    presets().into_iter().find(|p| p.name == name)
}

/// Validate settings. Returns an empty list when everything is usable.
pub fn validate_settings(settings: &SimulationSettings) -> Vec<String> {
    let mut errors = Vec::new();

    if settings.owner.trim().is_empty() {
        errors.push("owner must not be empty".to_string());
    }
    if settings.initial_parameters.is_none() && preset(&settings.scenario).is_none() {
        errors.push(format!("unknown scenario `{}`", settings.scenario));
    }
    if let Some(p) = &settings.initial_parameters {
        if !p.is_within_bounds() {
            errors.push(format!(
                "initial parameters out of bounds (will be clamped): {:?}",
                p
            ));
        }
    }
    if settings.weeks > MAX_WEEKS {
        errors.push(format!("weeks {} exceeds maximum {}", settings.weeks, MAX_WEEKS));
    }
    if settings.weeks_per_step == 0 {
        errors.push("weeks_per_step must be at least 1".to_string());
    }
    if settings.forecast_weeks > MAX_WEEKS {
        errors.push(format!(
            "forecast_weeks {} exceeds maximum {}",
            settings.forecast_weeks, MAX_WEEKS
        ));
    }
    if !(-90.0..=90.0).contains(&settings.sensor_latitude) {
        errors.push(format!("sensor_latitude {} outside [-90, 90]", settings.sensor_latitude));
    }
    if settings.sensor_depth < 0.0 {
        errors.push("sensor_depth must not be negative".to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_valid() {
        assert!(validate_settings(&SimulationSettings::default()).is_empty());
    }

    #[test]
    fn test_unknown_scenario_rejected() {
        let s = SimulationSettings {
            scenario: "abyssal".to_string(),
            ..Default::default()
        };
        let errors = validate_settings(&s);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("abyssal"));
    }

    #[test]
    fn test_collects_multiple_errors() {
        let s = SimulationSettings {
            owner: " ".to_string(),
            weeks: MAX_WEEKS + 1,
            weeks_per_step: 0,
            sensor_depth: -1.0,
            ..Default::default()
        };
        assert_eq!(validate_settings(&s).len(), 4);
    }

    #[test]
    fn test_explicit_parameters_override_preset() {
        let params = EnvironmentalParameters {
            temperature: 10.0,
            nutrients: 20.0,
            light: 30.0,
            salinity: 33.0,
        };
        let s = SimulationSettings {
            scenario: "warming".to_string(),
            initial_parameters: Some(params),
            ..Default::default()
        };
        assert_eq!(s.resolved_parameters(), params);
    }

    #[test]
    fn test_preset_resolution() {
        let s = SimulationSettings {
            scenario: "polar".to_string(),
            ..Default::default()
        };
        assert_eq!(s.resolved_parameters().temperature, 2.0);
    }

    #[test]
    fn test_presets_within_bounds_and_unique() {
        let all = presets();
        for p in &all {
            assert!(p.parameters.is_within_bounds(), "{} out of bounds", p.name);
        }
        let mut names: Vec<_> = all.iter().map(|p| p.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), all.len());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = SimulationSettings::from_json_str(r#"{"scenario": "warming", "sensor_seed": null}"#)
            .unwrap();
        assert_eq!(s.scenario, "warming");
        assert_eq!(s.sensor_seed, None);
        assert_eq!(s.weeks, 52);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = SimulationSettings::from_file(Path::new("/nonexistent/bluemind.json")).unwrap_err();
        assert!(matches!(err, SettingsError::ReadFailed { .. }));
        assert!(err.to_string().contains("bluemind.json"));
    }
}
