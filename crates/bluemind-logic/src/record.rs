//! Simulation record and snapshot data model.
//!
//! A [`SimulationRecord`] is the unit a record store holds. It only
//! changes through clamped parameter updates, a population step, or a
//! reset; see [`SimulationRecord::apply_parameters`],
//! [`SimulationRecord::advance`] and [`SimulationRecord::reset`].

use serde::{Deserialize, Serialize};

use crate::history::HistoryLog;
use crate::metrics::{self, DerivedMetrics};
use crate::parameters::{set_parameters, EnvironmentalParameters, ParameterUpdate};
use crate::population::{self, EcosystemState, PopulationState};

/// Store-assigned record identity.
pub type RecordId = u64;

/// Immutable capture of one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub week: u32,
    pub parameters: EnvironmentalParameters,
    pub populations: PopulationState,
    pub metrics: DerivedMetrics,
}

impl SimulationSnapshot {
    /// Capture a state together with the metrics it produces.
    pub fn capture(state: &EcosystemState) -> Self {
        Self {
            week: state.week,
            parameters: state.parameters,
            populations: state.populations,
            metrics: metrics::compute(&state.parameters, &state.populations),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    /// Zero until a store assigns one.
    pub id: RecordId,
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    /// Never decreases except through [`SimulationRecord::reset`].
    pub week: u32,
    pub parameters: EnvironmentalParameters,
    pub populations: PopulationState,
    pub metrics: DerivedMetrics,
    pub history: HistoryLog,
}

impl SimulationRecord {
    /// A fresh record at week 0 with baseline populations.
    ///
    /// The initial parameters are clamped before use.
    pub fn new(owner: impl Into<String>, name: impl Into<String>, initial: EnvironmentalParameters) -> Self {
        let parameters = EnvironmentalParameters::new(
            initial.temperature,
            initial.nutrients,
            initial.light,
            initial.salinity,
        );
        let populations = PopulationState::baseline();
        Self {
            id: 0,
            owner: owner.into(),
            name: name.into(),
            description: None,
            week: 0,
            parameters,
            populations,
            metrics: metrics::compute(&parameters, &populations),
            history: HistoryLog::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn state(&self) -> EcosystemState {
        EcosystemState {
            week: self.week,
            parameters: self.parameters,
            populations: self.populations,
        }
    }

    /// Snapshot of the current week, using the stored metrics.
    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            week: self.week,
            parameters: self.parameters,
            populations: self.populations,
            metrics: self.metrics,
        }
    }

    /// Clamp and apply a partial parameter update; populations stay put.
    pub fn apply_parameters(&mut self, update: &ParameterUpdate) {
        self.parameters = set_parameters(&self.parameters, update);
        self.recompute_metrics();
    }

    /// Record the pre-step snapshot, run the dynamics once, and move the
    /// week counter by `weeks`.
    pub fn advance(&mut self, weeks: u32) {
        self.history.append(self.snapshot());
        let next = population::step(&self.state(), weeks);
        self.week = next.week;
        self.parameters = next.parameters;
        self.populations = next.populations;
        self.recompute_metrics();
    }

    /// Back to week 0, baseline populations, empty history. Parameters are kept.
    pub fn reset(&mut self) {
        self.week = 0;
        self.populations = PopulationState::baseline();
        self.history.reset();
        self.recompute_metrics();
    }

    fn recompute_metrics(&mut self) {
        self.metrics = metrics::compute(&self.parameters, &self.populations);
    }
}
