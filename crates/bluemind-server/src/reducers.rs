//! Controller operations over simulation records.
//!
//! Each operation loads the record from the injected store, applies one
//! engine transition, and writes the result back. The only engine-level
//! failure is an unknown record id; any other store failure is passed
//! through unchanged and never retried here.

use bluemind_logic::advisory::{self, Advisory};
use bluemind_logic::forecast;
use bluemind_logic::{
    EnvironmentalParameters, ParameterUpdate, RecordId, SimulationRecord, SimulationSnapshot,
};
use serde::Serialize;
use thiserror::Error;

use crate::tables::{RecordStore, StoreError};

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("simulation {0} not found")]
    NotFound(RecordId),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ControllerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => ControllerError::NotFound(id),
            other => ControllerError::Store(other),
        }
    }
}

/// Per-owner totals across every stored simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_simulations: usize,
    /// Sum of each record's current carbon sequestration rate.
    pub total_carbon_sequestered: f64,
    /// Mean health score; 0 when the owner has no simulations.
    pub average_ecosystem_health: f64,
    pub total_microbe_populations: f64,
}

impl DashboardStats {
    pub fn from_records(records: &[SimulationRecord]) -> Self {
        let total_simulations = records.len();
        let health_sum: f64 = records
            .iter()
            .map(|r| r.metrics.ecosystem_health_score)
            .sum();
        Self {
            total_simulations,
            total_carbon_sequestered: records
                .iter()
                .map(|r| r.metrics.carbon_sequestration_rate)
                .sum(),
            average_ecosystem_health: if total_simulations == 0 {
                0.0
            } else {
                health_sum / total_simulations as f64
            },
            total_microbe_populations: records.iter().map(|r| r.populations.total()).sum(),
        }
    }
}

pub struct SimulationController<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> SimulationController<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Create a record at week 0 with baseline populations.
    pub fn create(
        &mut self,
        owner: &str,
        name: &str,
        initial: EnvironmentalParameters,
    ) -> Result<SimulationRecord, ControllerError> {
        let record = SimulationRecord::new(owner, name, initial);
        let id = self.store.insert(record)?;
        log::info!("Created simulation {} '{}' for {}", id, name, owner);
        Ok(self.store.get(id)?)
    }

    pub fn get(&self, id: RecordId) -> Result<SimulationRecord, ControllerError> {
        self.load(id)
    }

    pub fn list(&self, owner: &str) -> Result<Vec<SimulationRecord>, ControllerError> {
        Ok(self.store.list_by_owner(owner)?)
    }

    /// Clamp and apply new drivers; populations and history are unchanged.
    pub fn update_parameters(
        &mut self,
        id: RecordId,
        update: &ParameterUpdate,
    ) -> Result<SimulationRecord, ControllerError> {
        let mut record = self.load(id)?;
        record.apply_parameters(update);
        log::debug!("Simulation {} parameters now {:?}", id, record.parameters);
        self.save(record)
    }

    /// Snapshot the current week into history, apply the dynamics once,
    /// and move the week counter by `weeks`.
    pub fn step(&mut self, id: RecordId, weeks: u32) -> Result<SimulationRecord, ControllerError> {
        let mut record = self.load(id)?;
        record.advance(weeks);
        log::debug!(
            "Simulation {} week {}: phyto={:.2} zoo={:.2} bact={:.2} health={:.1}",
            id,
            record.week,
            record.populations.phytoplankton,
            record.populations.zooplankton,
            record.populations.bacteria,
            record.metrics.ecosystem_health_score
        );
        self.save(record)
    }

    /// Back to week 0 with baseline populations and empty history.
    /// Environmental parameters are left as they are.
    pub fn reset(&mut self, id: RecordId) -> Result<SimulationRecord, ControllerError> {
        let mut record = self.load(id)?;
        record.reset();
        log::info!("Reset simulation {}", id);
        self.save(record)
    }

    pub fn delete(&mut self, id: RecordId) -> Result<(), ControllerError> {
        self.store.delete(id)?;
        log::info!("Deleted simulation {}", id);
        Ok(())
    }

    /// Project future weeks without modifying the record.
    pub fn forecast(
        &self,
        id: RecordId,
        weeks_ahead: u32,
    ) -> Result<Vec<SimulationSnapshot>, ControllerError> {
        let record = self.load(id)?;
        Ok(forecast::forecast(&record.state(), weeks_ahead))
    }

    pub fn stats(&self, owner: &str) -> Result<DashboardStats, ControllerError> {
        let records = self.store.list_by_owner(owner)?;
        Ok(DashboardStats::from_records(&records))
    }

    pub fn recommendations(&self, id: RecordId) -> Result<Vec<Advisory>, ControllerError> {
        let record = self.load(id)?;
        Ok(advisory::recommendations(
            &record.parameters,
            &record.populations,
            &record.metrics,
        ))
    }

    fn load(&self, id: RecordId) -> Result<SimulationRecord, ControllerError> {
        self.store.get(id).map_err(|e| {
            if let StoreError::NotFound(_) = e {
                log::warn!("Simulation {} not found", id);
            }
            ControllerError::from(e)
        })
    }

    fn save(&mut self, record: SimulationRecord) -> Result<SimulationRecord, ControllerError> {
        self.store.update(record.id, record.clone())?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::InMemoryStore;
    use bluemind_logic::constants::MAX_WEEKS;

    fn controller() -> SimulationController<InMemoryStore> {
        SimulationController::new(InMemoryStore::new())
    }

    #[test]
    fn test_create_persists_record() {
        let mut c = controller();
        let r = c
            .create("lab", "bay", EnvironmentalParameters::default())
            .unwrap();
        assert_eq!(r.id, 1);
        assert_eq!(c.get(r.id).unwrap(), r);
    }

    #[test]
    fn test_unknown_id_is_not_found_everywhere() {
        let mut c = controller();
        assert!(matches!(c.get(5), Err(ControllerError::NotFound(5))));
        assert!(matches!(
            c.update_parameters(5, &ParameterUpdate::default()),
            Err(ControllerError::NotFound(5))
        ));
        assert!(matches!(c.step(5, 1), Err(ControllerError::NotFound(5))));
        assert!(matches!(c.reset(5), Err(ControllerError::NotFound(5))));
        assert!(matches!(c.forecast(5, 3), Err(ControllerError::NotFound(5))));
        assert!(matches!(c.delete(5), Err(ControllerError::NotFound(5))));
    }

    #[test]
    fn test_store_errors_pass_through() {
        let err: ControllerError = StoreError::VersionMismatch {
            expected: 1,
            found: 3,
        }
        .into();
        assert!(matches!(err, ControllerError::Store(_)));
        assert_eq!(
            err.to_string(),
            "store file version mismatch: expected 1, found 3"
        );
    }

    #[test]
    fn test_forecast_leaves_record_untouched() {
        let mut c = controller();
        let r = c
            .create("lab", "bay", EnvironmentalParameters::default())
            .unwrap();
        let projected = c.forecast(r.id, 4).unwrap();
        assert_eq!(projected.len(), 4);
        assert_eq!(c.get(r.id).unwrap(), r);
    }

    #[test]
    fn test_stats_for_owner_without_records() {
        let c = controller();
        assert_eq!(c.stats("nobody").unwrap(), DashboardStats::default());
    }

    #[test]
    fn test_forecast_horizon_is_capped() {
        let mut c = controller();
        let r = c
            .create("lab", "bay", EnvironmentalParameters::default())
            .unwrap();
        let projected = c.forecast(r.id, u32::MAX).unwrap();
        assert_eq!(projected.len(), MAX_WEEKS as usize);
    }

    #[test]
    fn test_recommendations_for_record() {
        let mut c = controller();
        let r = c
            .create(
                "lab",
                "hot",
                EnvironmentalParameters {
                    temperature: 33.0,
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(c
            .recommendations(r.id)
            .unwrap()
            .contains(&Advisory::WarmWater));
    }
}
