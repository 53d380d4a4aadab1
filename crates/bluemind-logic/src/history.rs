//! Append-only log of pre-step snapshots.
//!
//! Snapshots are appended in ascending week order and never mutated once
//! stored. The log is a plain materialized sequence: it can be listed any
//! number of times and cleared by [`HistoryLog::reset`].

use serde::{Deserialize, Serialize};

use crate::record::SimulationSnapshot;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    snapshots: Vec<SimulationSnapshot>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, snapshot: SimulationSnapshot) {
        self.snapshots.push(snapshot);
    }

    /// Snapshots in insertion order.
    pub fn list(&self) -> &[SimulationSnapshot] {
        &self.snapshots
    }

    pub fn reset(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn last(&self) -> Option<&SimulationSnapshot> {
        self.snapshots.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SimulationSnapshot> {
        self.snapshots.iter()
    }
}

impl<'a> IntoIterator for &'a HistoryLog {
    type Item = &'a SimulationSnapshot;
    type IntoIter = std::slice::Iter<'a, SimulationSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::EcosystemState;

    fn snapshot_at(week: u32) -> SimulationSnapshot {
        SimulationSnapshot::capture(&EcosystemState {
            week,
            ..Default::default()
        })
    }

    #[test]
    fn test_append_preserves_order() {
        let mut log = HistoryLog::new();
        for week in 0..5 {
            log.append(snapshot_at(week));
        }
        let weeks: Vec<u32> = log.iter().map(|s| s.week).collect();
        assert_eq!(weeks, vec![0, 1, 2, 3, 4]);
        assert_eq!(log.len(), 5);
        assert_eq!(log.last().map(|s| s.week), Some(4));
    }

    #[test]
    fn test_list_is_restartable() {
        let mut log = HistoryLog::new();
        log.append(snapshot_at(0));
        log.append(snapshot_at(1));
        assert_eq!(log.list(), log.list());
        assert_eq!((&log).into_iter().count(), 2);
        assert_eq!((&log).into_iter().count(), 2);
    }

    #[test]
    fn test_reset_clears() {
        let mut log = HistoryLog::new();
        log.append(snapshot_at(0));
        log.reset();
        assert!(log.is_empty());
        log.reset();
        assert!(log.is_empty());
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let mut log = HistoryLog::new();
        log.append(snapshot_at(3));
        let json = serde_json::to_value(&log).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["week"], 3);
    }
}
