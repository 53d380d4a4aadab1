//! Read-only projection of future weeks.
//!
//! Runs the weekly dynamics forward from a state without touching any
//! record. Each projected week applies the dynamics once and advances the
//! week counter by one. Horizons longer than [`MAX_WEEKS`] are cut to it.

use crate::constants::MAX_WEEKS;
use crate::population::{self, EcosystemState};
use crate::record::SimulationSnapshot;

/// Project `weeks_ahead` weeks from `state`, returning post-step snapshots
/// numbered from `state.week + 1`.
pub fn forecast(state: &EcosystemState, weeks_ahead: u32) -> Vec<SimulationSnapshot> {
    let mut current = *state;
    (0..weeks_ahead.min(MAX_WEEKS))
        .map(|_| {
            current = population::step(&current, 1);
            SimulationSnapshot::capture(&current)
        })
        .collect()
}
