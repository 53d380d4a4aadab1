//! Pure simulation logic for BlueMind.
//!
//! This crate contains the ocean microbiome engine independent of any
//! record store, transport, or UI. Functions take plain data and return
//! results, making them unit-testable and portable across the stateful
//! host (`bluemind-server`), the headless harness, and any future consumer.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`advisory`] | Rule-based management recommendations from current state |
//! | [`constants`] | Parameter bounds, population floors, baseline values |
//! | [`forecast`] | Read-only projection of future weeks |
//! | [`history`] | Append-only log of pre-step snapshots |
//! | [`metrics`] | Derived chemistry, carbon, biodiversity and health indices |
//! | [`parameters`] | Environmental drivers and clamped partial updates |
//! | [`population`] | Weekly phytoplankton / zooplankton / bacteria dynamics |
//! | [`record`] | Simulation record and snapshot data model |
//! | [`sensors`] | Seedable buoy sensor reading generator |
//! | [`settings`] | JSON-backed engine and harness settings with validation |

pub mod advisory;
pub mod constants;
pub mod forecast;
pub mod history;
pub mod metrics;
pub mod parameters;
pub mod population;
pub mod record;
pub mod sensors;
pub mod settings;

pub use history::HistoryLog;
pub use metrics::DerivedMetrics;
pub use parameters::{EnvironmentalParameters, ParameterUpdate};
pub use population::{EcosystemState, PopulationState};
pub use record::{RecordId, SimulationRecord, SimulationSnapshot};
