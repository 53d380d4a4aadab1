//! BlueMind Server - simulation record host
//!
//! Wraps the pure engine from `bluemind-logic` with an injected record
//! store. The controller is the only component that reads or writes
//! records; consumers read the serialized records it returns.
//!
//! Every mutating controller call takes `&mut self`, so writers against a
//! controller are serialized by construction. Share one across threads by
//! wrapping it in a `Mutex`.

mod persistence;
mod reducers;
mod tables;

pub use persistence::FileStore;
pub use reducers::{ControllerError, DashboardStats, SimulationController};
pub use tables::{InMemoryStore, RecordStore, StoreError};
