//! dreamshape-core
//!
//! Pure domain types, validation, the exercise catalog, the active-workout
//! state machine and history statistics. No I/O: this is the shared
//! vocabulary of the DreamShape system.

pub mod catalog;
pub mod error;
pub mod history;
pub mod models;
pub mod session;
pub mod stats;
pub mod storage_keys;
