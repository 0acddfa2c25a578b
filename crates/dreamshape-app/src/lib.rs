//! dreamshape-app library root.
//!
//! The controller, sync orchestration, timers and export live here so the
//! CLI and integration tests drive the same code.

pub mod config;
pub mod confirm;
pub mod error;
pub mod export;
pub mod sync;
pub mod timers;
pub mod tracker;
pub mod writer;
