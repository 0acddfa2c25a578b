//! dreamshape-storage
//!
//! Local key→JSON persistence and the remote table store.

pub mod error;
pub mod local;
pub mod memory;
pub mod remote;
pub mod rest;
pub mod rows;
