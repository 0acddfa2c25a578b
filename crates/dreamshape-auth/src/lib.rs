//! dreamshape-auth
//!
//! Email/password authentication against the hosted backend.

pub mod client;
pub mod error;
pub mod flows;
pub mod session;
