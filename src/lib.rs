//! Transit billing library
//!
//! Turns a month of tap-in/tap-out events into one capped charge per rider.
//! Exposes modules for integration testing and binary reuse.

pub mod domain;
pub mod infra;
pub mod io;
pub mod services;
