#![forbid(unsafe_code)]

//! Schedule runtime — persistence and sessions around the kernel.
//!
//! Saves and loads the flat text snapshot format, guards loads with
//! an in-memory snapshot so a failed load changes nothing, and keeps
//! a configured session over one live schedule.
//!
//! No scheduling rules live here; every mutation goes through the
//! kernel.

pub mod config;
pub mod error;
pub mod session;
pub mod snapshot;
pub mod snapshot_codec;
pub mod stats;
pub mod transaction;
