#![forbid(unsafe_code)]

//! Schedule kernel: rooms, meetings and people with commitment-conflict
//! enforcement. Pure in-memory model; persistence lives in the runtime.

/// Identity of the canonical model encoding. Bump on any change to the
/// canonical hash layout.
pub const KERNEL_VERSION: u32 = 1;

pub mod values;
pub mod error;
pub mod domain;
pub mod registry;
pub mod state;
pub mod operations;
pub mod invariants;
pub mod hashing;
pub mod commands;
pub mod engine;

pub use commands::Command;
pub use domain::{Meeting, Person, Room};
pub use engine::{Outcome, ScheduleEngine};
pub use error::{ErrorKind, ScheduleError};
pub use operations::Reschedule;
pub use state::Schedule;
pub use values::{MeetingTime, RoomNumber};
