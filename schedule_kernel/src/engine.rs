//! Schedule kernel — Engine
//!
//! Top-level orchestrator. Delegates mutation to `operations`,
//! validates via `invariants` after every successful command.

use tracing::debug;

use crate::commands::Command;
use crate::error::ScheduleError;
use crate::invariants::validate_invariants;
use crate::operations::Reschedule;
use crate::state::Schedule;
use crate::values::{MeetingTime, RoomNumber};

/// What a successful command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    PersonAdded { lastname: String },
    PersonRemoved { lastname: String },
    RoomAdded { room: RoomNumber },
    RoomRemoved { room: RoomNumber, meetings: usize },
    MeetingAdded { room: RoomNumber, time: MeetingTime },
    MeetingRemoved { room: RoomNumber, time: MeetingTime },
    ParticipantAdded { lastname: String },
    ParticipantRemoved { lastname: String },
    Rescheduled { room: RoomNumber, time: MeetingTime },
    NoChange,
    ScheduleCleared { meetings: usize },
    PeopleCleared { people: usize },
    AllCleared,
}

/// Stateful engine owning the live schedule.
#[derive(Debug, Default)]
pub struct ScheduleEngine {
    schedule: Schedule,
    applied: u64,
}

impl ScheduleEngine {
    /// Create an engine over an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Number of commands applied successfully since creation.
    pub fn applied(&self) -> u64 {
        self.applied
    }

    /// Apply a single command:
    ///   1. Delegate to the schedule operation (rejections change nothing)
    ///   2. Validate invariants on the new state
    ///   3. Report the outcome
    pub fn apply(&mut self, command: &Command) -> Result<Outcome, ScheduleError> {
        let outcome = match self.dispatch(command) {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!(command = command.name(), error = %err, "command rejected");
                return Err(err);
            }
        };
        validate_invariants(&self.schedule);
        self.applied += 1;
        debug!(command = command.name(), ?outcome, "command applied");
        Ok(outcome)
    }

    /// Apply commands in order, stopping at the first rejection.
    pub fn apply_sequence(&mut self, commands: &[Command]) -> Result<Vec<Outcome>, ScheduleError> {
        commands.iter().map(|c| self.apply(c)).collect()
    }

    /// Swap in a whole new schedule, returning the previous one.
    /// The incoming schedule must satisfy every invariant.
    pub fn replace_schedule(&mut self, schedule: Schedule) -> Schedule {
        validate_invariants(&schedule);
        std::mem::replace(&mut self.schedule, schedule)
    }

    fn dispatch(&mut self, command: &Command) -> Result<Outcome, ScheduleError> {
        let s = &mut self.schedule;
        let outcome = match command {
            Command::AddPerson {
                firstname,
                lastname,
                phone,
            } => {
                s.add_person(firstname, lastname, phone)?;
                Outcome::PersonAdded {
                    lastname: lastname.clone(),
                }
            }
            Command::RemovePerson { lastname } => {
                s.remove_person(lastname)?;
                Outcome::PersonRemoved {
                    lastname: lastname.clone(),
                }
            }
            Command::AddRoom { room } => {
                s.add_room(*room)?;
                Outcome::RoomAdded { room: *room }
            }
            Command::RemoveRoom { room } => {
                let removed = s.remove_room(*room)?;
                Outcome::RoomRemoved {
                    room: *room,
                    meetings: removed.meeting_count(),
                }
            }
            Command::AddMeeting { room, time, topic } => {
                s.add_meeting(*room, *time, topic)?;
                Outcome::MeetingAdded {
                    room: *room,
                    time: *time,
                }
            }
            Command::RemoveMeeting { room, time } => {
                s.remove_meeting(*room, *time)?;
                Outcome::MeetingRemoved {
                    room: *room,
                    time: *time,
                }
            }
            Command::AddParticipant { room, time, lastname } => {
                s.add_participant(*room, *time, lastname)?;
                Outcome::ParticipantAdded {
                    lastname: lastname.clone(),
                }
            }
            Command::RemoveParticipant { room, time, lastname } => {
                s.remove_participant(*room, *time, lastname)?;
                Outcome::ParticipantRemoved {
                    lastname: lastname.clone(),
                }
            }
            Command::Reschedule {
                old_room,
                old_time,
                new_room,
                new_time,
            } => match s.reschedule(*old_room, *old_time, *new_room, *new_time)? {
                Reschedule::Unchanged => Outcome::NoChange,
                Reschedule::Moved { room, time } => Outcome::Rescheduled { room, time },
            },
            Command::ClearSchedule => Outcome::ScheduleCleared {
                meetings: s.clear_schedule(),
            },
            Command::ClearPeople => Outcome::PeopleCleared {
                people: s.clear_people()?,
            },
            Command::ClearAll => {
                s.clear_all();
                Outcome::AllCleared
            }
        };
        Ok(outcome)
    }
}
