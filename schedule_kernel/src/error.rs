//! Schedule kernel — Errors
//!
//! Every rejected operation reports one of these. A rejected operation
//! has performed no mutation.

use thiserror::Error;

use crate::values::{MeetingTime, RoomNumber};

/// Coarse classification of a [`ScheduleError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DuplicateKey,
    SlotTaken,
    AlreadyParticipant,
    NotParticipant,
    CommitmentConflict,
    StillReferenced,
    MeetingsScheduled,
    NotFound,
    InvalidValue,
}

impl ErrorKind {
    /// The validation-conflict family: the request was well-formed but
    /// would break a uniqueness or booking rule.
    pub fn is_conflict(self) -> bool {
        matches!(
            self,
            ErrorKind::DuplicateKey
                | ErrorKind::SlotTaken
                | ErrorKind::AlreadyParticipant
                | ErrorKind::NotParticipant
                | ErrorKind::CommitmentConflict
                | ErrorKind::StillReferenced
                | ErrorKind::MeetingsScheduled
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("There is already a person with last name {lastname}")]
    DuplicatePerson { lastname: String },

    #[error("There is already a room with number {room}")]
    DuplicateRoom { room: RoomNumber },

    #[error("Room {room} already has a meeting at {time}")]
    SlotTaken { room: RoomNumber, time: MeetingTime },

    #[error("{lastname} is already a participant in room {room} at {time}")]
    AlreadyParticipant {
        lastname: String,
        room: RoomNumber,
        time: MeetingTime,
    },

    #[error("{lastname} is not a participant in room {room} at {time}")]
    NotParticipant {
        lastname: String,
        room: RoomNumber,
        time: MeetingTime,
    },

    #[error("{lastname} is already committed at {time}")]
    CommitmentConflict { lastname: String, time: MeetingTime },

    #[error("{lastname} is a participant in a meeting")]
    StillReferenced { lastname: String },

    #[error("Cannot clear people while {meetings} meetings are scheduled")]
    MeetingsScheduled { meetings: usize },

    #[error("No person with last name {lastname}")]
    PersonNotFound { lastname: String },

    #[error("No room with number {room}")]
    RoomNotFound { room: RoomNumber },

    #[error("No meeting in room {room} at {time}")]
    MeetingNotFound { room: RoomNumber, time: MeetingTime },

    #[error("Time {raw} is not a workday slot")]
    InvalidTime { raw: i64 },

    #[error("Room number {raw} is not positive")]
    InvalidRoomNumber { raw: i64 },

    #[error("Invalid {field} {value:?}: must be a single token without whitespace")]
    InvalidToken { field: &'static str, value: String },
}

impl ScheduleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScheduleError::DuplicatePerson { .. } | ScheduleError::DuplicateRoom { .. } => {
                ErrorKind::DuplicateKey
            }
            ScheduleError::SlotTaken { .. } => ErrorKind::SlotTaken,
            ScheduleError::AlreadyParticipant { .. } => ErrorKind::AlreadyParticipant,
            ScheduleError::NotParticipant { .. } => ErrorKind::NotParticipant,
            ScheduleError::CommitmentConflict { .. } => ErrorKind::CommitmentConflict,
            ScheduleError::StillReferenced { .. } => ErrorKind::StillReferenced,
            ScheduleError::MeetingsScheduled { .. } => ErrorKind::MeetingsScheduled,
            ScheduleError::PersonNotFound { .. }
            | ScheduleError::RoomNotFound { .. }
            | ScheduleError::MeetingNotFound { .. } => ErrorKind::NotFound,
            ScheduleError::InvalidTime { .. }
            | ScheduleError::InvalidRoomNumber { .. }
            | ScheduleError::InvalidToken { .. } => ErrorKind::InvalidValue,
        }
    }
}
