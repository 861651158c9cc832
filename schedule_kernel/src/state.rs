//! Schedule kernel — Model State
//!
//! The whole mutable model: people and rooms. Cloning a `Schedule`
//! yields a fully independent deep copy, since every cross-reference
//! is a key rather than a pointer.

use crate::domain::{Meeting, Person, Room};
use crate::error::ScheduleError;
use crate::registry::{PersonRegistry, RoomRegistry};
use crate::values::{MeetingTime, RoomNumber};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    pub(crate) people: PersonRegistry,
    pub(crate) rooms: RoomRegistry,
}

/// One of a person's commitments joined with its meeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitmentView<'a> {
    pub room: RoomNumber,
    pub time: MeetingTime,
    pub topic: &'a str,
}

impl Schedule {
    /// Create a fresh, empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn people(&self) -> &PersonRegistry {
        &self.people
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    pub fn person(&self, lastname: &str) -> Result<&Person, ScheduleError> {
        self.people.find(lastname)
    }

    pub fn room(&self, room: RoomNumber) -> Result<&Room, ScheduleError> {
        self.rooms.find(room)
    }

    pub fn meeting(&self, room: RoomNumber, time: MeetingTime) -> Result<&Meeting, ScheduleError> {
        self.rooms.find(room)?.get_meeting(time)
    }

    /// A person's commitments with meeting topics, by room then time.
    pub fn commitments_of(&self, lastname: &str) -> Result<Vec<CommitmentView<'_>>, ScheduleError> {
        let person = self.people.find(lastname)?;
        person
            .commitments()
            .map(|(room, time)| {
                let meeting = self.meeting(room, time)?;
                Ok(CommitmentView {
                    room,
                    time,
                    topic: meeting.topic(),
                })
            })
            .collect()
    }

    pub fn person_count(&self) -> usize {
        self.people.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn meeting_count(&self) -> usize {
        self.rooms.meeting_count()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.rooms.is_empty()
    }
}
