//! Schedule kernel — Composite Operations
//!
//! Every mutation that touches both sides of the commitment relation
//! lives here. Each operation checks everything it can before the
//! first write, so a rejected operation leaves the schedule unchanged.

use crate::domain::{Person, Room};
use crate::error::ScheduleError;
use crate::state::Schedule;
use crate::values::{MeetingTime, RoomNumber};

/// Result of a reschedule request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reschedule {
    /// Source and destination slot were the same.
    Unchanged,
    Moved { room: RoomNumber, time: MeetingTime },
}

impl Schedule {
    // -- people -------------------------------------------------------

    pub fn add_person(&mut self, firstname: &str, lastname: &str, phone: &str) -> Result<&Person, ScheduleError> {
        if self.people.contains(lastname) {
            return Err(ScheduleError::DuplicatePerson {
                lastname: lastname.to_string(),
            });
        }
        let person = Person::new(firstname, lastname, phone)?;
        self.insert_person(person)
    }

    /// Register an already constructed person. Commitments it carries
    /// are discarded: they only arise from meeting membership.
    pub fn insert_person(&mut self, mut person: Person) -> Result<&Person, ScheduleError> {
        person.clear_commitments();
        Ok(self.people.add(person)?)
    }

    /// Delete a person who attends no meeting in any room.
    pub fn remove_person(&mut self, lastname: &str) -> Result<Person, ScheduleError> {
        self.people.find(lastname)?;
        if self.rooms.is_participant_anywhere(lastname) {
            return Err(ScheduleError::StillReferenced {
                lastname: lastname.to_string(),
            });
        }
        self.people.remove(lastname)
    }

    /// Delete every person. Refused while any meeting exists.
    pub fn clear_people(&mut self) -> Result<usize, ScheduleError> {
        let meetings = self.rooms.meeting_count();
        if meetings > 0 {
            return Err(ScheduleError::MeetingsScheduled { meetings });
        }
        let removed = self.people.len();
        self.people.clear();
        Ok(removed)
    }

    // -- rooms --------------------------------------------------------

    pub fn add_room(&mut self, room: RoomNumber) -> Result<&Room, ScheduleError> {
        Ok(self.rooms.add(Room::new(room))?)
    }

    /// Delete a room with all its meetings, releasing every
    /// participant's commitments in that room.
    pub fn remove_room(&mut self, room: RoomNumber) -> Result<Room, ScheduleError> {
        let removed = self.rooms.remove(room)?;
        for person in self.people.iter_mut() {
            person.remove_room_commitments(room);
        }
        Ok(removed)
    }

    // -- meetings -----------------------------------------------------

    pub fn add_meeting(&mut self, room: RoomNumber, time: MeetingTime, topic: &str) -> Result<(), ScheduleError> {
        self.rooms.find_mut(room)?.add_meeting(time, topic)?;
        Ok(())
    }

    /// Delete a meeting and its participants' commitments.
    pub fn remove_meeting(&mut self, room: RoomNumber, time: MeetingTime) -> Result<(), ScheduleError> {
        let meeting = self.rooms.find_mut(room)?.remove_meeting(time)?;
        for lastname in meeting.participants() {
            if let Ok(person) = self.people.find_mut(lastname) {
                person.remove_commitment(room, time);
            }
        }
        Ok(())
    }

    pub fn add_participant(&mut self, room: RoomNumber, time: MeetingTime, lastname: &str) -> Result<(), ScheduleError> {
        let target = self.rooms.find_mut(room)?;
        target.get_meeting(time)?;
        let person = self.people.find_mut(lastname)?;
        target.add_meeting_participant(time, person)
    }

    pub fn remove_participant(&mut self, room: RoomNumber, time: MeetingTime, lastname: &str) -> Result<(), ScheduleError> {
        let target = self.rooms.find_mut(room)?;
        target.get_meeting(time)?;
        let person = self.people.find_mut(lastname)?;
        target.remove_meeting_participant(time, person)
    }

    /// Move a meeting to another room and/or time, keeping its topic
    /// and participants.
    ///
    /// Validation (slot free, no participant double-booked at the new
    /// time) completes before any state is touched. Only an identical
    /// room *and* time is a no-op; a room-only move skips the conflict
    /// check because commitments are keyed by time.
    pub fn reschedule(
        &mut self,
        old_room: RoomNumber,
        old_time: MeetingTime,
        new_room: RoomNumber,
        new_time: MeetingTime,
    ) -> Result<Reschedule, ScheduleError> {
        // -- validate --
        let participants: Vec<String> = self
            .meeting(old_room, old_time)?
            .participants()
            .map(str::to_string)
            .collect();
        let destination = self.rooms.find(new_room)?;

        if old_room == new_room && old_time == new_time {
            return Ok(Reschedule::Unchanged);
        }
        if destination.is_meeting_present(new_time) {
            return Err(ScheduleError::SlotTaken {
                room: new_room,
                time: new_time,
            });
        }
        if old_time != new_time {
            for lastname in &participants {
                if self.people.find(lastname)?.has_commitment_conflict(new_time) {
                    return Err(ScheduleError::CommitmentConflict {
                        lastname: lastname.clone(),
                        time: new_time,
                    });
                }
            }
        }

        // -- mutate --
        let mut moved = Vec::with_capacity(participants.len());
        for lastname in &participants {
            let person = self.people.find_mut(lastname)?;
            if person.remove_commitment(old_room, old_time) {
                moved.push(lastname);
            }
        }

        let mut meeting = self.rooms.find_mut(old_room)?.remove_meeting(old_time)?;
        meeting.relocate(new_room, new_time);
        self.rooms.find_mut(new_room)?.insert_meeting(meeting)?;

        for lastname in moved {
            self.people
                .find_mut(lastname)?
                .add_commitment(new_room, new_time)?;
        }

        Ok(Reschedule::Moved {
            room: new_room,
            time: new_time,
        })
    }

    // -- bulk ---------------------------------------------------------

    /// Delete every meeting in every room and every commitment.
    /// Returns the number of meetings removed.
    pub fn clear_schedule(&mut self) -> usize {
        let mut removed = 0;
        for room in self.rooms.iter_mut() {
            removed += room.clear_meetings().len();
        }
        for person in self.people.iter_mut() {
            person.clear_commitments();
        }
        removed
    }

    /// Delete every room, meeting and person.
    pub fn clear_all(&mut self) {
        self.rooms.clear();
        self.people.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::invariants::validate_invariants;

    fn t(raw: u8) -> MeetingTime {
        MeetingTime::new(raw).unwrap()
    }

    fn r(n: u32) -> RoomNumber {
        RoomNumber::new(n).unwrap()
    }

    /// Room 5 with "Sync" at 10 attended by Lee.
    fn lee_in_sync() -> Schedule {
        let mut s = Schedule::new();
        s.add_person("Ann", "Lee", "555-1111").unwrap();
        s.add_room(r(5)).unwrap();
        s.add_meeting(r(5), t(10), "Sync").unwrap();
        s.add_participant(r(5), t(10), "Lee").unwrap();
        s
    }

    #[test]
    fn duplicate_last_name_rejected() {
        let mut s = Schedule::new();
        s.add_person("Ann", "Lee", "555-1111").unwrap();
        let err = s.add_person("Bob", "Lee", "555-2222").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateKey);
        assert_eq!(s.person("Lee").unwrap().firstname(), "Ann");
    }

    #[test]
    fn second_meeting_in_slot_rejected() {
        let mut s = Schedule::new();
        s.add_room(r(5)).unwrap();
        s.add_meeting(r(5), t(10), "Sync").unwrap();
        let err = s.add_meeting(r(5), t(10), "Other").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SlotTaken);
        assert_eq!(s.meeting(r(5), t(10)).unwrap().topic(), "Sync");
    }

    #[test]
    fn cross_room_double_booking_rejected() {
        let mut s = lee_in_sync();
        s.add_room(r(6)).unwrap();
        s.add_meeting(r(6), t(10), "X").unwrap();
        let before = s.clone();
        let err = s.add_participant(r(6), t(10), "Lee").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CommitmentConflict);
        assert_eq!(s, before);
        let lee: Vec<_> = s.person("Lee").unwrap().commitments().collect();
        assert_eq!(lee, vec![(r(5), t(10))]);
    }

    #[test]
    fn reschedule_moves_commitments() {
        let mut s = lee_in_sync();
        let outcome = s.reschedule(r(5), t(10), r(5), t(11)).unwrap();
        assert_eq!(outcome, Reschedule::Moved { room: r(5), time: t(11) });
        let lee = s.person("Lee").unwrap();
        assert!(lee.is_committed(r(5), t(11)));
        assert!(!lee.is_committed(r(5), t(10)));
        let room = s.room(r(5)).unwrap();
        assert!(!room.is_meeting_present(t(10)));
        assert!(room.is_meeting_present(t(11)));
        assert_eq!(room.get_meeting(t(11)).unwrap().topic(), "Sync");
        validate_invariants(&s);
    }

    #[test]
    fn reschedule_to_same_slot_is_noop() {
        let mut s = lee_in_sync();
        let before = s.clone();
        assert_eq!(s.reschedule(r(5), t(10), r(5), t(10)).unwrap(), Reschedule::Unchanged);
        assert_eq!(s, before);
    }

    #[test]
    fn room_only_move_skips_conflict_check() {
        let mut s = lee_in_sync();
        s.add_room(r(6)).unwrap();
        let outcome = s.reschedule(r(5), t(10), r(6), t(10)).unwrap();
        assert_eq!(outcome, Reschedule::Moved { room: r(6), time: t(10) });
        let lee: Vec<_> = s.person("Lee").unwrap().commitments().collect();
        assert_eq!(lee, vec![(r(6), t(10))]);
        assert_eq!(s.meeting(r(6), t(10)).unwrap().room(), r(6));
        validate_invariants(&s);
    }

    #[test]
    fn reschedule_into_taken_slot_changes_nothing() {
        let mut s = lee_in_sync();
        s.add_meeting(r(5), t(11), "Busy").unwrap();
        let before = s.clone();
        let err = s.reschedule(r(5), t(10), r(5), t(11)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SlotTaken);
        assert_eq!(s, before);
    }

    #[test]
    fn reschedule_into_participant_conflict_changes_nothing() {
        let mut s = lee_in_sync();
        s.add_room(r(6)).unwrap();
        s.add_meeting(r(6), t(2), "Other").unwrap();
        s.add_participant(r(6), t(2), "Lee").unwrap();
        let before = s.clone();
        let err = s.reschedule(r(5), t(10), r(5), t(2)).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::CommitmentConflict {
                lastname: "Lee".to_string(),
                time: t(2)
            }
        );
        assert_eq!(s, before);
    }

    #[test]
    fn reschedule_unknown_sources_not_found() {
        let mut s = lee_in_sync();
        assert_eq!(
            s.reschedule(r(9), t(10), r(5), t(11)).unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            s.reschedule(r(5), t(9), r(5), t(11)).unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            s.reschedule(r(5), t(10), r(9), t(11)).unwrap_err(),
            ScheduleError::RoomNotFound { room: r(9) }
        );
    }

    #[test]
    fn participant_cannot_be_removed_from_registry() {
        let mut s = lee_in_sync();
        let err = s.remove_person("Lee").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StillReferenced);
        s.remove_participant(r(5), t(10), "Lee").unwrap();
        assert!(!s.person("Lee").unwrap().has_commitments());
        s.remove_person("Lee").unwrap();
        assert_eq!(s.person_count(), 0);
    }

    #[test]
    fn remove_meeting_releases_commitments() {
        let mut s = lee_in_sync();
        s.remove_meeting(r(5), t(10)).unwrap();
        assert!(!s.person("Lee").unwrap().has_commitments());
        validate_invariants(&s);
    }

    #[test]
    fn remove_room_releases_commitments() {
        let mut s = lee_in_sync();
        s.add_room(r(6)).unwrap();
        s.add_meeting(r(6), t(3), "Later").unwrap();
        s.add_participant(r(6), t(3), "Lee").unwrap();
        s.remove_room(r(5)).unwrap();
        let lee: Vec<_> = s.person("Lee").unwrap().commitments().collect();
        assert_eq!(lee, vec![(r(6), t(3))]);
        validate_invariants(&s);
    }

    #[test]
    fn clear_people_requires_empty_schedule() {
        let mut s = lee_in_sync();
        assert_eq!(
            s.clear_people().unwrap_err(),
            ScheduleError::MeetingsScheduled { meetings: 1 }
        );
        assert_eq!(s.clear_schedule(), 1);
        assert_eq!(s.room_count(), 1);
        assert!(!s.person("Lee").unwrap().has_commitments());
        assert_eq!(s.clear_people().unwrap(), 1);
        validate_invariants(&s);
    }

    #[test]
    fn commitments_view_joins_topics() {
        let s = lee_in_sync();
        let view = s.commitments_of("Lee").unwrap();
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].topic, "Sync");
        assert!(s.commitments_of("Nobody").is_err());
    }
}
