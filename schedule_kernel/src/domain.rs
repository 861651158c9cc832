//! Schedule kernel — Core Domain Types
//!
//! Person, Meeting and Room. Back-references are stable keys rather
//! than pointers: a meeting lists its participants by last name, and a
//! person's commitment index lists meetings by (room, time). Both sides
//! are kept in agreement by the composite operations in `operations`.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::ScheduleError;
use crate::values::{validate_token, MeetingTime, RoomNumber};

// ── Person ─────────────────────────────────────────────────────────

/// Room number → times of the meetings attended in that room.
/// Each set is ordered by normalized time.
pub type Commitments = BTreeMap<RoomNumber, BTreeSet<MeetingTime>>;

/// A member of the organization, identified by last name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    firstname: String,
    lastname: String,
    phone: String,
    commitments: Commitments,
}

impl Person {
    pub fn new(firstname: &str, lastname: &str, phone: &str) -> Result<Self, ScheduleError> {
        validate_token("first name", firstname)?;
        validate_token("last name", lastname)?;
        validate_token("phone number", phone)?;
        Ok(Self {
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            phone: phone.to_string(),
            commitments: Commitments::new(),
        })
    }

    pub fn firstname(&self) -> &str {
        &self.firstname
    }

    pub fn lastname(&self) -> &str {
        &self.lastname
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Record attendance of the meeting at `time` in `room`.
    ///
    /// Fails with `CommitmentConflict` if any commitment in any room is
    /// already at `time`; nothing is changed in that case.
    pub fn add_commitment(&mut self, room: RoomNumber, time: MeetingTime) -> Result<(), ScheduleError> {
        if self.has_commitment_conflict(time) {
            return Err(ScheduleError::CommitmentConflict {
                lastname: self.lastname.clone(),
                time,
            });
        }
        self.commitments.entry(room).or_default().insert(time);
        Ok(())
    }

    /// Drop the commitment at (`room`, `time`). Returns whether one was
    /// held. Empty room entries are removed.
    pub fn remove_commitment(&mut self, room: RoomNumber, time: MeetingTime) -> bool {
        let Entry::Occupied(mut entry) = self.commitments.entry(room) else {
            return false;
        };
        if !entry.get_mut().remove(&time) {
            return false;
        }
        if entry.get().is_empty() {
            entry.remove();
        }
        true
    }

    /// Drop every commitment in `room`. Returns how many were held.
    pub fn remove_room_commitments(&mut self, room: RoomNumber) -> usize {
        self.commitments.remove(&room).map_or(0, |times| times.len())
    }

    pub fn clear_commitments(&mut self) {
        self.commitments.clear();
    }

    /// True if some commitment, in any room, is at `time`.
    pub fn has_commitment_conflict(&self, time: MeetingTime) -> bool {
        self.commitments.values().any(|times| times.contains(&time))
    }

    pub fn is_committed(&self, room: RoomNumber, time: MeetingTime) -> bool {
        self.commitments
            .get(&room)
            .is_some_and(|times| times.contains(&time))
    }

    pub fn has_commitments(&self) -> bool {
        !self.commitments.is_empty()
    }

    pub fn commitment_count(&self) -> usize {
        self.commitments.values().map(BTreeSet::len).sum()
    }

    /// All commitments, ordered by room then normalized time.
    pub fn commitments(&self) -> impl Iterator<Item = (RoomNumber, MeetingTime)> + '_ {
        self.commitments
            .iter()
            .flat_map(|(&room, times)| times.iter().map(move |&time| (room, time)))
    }
}

// ── Meeting ────────────────────────────────────────────────────────

/// A meeting held in one room at one slot. Owned by its room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meeting {
    room: RoomNumber,
    time: MeetingTime,
    topic: String,
    participants: BTreeSet<String>, // last names, sorted
}

impl Meeting {
    pub(crate) fn new(room: RoomNumber, time: MeetingTime, topic: &str) -> Result<Self, ScheduleError> {
        validate_token("topic", topic)?;
        Ok(Self {
            room,
            time,
            topic: topic.to_string(),
            participants: BTreeSet::new(),
        })
    }

    pub fn room(&self) -> RoomNumber {
        self.room
    }

    pub fn time(&self) -> MeetingTime {
        self.time
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Move to another slot. Only valid while detached from any room.
    pub(crate) fn relocate(&mut self, room: RoomNumber, time: MeetingTime) {
        self.room = room;
        self.time = time;
    }

    /// Participant list only; `Room::add_meeting_participant` keeps the
    /// person's commitment in step.
    pub(crate) fn add_participant(&mut self, lastname: &str) -> Result<(), ScheduleError> {
        if self.participants.contains(lastname) {
            return Err(ScheduleError::AlreadyParticipant {
                lastname: lastname.to_string(),
                room: self.room,
                time: self.time,
            });
        }
        self.participants.insert(lastname.to_string());
        Ok(())
    }

    pub(crate) fn remove_participant(&mut self, lastname: &str) -> Result<(), ScheduleError> {
        if !self.participants.remove(lastname) {
            return Err(ScheduleError::NotParticipant {
                lastname: lastname.to_string(),
                room: self.room,
                time: self.time,
            });
        }
        Ok(())
    }

    pub fn is_participant_present(&self, lastname: &str) -> bool {
        self.participants.contains(lastname)
    }

    /// Participants' last names in sorted order.
    pub fn participants(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.participants.iter().map(String::as_str)
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }
}

// ── Room ───────────────────────────────────────────────────────────

/// A room and the meetings it owns, keyed by normalized time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    number: RoomNumber,
    meetings: BTreeMap<MeetingTime, Meeting>,
}

impl Room {
    pub fn new(number: RoomNumber) -> Self {
        Self {
            number,
            meetings: BTreeMap::new(),
        }
    }

    pub fn number(&self) -> RoomNumber {
        self.number
    }

    /// Schedule a new meeting with no participants.
    pub fn add_meeting(&mut self, time: MeetingTime, topic: &str) -> Result<&Meeting, ScheduleError> {
        let meeting = Meeting::new(self.number, time, topic)?;
        self.insert_meeting(meeting).map(|m| &*m)
    }

    /// Take ownership of a detached meeting. The meeting is relabelled
    /// with this room's number; its time must be free.
    pub(crate) fn insert_meeting(&mut self, mut meeting: Meeting) -> Result<&mut Meeting, ScheduleError> {
        let time = meeting.time();
        match self.meetings.entry(time) {
            Entry::Occupied(_) => Err(ScheduleError::SlotTaken {
                room: self.number,
                time,
            }),
            Entry::Vacant(slot) => {
                meeting.relocate(self.number, time);
                Ok(slot.insert(meeting))
            }
        }
    }

    pub fn is_meeting_present(&self, time: MeetingTime) -> bool {
        self.meetings.contains_key(&time)
    }

    pub fn get_meeting(&self, time: MeetingTime) -> Result<&Meeting, ScheduleError> {
        self.meetings
            .get(&time)
            .ok_or(ScheduleError::MeetingNotFound {
                room: self.number,
                time,
            })
    }

    fn get_meeting_mut(&mut self, time: MeetingTime) -> Result<&mut Meeting, ScheduleError> {
        let room = self.number;
        self.meetings
            .get_mut(&time)
            .ok_or(ScheduleError::MeetingNotFound { room, time })
    }

    /// Detach the meeting at `time` and hand it to the caller.
    /// Participants' commitments are left alone.
    pub fn remove_meeting(&mut self, time: MeetingTime) -> Result<Meeting, ScheduleError> {
        self.meetings
            .remove(&time)
            .ok_or(ScheduleError::MeetingNotFound {
                room: self.number,
                time,
            })
    }

    /// Add `person` to the meeting at `time` and record the matching
    /// commitment. Every check runs before either side is touched.
    pub fn add_meeting_participant(&mut self, time: MeetingTime, person: &mut Person) -> Result<(), ScheduleError> {
        let room = self.number;
        let meeting = self.get_meeting_mut(time)?;
        if meeting.is_participant_present(person.lastname()) {
            return Err(ScheduleError::AlreadyParticipant {
                lastname: person.lastname().to_string(),
                room,
                time,
            });
        }
        person.add_commitment(room, time)?;
        meeting.add_participant(person.lastname())
    }

    /// Remove `person` from the meeting at `time` along with the
    /// matching commitment.
    pub fn remove_meeting_participant(&mut self, time: MeetingTime, person: &mut Person) -> Result<(), ScheduleError> {
        let room = self.number;
        let meeting = self.get_meeting_mut(time)?;
        meeting.remove_participant(person.lastname())?;
        person.remove_commitment(room, time);
        Ok(())
    }

    pub fn has_meetings(&self) -> bool {
        !self.meetings.is_empty()
    }

    pub fn meeting_count(&self) -> usize {
        self.meetings.len()
    }

    /// Meetings in normalized time order.
    pub fn meetings(&self) -> impl ExactSizeIterator<Item = &Meeting> + '_ {
        self.meetings.values()
    }

    pub fn is_participant_present(&self, lastname: &str) -> bool {
        self.meetings
            .values()
            .any(|m| m.is_participant_present(lastname))
    }

    /// Drop every meeting, returning them so the caller can release
    /// the participants' commitments.
    pub fn clear_meetings(&mut self) -> Vec<Meeting> {
        std::mem::take(&mut self.meetings).into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(raw: u8) -> MeetingTime {
        MeetingTime::new(raw).unwrap()
    }

    fn r(n: u32) -> RoomNumber {
        RoomNumber::new(n).unwrap()
    }

    fn lee() -> Person {
        Person::new("Ann", "Lee", "555-1111").unwrap()
    }

    #[test]
    fn commitment_conflict_spans_rooms() {
        let mut p = lee();
        p.add_commitment(r(5), t(10)).unwrap();
        let err = p.add_commitment(r(6), t(10)).unwrap_err();
        assert!(matches!(err, ScheduleError::CommitmentConflict { .. }));
        assert_eq!(p.commitments().collect::<Vec<_>>(), vec![(r(5), t(10))]);
    }

    #[test]
    fn remove_commitment_reports_and_prunes() {
        let mut p = lee();
        p.add_commitment(r(5), t(10)).unwrap();
        p.add_commitment(r(5), t(2)).unwrap();
        assert!(!p.remove_commitment(r(6), t(10)));
        assert!(!p.remove_commitment(r(5), t(11)));
        assert!(p.remove_commitment(r(5), t(10)));
        assert!(p.remove_commitment(r(5), t(2)));
        assert!(!p.has_commitments());
        assert_eq!(p.commitments.len(), 0);
    }

    #[test]
    fn commitments_iterate_by_room_then_workday_time() {
        let mut p = lee();
        p.add_commitment(r(7), t(9)).unwrap();
        p.add_commitment(r(3), t(1)).unwrap();
        p.add_commitment(r(3), t(11)).unwrap();
        let got: Vec<_> = p.commitments().collect();
        assert_eq!(got, vec![(r(3), t(11)), (r(3), t(1)), (r(7), t(9))]);
        assert_eq!(p.commitment_count(), 3);
        assert_eq!(p.remove_room_commitments(r(3)), 2);
        assert_eq!(p.commitment_count(), 1);
    }

    #[test]
    fn room_keeps_one_meeting_per_slot() {
        let mut room = Room::new(r(5));
        room.add_meeting(t(10), "Sync").unwrap();
        let err = room.add_meeting(t(10), "Other").unwrap_err();
        assert_eq!(err, ScheduleError::SlotTaken { room: r(5), time: t(10) });
        assert_eq!(room.get_meeting(t(10)).unwrap().topic(), "Sync");
    }

    #[test]
    fn room_orders_meetings_by_normalized_time() {
        let mut room = Room::new(r(1));
        for raw in [3, 9, 12, 1, 10] {
            room.add_meeting(t(raw), "x").unwrap();
        }
        let order: Vec<u8> = room.meetings().map(|m| m.time().raw()).collect();
        assert_eq!(order, vec![9, 10, 12, 1, 3]);
    }

    #[test]
    fn failed_commitment_leaves_meeting_untouched() {
        let mut a = Room::new(r(5));
        let mut b = Room::new(r(6));
        a.add_meeting(t(10), "Sync").unwrap();
        b.add_meeting(t(10), "X").unwrap();
        let mut p = lee();
        a.add_meeting_participant(t(10), &mut p).unwrap();
        let err = b.add_meeting_participant(t(10), &mut p).unwrap_err();
        assert!(matches!(err, ScheduleError::CommitmentConflict { .. }));
        assert_eq!(b.get_meeting(t(10)).unwrap().participant_count(), 0);
    }

    #[test]
    fn participants_sorted_and_unique() {
        let mut m = Meeting::new(r(1), t(9), "Plan").unwrap();
        m.add_participant("Zed").unwrap();
        m.add_participant("Adams").unwrap();
        assert!(m.add_participant("Zed").is_err());
        assert_eq!(m.participants().collect::<Vec<_>>(), vec!["Adams", "Zed"]);
        assert!(matches!(
            m.remove_participant("Moe"),
            Err(ScheduleError::NotParticipant { .. })
        ));
    }

    #[test]
    fn room_participant_changes_track_commitments() {
        let mut room = Room::new(r(3));
        let added = room.add_meeting(t(1), "Retro").unwrap();
        assert_eq!(added.room(), r(3));
        assert_eq!(added.participant_count(), 0);

        let mut p = Person::new("Ann", "Lee", "1").unwrap();
        room.add_meeting_participant(t(1), &mut p).unwrap();
        assert!(room.is_participant_present("Lee"));
        assert!(p.is_committed(r(3), t(1)));

        room.remove_meeting_participant(t(1), &mut p).unwrap();
        assert!(!room.is_participant_present("Lee"));
        assert!(!p.has_commitments());
    }

    #[test]
    fn remove_meeting_transfers_ownership() {
        let mut room = Room::new(r(2));
        room.add_meeting(t(4), "Demo").unwrap();
        let m = room.remove_meeting(t(4)).unwrap();
        assert_eq!(m.topic(), "Demo");
        assert!(!room.is_meeting_present(t(4)));
        assert!(matches!(
            room.remove_meeting(t(4)),
            Err(ScheduleError::MeetingNotFound { .. })
        ));
    }
}
