//! Schedule kernel — Invariant Checks
//!
//! `validate_invariants` hard-fails: a violation after a successful
//! command is a kernel bug. `try_validate_invariants` reports instead,
//! for models built from untrusted input.

use std::collections::BTreeSet;

use crate::state::Schedule;
use crate::values::{validate_token, MeetingTime};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run every check. Panics on the first failure.
pub fn validate_invariants(schedule: &Schedule) {
    if let Err(msg) = try_validate_invariants(schedule) {
        panic!("Invariant violation: {}", msg);
    }
}

/// Non-panicking variant of `validate_invariants`.
/// Returns `Err(message)` on the first failure, `Ok(())` if all pass.
pub fn try_validate_invariants(schedule: &Schedule) -> Result<(), String> {
    check_person_keys(schedule)?;
    check_room_keys(schedule)?;
    check_participants_committed(schedule)?;
    check_commitments_backed(schedule)?;
    check_no_double_booking(schedule)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Individual checks
// ---------------------------------------------------------------------------

/// Registry key matches the person's last name; every field is a token.
fn check_person_keys(schedule: &Schedule) -> Result<(), String> {
    for (key, person) in schedule.people.keyed() {
        if key != person.lastname() {
            return Err(format!(
                "[person_key] registry key {:?} holds person {:?}",
                key,
                person.lastname()
            ));
        }
        for (field, value) in [
            ("first name", person.firstname()),
            ("last name", person.lastname()),
            ("phone number", person.phone()),
        ] {
            validate_token(field, value).map_err(|e| format!("[token_format] {}", e))?;
        }
    }
    Ok(())
}

/// Registry key matches the room number, and each meeting knows the
/// room and time it is filed under.
fn check_room_keys(schedule: &Schedule) -> Result<(), String> {
    for (key, room) in schedule.rooms.keyed() {
        if key != room.number() {
            return Err(format!(
                "[room_key] registry key {} holds room {}",
                key,
                room.number()
            ));
        }
        let mut last: Option<MeetingTime> = None;
        for meeting in room.meetings() {
            if meeting.room() != key {
                return Err(format!(
                    "[meeting_room] meeting at {} in room {} claims room {}",
                    meeting.time(),
                    key,
                    meeting.room()
                ));
            }
            if last.is_some_and(|prev| prev >= meeting.time()) {
                return Err(format!(
                    "[meeting_order] room {} meetings out of order at {}",
                    key,
                    meeting.time()
                ));
            }
            last = Some(meeting.time());
            validate_token("topic", meeting.topic()).map_err(|e| format!("[token_format] {}", e))?;
        }
    }
    Ok(())
}

/// p ∈ m.participants ⇒ p exists and m ∈ p.commitments[r].
fn check_participants_committed(schedule: &Schedule) -> Result<(), String> {
    for room in schedule.rooms.iter() {
        for meeting in room.meetings() {
            for lastname in meeting.participants() {
                let person = schedule.people.find(lastname).map_err(|_| {
                    format!(
                        "[participant_ref] room {} at {} lists unknown participant {:?}",
                        room.number(),
                        meeting.time(),
                        lastname
                    )
                })?;
                if !person.is_committed(room.number(), meeting.time()) {
                    return Err(format!(
                        "[commitment_missing] {:?} attends room {} at {} without a commitment",
                        lastname,
                        room.number(),
                        meeting.time()
                    ));
                }
            }
        }
    }
    Ok(())
}

/// m ∈ p.commitments[r] ⇒ m exists in r and p ∈ m.participants.
fn check_commitments_backed(schedule: &Schedule) -> Result<(), String> {
    for person in schedule.people.iter() {
        for (room, time) in person.commitments() {
            let meeting = schedule.meeting(room, time).map_err(|_| {
                format!(
                    "[commitment_dangling] {:?} committed to room {} at {} which does not exist",
                    person.lastname(),
                    room,
                    time
                )
            })?;
            if !meeting.is_participant_present(person.lastname()) {
                return Err(format!(
                    "[commitment_orphan] {:?} committed to room {} at {} but is not a participant",
                    person.lastname(),
                    room,
                    time
                ));
            }
        }
    }
    Ok(())
}

/// No person holds two commitments at the same time, in any rooms.
fn check_no_double_booking(schedule: &Schedule) -> Result<(), String> {
    for person in schedule.people.iter() {
        let mut seen: BTreeSet<MeetingTime> = BTreeSet::new();
        for (room, time) in person.commitments() {
            if !seen.insert(time) {
                return Err(format!(
                    "[double_booking] {:?} has a second commitment at {} (room {})",
                    person.lastname(),
                    time,
                    room
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::RoomNumber;

    fn t(raw: u8) -> MeetingTime {
        MeetingTime::new(raw).unwrap()
    }

    fn r(n: u32) -> RoomNumber {
        RoomNumber::new(n).unwrap()
    }

    fn sample() -> Schedule {
        let mut s = Schedule::new();
        s.add_person("Ann", "Lee", "1").unwrap();
        s.add_room(r(1)).unwrap();
        s.add_room(r(2)).unwrap();
        s.add_meeting(r(1), t(9), "A").unwrap();
        s.add_meeting(r(2), t(1), "B").unwrap();
        s.add_participant(r(1), t(9), "Lee").unwrap();
        s
    }

    #[test]
    fn consistent_schedule_passes() {
        assert_eq!(try_validate_invariants(&sample()), Ok(()));
    }

    #[test]
    fn dangling_commitment_detected() {
        let mut s = sample();
        s.people.find_mut("Lee").unwrap().add_commitment(r(2), t(3)).unwrap();
        let msg = try_validate_invariants(&s).unwrap_err();
        assert!(msg.contains("commitment_dangling"), "got: {}", msg);
    }

    #[test]
    fn orphan_commitment_detected() {
        let mut s = sample();
        s.people.find_mut("Lee").unwrap().add_commitment(r(2), t(1)).unwrap();
        let msg = try_validate_invariants(&s).unwrap_err();
        assert!(msg.contains("commitment_orphan"), "got: {}", msg);
    }

    #[test]
    fn missing_commitment_detected() {
        let mut s = sample();
        s.people.find_mut("Lee").unwrap().clear_commitments();
        let msg = try_validate_invariants(&s).unwrap_err();
        assert!(msg.contains("commitment_missing"), "got: {}", msg);
    }

    #[test]
    #[should_panic(expected = "Invariant violation")]
    fn validate_panics_on_violation() {
        let mut s = sample();
        s.people.find_mut("Lee").unwrap().clear_commitments();
        validate_invariants(&s);
    }
}
