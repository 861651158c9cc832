//! Model statistics and before/after comparison.

use std::collections::BTreeSet;

use schedule_kernel::{RoomNumber, Schedule};

/// Allocation counts for a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScheduleStats {
    pub people: usize,
    pub rooms: usize,
    pub meetings: usize,
    pub commitments: usize,
}

impl ScheduleStats {
    pub fn of(schedule: &Schedule) -> Self {
        Self {
            people: schedule.person_count(),
            rooms: schedule.room_count(),
            meetings: schedule.meeting_count(),
            commitments: schedule
                .people()
                .iter()
                .map(|p| p.commitment_count())
                .sum(),
        }
    }
}

/// Which people and rooms appeared or disappeared between two models.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScheduleDiff {
    pub added_people: Vec<String>,
    pub removed_people: Vec<String>,
    pub added_rooms: Vec<RoomNumber>,
    pub removed_rooms: Vec<RoomNumber>,
    pub meeting_delta: i64,
}

impl ScheduleDiff {
    pub fn is_empty(&self) -> bool {
        self.added_people.is_empty()
            && self.removed_people.is_empty()
            && self.added_rooms.is_empty()
            && self.removed_rooms.is_empty()
            && self.meeting_delta == 0
    }
}

/// Compare `before` with `after`.
pub fn compare_schedules(before: &Schedule, after: &Schedule) -> ScheduleDiff {
    let people_a: BTreeSet<&str> = before.people().iter().map(|p| p.lastname()).collect();
    let people_b: BTreeSet<&str> = after.people().iter().map(|p| p.lastname()).collect();
    let rooms_a: BTreeSet<RoomNumber> = before.rooms().iter().map(|r| r.number()).collect();
    let rooms_b: BTreeSet<RoomNumber> = after.rooms().iter().map(|r| r.number()).collect();

    ScheduleDiff {
        added_people: people_b.difference(&people_a).map(|s| s.to_string()).collect(),
        removed_people: people_a.difference(&people_b).map(|s| s.to_string()).collect(),
        added_rooms: rooms_b.difference(&rooms_a).copied().collect(),
        removed_rooms: rooms_a.difference(&rooms_b).copied().collect(),
        meeting_delta: after.meeting_count() as i64 - before.meeting_count() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedule_kernel::MeetingTime;

    #[test]
    fn counts_and_diff() {
        let mut a = Schedule::new();
        a.add_person("Ann", "Lee", "1").unwrap();
        a.add_room(RoomNumber::new(1).unwrap()).unwrap();

        let mut b = Schedule::new();
        b.add_person("Bo", "Kim", "2").unwrap();
        let room = RoomNumber::new(2).unwrap();
        let time = MeetingTime::new(3).unwrap();
        b.add_room(room).unwrap();
        b.add_meeting(room, time, "X").unwrap();
        b.add_participant(room, time, "Kim").unwrap();

        assert_eq!(
            ScheduleStats::of(&b),
            ScheduleStats {
                people: 1,
                rooms: 1,
                meetings: 1,
                commitments: 1
            }
        );

        let diff = compare_schedules(&a, &b);
        assert_eq!(diff.added_people, vec!["Kim".to_string()]);
        assert_eq!(diff.removed_people, vec!["Lee".to_string()]);
        assert_eq!(diff.added_rooms, vec![room]);
        assert_eq!(diff.removed_rooms, vec![RoomNumber::new(1).unwrap()]);
        assert_eq!(diff.meeting_delta, 1);
        assert!(compare_schedules(&b, &b).is_empty());
    }
}
