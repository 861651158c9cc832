//! Schedule kernel — Registries
//!
//! Ordered, uniquely keyed owners of people (by last name) and rooms
//! (by number). Lookups and insertion-position search are O(log n).

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::domain::{Person, Room};
use crate::error::ScheduleError;
use crate::values::RoomNumber;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonRegistry {
    people: BTreeMap<String, Person>,
}

impl PersonRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, person: Person) -> Result<&mut Person, ScheduleError> {
        match self.people.entry(person.lastname().to_string()) {
            Entry::Occupied(entry) => Err(ScheduleError::DuplicatePerson {
                lastname: entry.key().clone(),
            }),
            Entry::Vacant(slot) => Ok(slot.insert(person)),
        }
    }

    pub fn find(&self, lastname: &str) -> Result<&Person, ScheduleError> {
        self.people
            .get(lastname)
            .ok_or_else(|| ScheduleError::PersonNotFound {
                lastname: lastname.to_string(),
            })
    }

    pub fn find_mut(&mut self, lastname: &str) -> Result<&mut Person, ScheduleError> {
        self.people
            .get_mut(lastname)
            .ok_or_else(|| ScheduleError::PersonNotFound {
                lastname: lastname.to_string(),
            })
    }

    pub fn contains(&self, lastname: &str) -> bool {
        self.people.contains_key(lastname)
    }

    /// Remove and return a person. A person still holding commitments
    /// is refused with `StillReferenced`; callers that also track
    /// meeting membership should check rooms first.
    pub fn remove(&mut self, lastname: &str) -> Result<Person, ScheduleError> {
        let person = self.find(lastname)?;
        if person.has_commitments() {
            return Err(ScheduleError::StillReferenced {
                lastname: lastname.to_string(),
            });
        }
        self.people
            .remove(lastname)
            .ok_or_else(|| ScheduleError::PersonNotFound {
                lastname: lastname.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// People in last-name order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Person> + '_ {
        self.people.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Person> + '_ {
        self.people.values_mut()
    }

    pub(crate) fn keyed(&self) -> impl Iterator<Item = (&str, &Person)> + '_ {
        self.people.iter().map(|(k, p)| (k.as_str(), p))
    }

    pub fn clear(&mut self) {
        self.people.clear();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomRegistry {
    rooms: BTreeMap<RoomNumber, Room>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, room: Room) -> Result<&mut Room, ScheduleError> {
        match self.rooms.entry(room.number()) {
            Entry::Occupied(entry) => Err(ScheduleError::DuplicateRoom { room: *entry.key() }),
            Entry::Vacant(slot) => Ok(slot.insert(room)),
        }
    }

    pub fn find(&self, room: RoomNumber) -> Result<&Room, ScheduleError> {
        self.rooms.get(&room).ok_or(ScheduleError::RoomNotFound { room })
    }

    pub fn find_mut(&mut self, room: RoomNumber) -> Result<&mut Room, ScheduleError> {
        self.rooms
            .get_mut(&room)
            .ok_or(ScheduleError::RoomNotFound { room })
    }

    pub fn contains(&self, room: RoomNumber) -> bool {
        self.rooms.contains_key(&room)
    }

    /// Remove and return a room with its meetings intact.
    pub fn remove(&mut self, room: RoomNumber) -> Result<Room, ScheduleError> {
        self.rooms
            .remove(&room)
            .ok_or(ScheduleError::RoomNotFound { room })
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Rooms in number order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Room> + '_ {
        self.rooms.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Room> + '_ {
        self.rooms.values_mut()
    }

    pub(crate) fn keyed(&self) -> impl Iterator<Item = (RoomNumber, &Room)> + '_ {
        self.rooms.iter().map(|(&k, r)| (k, r))
    }

    pub fn meeting_count(&self) -> usize {
        self.rooms.values().map(Room::meeting_count).sum()
    }

    pub fn has_meetings(&self) -> bool {
        self.rooms.values().any(Room::has_meetings)
    }

    /// True if `lastname` attends a meeting in any room.
    pub fn is_participant_anywhere(&self, lastname: &str) -> bool {
        self.rooms
            .values()
            .any(|room| room.is_participant_present(lastname))
    }

    pub fn clear(&mut self) {
        self.rooms.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::MeetingTime;

    #[test]
    fn people_keyed_by_last_name_only() {
        let mut reg = PersonRegistry::new();
        reg.add(Person::new("Ann", "Lee", "555-1111").unwrap()).unwrap();
        let err = reg
            .add(Person::new("Bob", "Lee", "555-2222").unwrap())
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::DuplicateKey);
        assert_eq!(reg.find("Lee").unwrap().firstname(), "Ann");
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn committed_person_cannot_be_removed() {
        let mut reg = PersonRegistry::new();
        let p = reg.add(Person::new("Ann", "Lee", "1").unwrap()).unwrap();
        p.add_commitment(RoomNumber::new(1).unwrap(), MeetingTime::new(9).unwrap())
            .unwrap();
        assert!(matches!(
            reg.remove("Lee"),
            Err(ScheduleError::StillReferenced { .. })
        ));
        assert!(matches!(
            reg.remove("Nobody"),
            Err(ScheduleError::PersonNotFound { .. })
        ));
    }

    #[test]
    fn rooms_iterate_in_number_order() {
        let mut reg = RoomRegistry::new();
        for n in [12, 3, 7] {
            reg.add(Room::new(RoomNumber::new(n).unwrap())).unwrap();
        }
        assert!(reg.add(Room::new(RoomNumber::new(3).unwrap())).is_err());
        let order: Vec<u32> = reg.iter().map(|r| r.number().get()).collect();
        assert_eq!(order, vec![3, 7, 12]);
    }
}
