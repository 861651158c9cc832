//! Schedule kernel — Canonical Hashing
//!
//! Deterministic canonical serialization + SHA-256 hashing.
//!
//! Rules:
//!   - People sorted by last name, each with commitments by room then time
//!   - Rooms sorted by number, meetings by normalized time
//!   - Participants sorted by last name
//!   - Times as raw clock values
//!   - UTF-8 JSON, no whitespace, no platform newline

use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};

use crate::state::Schedule;
use crate::KERNEL_VERSION;

/// Canonical serialization of a Schedule to UTF-8 JSON bytes.
/// Includes kernel_version as the first field for identity binding.
pub fn canonical_serialize(schedule: &Schedule) -> Vec<u8> {
    build_canonical_value(schedule).to_string().into_bytes()
}

/// SHA-256 of canonical serialization. Lowercase hex string.
pub fn canonical_hash(schedule: &Schedule) -> String {
    let digest = Sha256::digest(canonical_serialize(schedule));
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Field order: kernel_version, people, rooms.
fn build_canonical_value(schedule: &Schedule) -> Value {
    let people: Vec<Value> = schedule
        .people()
        .iter()
        .map(|p| {
            let commitments: Vec<Value> = p
                .commitments()
                .map(|(room, time)| json!([room.get(), time.raw()]))
                .collect();
            let mut map = Map::new();
            map.insert("firstname".to_string(), Value::from(p.firstname()));
            map.insert("lastname".to_string(), Value::from(p.lastname()));
            map.insert("phone".to_string(), Value::from(p.phone()));
            map.insert("commitments".to_string(), Value::Array(commitments));
            Value::Object(map)
        })
        .collect();

    let rooms: Vec<Value> = schedule
        .rooms()
        .iter()
        .map(|room| {
            let meetings: Vec<Value> = room
                .meetings()
                .map(|m| {
                    let mut map = Map::new();
                    map.insert("time".to_string(), Value::from(m.time().raw()));
                    map.insert("topic".to_string(), Value::from(m.topic()));
                    map.insert(
                        "participants".to_string(),
                        Value::Array(m.participants().map(Value::from).collect()),
                    );
                    Value::Object(map)
                })
                .collect();
            let mut map = Map::new();
            map.insert("number".to_string(), Value::from(room.number().get()));
            map.insert("meetings".to_string(), Value::Array(meetings));
            Value::Object(map)
        })
        .collect();

    let mut root = Map::new();
    root.insert("kernel_version".to_string(), Value::from(KERNEL_VERSION));
    root.insert("people".to_string(), Value::Array(people));
    root.insert("rooms".to_string(), Value::Array(rooms));
    Value::Object(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{MeetingTime, RoomNumber};

    fn build(order: &[u32]) -> Schedule {
        let mut s = Schedule::new();
        s.add_person("Ann", "Lee", "1").unwrap();
        s.add_person("Bo", "Kim", "2").unwrap();
        for &n in order {
            let room = RoomNumber::new(n).unwrap();
            s.add_room(room).unwrap();
            s.add_meeting(room, MeetingTime::new(n as u8).unwrap(), "T").unwrap();
        }
        s
    }

    #[test]
    fn insertion_order_does_not_change_hash() {
        assert_eq!(canonical_hash(&build(&[1, 2, 3])), canonical_hash(&build(&[3, 1, 2])));
    }

    #[test]
    fn hash_is_lowercase_sha256() {
        let h = canonical_hash(&Schedule::new());
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn canonical_json_starts_with_kernel_version() {
        let json = String::from_utf8(canonical_serialize(&Schedule::new())).unwrap();
        assert_eq!(json, r#"{"kernel_version":1,"people":[],"rooms":[]}"#);
    }

    #[test]
    fn participant_change_changes_hash() {
        let mut s = build(&[1]);
        let before = canonical_hash(&s);
        s.add_participant(RoomNumber::new(1).unwrap(), MeetingTime::new(1).unwrap(), "Lee")
            .unwrap();
        assert_ne!(before, canonical_hash(&s));
    }
}
