//! Schedule kernel — Command Definitions
//!
//! Commands are pure data: intent and arguments, no logic. They are
//! what an interactive front end hands to `ScheduleEngine::apply`.
//! Room numbers and times are validated on construction, so a
//! deserialized command always carries in-range values.

use serde::{Deserialize, Serialize};

use crate::values::{MeetingTime, RoomNumber};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case", deny_unknown_fields)]
pub enum Command {
    AddPerson {
        firstname: String,
        lastname: String,
        phone: String,
    },
    RemovePerson {
        lastname: String,
    },
    AddRoom {
        room: RoomNumber,
    },
    RemoveRoom {
        room: RoomNumber,
    },
    AddMeeting {
        room: RoomNumber,
        time: MeetingTime,
        topic: String,
    },
    RemoveMeeting {
        room: RoomNumber,
        time: MeetingTime,
    },
    AddParticipant {
        room: RoomNumber,
        time: MeetingTime,
        lastname: String,
    },
    RemoveParticipant {
        room: RoomNumber,
        time: MeetingTime,
        lastname: String,
    },
    Reschedule {
        old_room: RoomNumber,
        old_time: MeetingTime,
        new_room: RoomNumber,
        new_time: MeetingTime,
    },
    ClearSchedule,
    ClearPeople,
    ClearAll,
}

impl Command {
    /// Stable snake_case name, matching the serialized tag.
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddPerson { .. } => "add_person",
            Command::RemovePerson { .. } => "remove_person",
            Command::AddRoom { .. } => "add_room",
            Command::RemoveRoom { .. } => "remove_room",
            Command::AddMeeting { .. } => "add_meeting",
            Command::RemoveMeeting { .. } => "remove_meeting",
            Command::AddParticipant { .. } => "add_participant",
            Command::RemoveParticipant { .. } => "remove_participant",
            Command::Reschedule { .. } => "reschedule",
            Command::ClearSchedule => "clear_schedule",
            Command::ClearPeople => "clear_people",
            Command::ClearAll => "clear_all",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_json() {
        let cmd: Command = serde_json::from_str(
            r#"{"command":"add_meeting","room":5,"time":10,"topic":"Sync"}"#,
        )
        .unwrap();
        assert_eq!(
            cmd,
            Command::AddMeeting {
                room: RoomNumber::new(5).unwrap(),
                time: MeetingTime::new(10).unwrap(),
                topic: "Sync".to_string(),
            }
        );
        assert_eq!(cmd.name(), "add_meeting");
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(serde_json::from_str::<Command>(r#"{"command":"add_room","room":0}"#).is_err());
        assert!(serde_json::from_str::<Command>(
            r#"{"command":"remove_meeting","room":1,"time":7}"#
        )
        .is_err());
    }

    #[test]
    fn unit_commands_use_tag_only() {
        let json = serde_json::to_string(&Command::ClearAll).unwrap();
        assert_eq!(json, r#"{"command":"clear_all"}"#);
    }
}
