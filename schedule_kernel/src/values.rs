//! Schedule kernel — Value Primitives
//!
//! Meeting times, room numbers and the token rule shared by every
//! textual field. Comparison of meeting times always goes through
//! the normalized (24-hour) value.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Raw clock values that name a workday slot, in workday order.
pub const WORKDAY_SLOTS: [u8; 9] = [9, 10, 11, 12, 1, 2, 3, 4, 5];

/// Raw values at or below this are afternoon hours.
const AFTERNOON_CUTOFF: u8 = 5;

/// One of the nine hourly meeting slots, stored as the raw 12-hour
/// clock value (9..=12, 1..=5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MeetingTime(u8);

impl MeetingTime {
    /// Accept a raw clock value. Anything outside the workday slots
    /// (including 6, 7 and 8) is rejected.
    pub fn new(raw: u8) -> Result<Self, ScheduleError> {
        if WORKDAY_SLOTS.contains(&raw) {
            Ok(Self(raw))
        } else {
            Err(ScheduleError::InvalidTime { raw: raw.into() })
        }
    }

    /// Raw 12-hour clock value as entered and saved.
    pub fn raw(self) -> u8 {
        self.0
    }

    /// 24-hour value: afternoon hours (raw <= 5) get +12.
    pub fn normalized(self) -> u8 {
        normalize(self.0)
    }
}

/// Normalization shared by the comparator and anything that needs to
/// order raw values without constructing a `MeetingTime`.
pub fn normalize(raw: u8) -> u8 {
    if raw <= AFTERNOON_CUTOFF {
        raw + 12
    } else {
        raw
    }
}

impl Ord for MeetingTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.normalized().cmp(&other.normalized())
    }
}

impl PartialOrd for MeetingTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TryFrom<u8> for MeetingTime {
    type Error = ScheduleError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        MeetingTime::new(raw)
    }
}

impl From<MeetingTime> for u8 {
    fn from(time: MeetingTime) -> u8 {
        time.0
    }
}

impl fmt::Display for MeetingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room identity. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RoomNumber(u32);

impl RoomNumber {
    pub fn new(number: u32) -> Result<Self, ScheduleError> {
        if number == 0 {
            return Err(ScheduleError::InvalidRoomNumber { raw: 0 });
        }
        Ok(Self(number))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for RoomNumber {
    type Error = ScheduleError;

    fn try_from(number: u32) -> Result<Self, Self::Error> {
        RoomNumber::new(number)
    }
}

impl From<RoomNumber> for u32 {
    fn from(room: RoomNumber) -> u32 {
        room.0
    }
}

impl fmt::Display for RoomNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate that a text field is a single non-empty token with no
/// whitespace, so it survives the whitespace-delimited snapshot format.
pub fn validate_token(field: &'static str, value: &str) -> Result<(), ScheduleError> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(ScheduleError::InvalidToken {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
