//! Snapshot Codec — flat text encoder/decoder for the whole model.
//!
//! Format (whitespace-delimited, one record per line):
//!
//! ```text
//! <person_count>
//! <firstname> <lastname> <phone>          x person_count
//! <room_count>
//! <room_number> <meeting_count>           x room_count
//! <time> <topic> <participant_count>      x meeting_count
//! <lastname>                              x participant_count
//! ```
//!
//! People are written and read before rooms so that meetings can
//! resolve participants against the people already decoded. Decoding
//! always builds a fresh `Schedule`; it never touches a live one.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use sha2::{Digest, Sha256};
use tracing::warn;

use schedule_kernel::{Meeting, MeetingTime, Person, Room, RoomNumber, Schedule, ScheduleError};

use crate::error::PersistError;

// ---------------------------------------------------------------------------
// Token reader
// ---------------------------------------------------------------------------

/// Whitespace token stream that remembers which line each token came from.
pub struct TokenReader<R> {
    lines: io::Lines<R>,
    line: usize,
    pending: std::vec::IntoIter<String>,
}

impl<R: BufRead> TokenReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            pending: Vec::new().into_iter(),
        }
    }

    fn next_token(&mut self) -> Result<Option<String>, PersistError> {
        loop {
            if let Some(token) = self.pending.next() {
                return Ok(Some(token));
            }
            let Some(line) = self.lines.next() else {
                return Ok(None);
            };
            self.line += 1;
            let line = line.map_err(|e| match e.kind() {
                io::ErrorKind::InvalidData => self.malformed("line is not valid UTF-8".to_string()),
                _ => PersistError::Io(e),
            })?;
            self.pending = line
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
                .into_iter();
        }
    }

    /// Next token, or `Malformed` naming what was expected.
    pub fn token(&mut self, what: &str) -> Result<String, PersistError> {
        match self.next_token()? {
            Some(token) => Ok(token),
            None => Err(self.malformed(format!("missing {}", what))),
        }
    }

    /// Next token parsed as a number.
    pub fn number<T: FromStr>(&mut self, what: &str) -> Result<T, PersistError> {
        let token = self.token(what)?;
        token
            .parse()
            .map_err(|_| self.malformed(format!("expected {} but found {:?}", what, token)))
    }

    /// First token left after the last expected record, with its line.
    /// Read errors past the last record are not reported.
    pub fn leftover(mut self) -> Option<(usize, String)> {
        match self.next_token() {
            Ok(Some(token)) => Some((self.line, token)),
            _ => None,
        }
    }

    fn malformed(&self, reason: String) -> PersistError {
        PersistError::Malformed {
            line: self.line,
            reason,
        }
    }

    /// Report a kernel rejection at the current line.
    fn reject(&self, err: ScheduleError) -> PersistError {
        self.malformed(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

pub fn write_person<W: Write>(w: &mut W, person: &Person) -> io::Result<()> {
    writeln!(
        w,
        "{} {} {}",
        person.firstname(),
        person.lastname(),
        person.phone()
    )
}

pub fn write_meeting<W: Write>(w: &mut W, meeting: &Meeting) -> io::Result<()> {
    writeln!(
        w,
        "{} {} {}",
        meeting.time(),
        meeting.topic(),
        meeting.participant_count()
    )?;
    for lastname in meeting.participants() {
        writeln!(w, "{}", lastname)?;
    }
    Ok(())
}

pub fn write_room<W: Write>(w: &mut W, room: &Room) -> io::Result<()> {
    writeln!(w, "{} {}", room.number(), room.meeting_count())?;
    for meeting in room.meetings() {
        write_meeting(w, meeting)?;
    }
    Ok(())
}

/// Write the whole model: people in last-name order, then rooms in
/// number order.
pub fn encode_schedule<W: Write>(w: &mut W, schedule: &Schedule) -> io::Result<()> {
    writeln!(w, "{}", schedule.person_count())?;
    for person in schedule.people().iter() {
        write_person(w, person)?;
    }
    writeln!(w, "{}", schedule.room_count())?;
    for room in schedule.rooms().iter() {
        write_room(w, room)?;
    }
    Ok(())
}

pub fn encode_to_string(schedule: &Schedule) -> String {
    let mut buf = Vec::new();
    encode_schedule(&mut buf, schedule).expect("writing to a Vec cannot fail");
    String::from_utf8(buf).expect("encoded snapshot is always valid UTF-8")
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// Read one person record. The person is not registered anywhere.
pub fn read_person<R: BufRead>(tokens: &mut TokenReader<R>) -> Result<Person, PersistError> {
    let firstname = tokens.token("first name")?;
    let lastname = tokens.token("last name")?;
    let phone = tokens.token("phone number")?;
    Person::new(&firstname, &lastname, &phone).map_err(|e| tokens.reject(e))
}

/// Read one meeting record into `room` of `schedule`, resolving each
/// participant against the people `schedule` already holds.
pub fn read_meeting<R: BufRead>(
    tokens: &mut TokenReader<R>,
    schedule: &mut Schedule,
    room: RoomNumber,
) -> Result<MeetingTime, PersistError> {
    let raw: u8 = tokens.number("meeting time")?;
    let time = MeetingTime::new(raw).map_err(|e| tokens.reject(e))?;
    let topic = tokens.token("topic")?;
    let participants: usize = tokens.number("participant count")?;
    schedule
        .add_meeting(room, time, &topic)
        .map_err(|e| tokens.reject(e))?;
    for _ in 0..participants {
        let lastname = tokens.token("participant last name")?;
        schedule
            .add_participant(room, time, &lastname)
            .map_err(|e| tokens.reject(e))?;
    }
    Ok(time)
}

/// Read one room record with all its meetings into `schedule`.
pub fn read_room<R: BufRead>(
    tokens: &mut TokenReader<R>,
    schedule: &mut Schedule,
) -> Result<RoomNumber, PersistError> {
    let number: u32 = tokens.number("room number")?;
    let room = RoomNumber::new(number).map_err(|e| tokens.reject(e))?;
    let meetings: usize = tokens.number("meeting count")?;
    schedule.add_room(room).map_err(|e| tokens.reject(e))?;
    for _ in 0..meetings {
        read_meeting(tokens, schedule, room)?;
    }
    Ok(room)
}

/// Decode a complete model. Any missing, mistyped or inconsistent
/// token is `Malformed`. Input after the last room is ignored.
pub fn decode_schedule<R: BufRead>(reader: R) -> Result<Schedule, PersistError> {
    let mut tokens = TokenReader::new(reader);
    let mut schedule = Schedule::new();

    let people: usize = tokens.number("person count")?;
    for _ in 0..people {
        let person = read_person(&mut tokens)?;
        schedule
            .insert_person(person)
            .map_err(|e| tokens.reject(e))?;
    }

    let rooms: usize = tokens.number("room count")?;
    for _ in 0..rooms {
        read_room(&mut tokens, &mut schedule)?;
    }

    if let Some((line, token)) = tokens.leftover() {
        warn!(line, token = %token, "ignoring data after the last room");
    }
    Ok(schedule)
}

pub fn decode_str(text: &str) -> Result<Schedule, PersistError> {
    decode_schedule(text.as_bytes())
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

/// Where a save went and what was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub path: PathBuf,
    pub bytes: usize,
    /// SHA-256 of the written bytes, lowercase hex.
    pub sha256: String,
}

/// Write the model to `path`, replacing any existing file.
/// The model itself is never modified.
pub fn export_to_file(schedule: &Schedule, path: &Path) -> Result<SaveReport, PersistError> {
    let text = encode_to_string(schedule);
    let file = File::create(path).map_err(|source| PersistError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    writer.write_all(text.as_bytes())?;
    let file = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
    file.sync_all()?;

    Ok(SaveReport {
        path: path.to_path_buf(),
        bytes: text.len(),
        sha256: text_hash(&text),
    })
}

/// Decode the model stored at `path`. The file is closed on return,
/// whether decoding succeeded or not.
pub fn import_from_file(path: &Path) -> Result<Schedule, PersistError> {
    let file = File::open(path).map_err(|source| PersistError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    decode_schedule(BufReader::new(file))
}

/// SHA-256 of snapshot text. Lowercase hex string.
pub fn text_hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
