//! Snapshot layer — independent in-memory copies of the model.
//!
//! A snapshot is a deep copy plus the canonical hash taken at capture
//! time. Later mutation of the live model cannot reach it, and the
//! hash proves that a restore reproduced the captured state exactly.

use schedule_kernel::hashing::canonical_hash;
use schedule_kernel::Schedule;

#[derive(Debug, Clone)]
pub struct Snapshot {
    schedule: Schedule,
    hash: String,
}

impl Snapshot {
    /// Deep-copy `schedule` and record its canonical hash.
    pub fn capture(schedule: &Schedule) -> Self {
        Self {
            schedule: schedule.clone(),
            hash: canonical_hash(schedule),
        }
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// True if `schedule` is canonically identical to the captured state.
    pub fn matches(&self, schedule: &Schedule) -> bool {
        canonical_hash(schedule) == self.hash
    }

    /// Verify the snapshot's internal hash consistency.
    pub fn verify(&self) -> bool {
        self.matches(&self.schedule)
    }

    /// Give up the captured copy, e.g. to reinstall it.
    pub fn into_schedule(self) -> Schedule {
        self.schedule
    }
}
