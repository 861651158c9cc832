//! Load transaction — all-or-nothing replacement of the live model.
//!
//! Order of a load:
//!   1. open the source (failure here touches nothing)
//!   2. snapshot the live schedule
//!   3. decode a new schedule in isolation (people first, then rooms)
//!   4. optionally re-check invariants on it
//!   5. commit: swap it in, drop the snapshot
//! Any failure in 3–4 rolls back: the snapshot is reinstalled and its
//! hash checked, then the original error is returned.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, warn};

use schedule_kernel::hashing::canonical_hash;
use schedule_kernel::invariants::try_validate_invariants;
use schedule_kernel::{Schedule, ScheduleEngine};

use crate::error::PersistError;
use crate::snapshot::Snapshot;
use crate::snapshot_codec::{decode_schedule, export_to_file, SaveReport};
use crate::stats::{compare_schedules, ScheduleDiff, ScheduleStats};

/// Summary of a committed load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub stats: ScheduleStats,
    pub diff: ScheduleDiff,
    /// Canonical hash of the model now live.
    pub hash: String,
}

/// Exclusive hold on an engine for the duration of a load.
///
/// Dropping the transaction without `commit` rolls back.
pub struct LoadTransaction<'e> {
    engine: &'e mut ScheduleEngine,
    snapshot: Option<Snapshot>,
}

impl<'e> LoadTransaction<'e> {
    pub fn begin(engine: &'e mut ScheduleEngine) -> Self {
        let snapshot = Snapshot::capture(engine.schedule());
        debug!(hash = snapshot.hash(), "load transaction started");
        Self {
            engine,
            snapshot: Some(snapshot),
        }
    }

    /// Install `schedule` and release the snapshot. Returns the model
    /// that was live before.
    pub fn commit(mut self, schedule: Schedule) -> Schedule {
        self.snapshot = None;
        self.engine.replace_schedule(schedule)
    }

    /// Reinstall the pre-load model.
    pub fn rollback(mut self) {
        self.restore();
    }

    fn restore(&mut self) {
        let Some(snapshot) = self.snapshot.take() else {
            return;
        };
        // Unwinding already: reinstall only, a second panic would abort.
        if std::thread::panicking() {
            self.engine.replace_schedule(snapshot.into_schedule());
            return;
        }
        if !snapshot.verify() {
            panic!("Snapshot no longer matches its hash {}", snapshot.hash());
        }
        let expected = snapshot.hash().to_string();
        self.engine.replace_schedule(snapshot.into_schedule());
        let restored = canonical_hash(self.engine.schedule());
        if restored != expected {
            panic!(
                "Rollback restored a different model: expected {}, got {}",
                expected, restored
            );
        }
    }
}

impl Drop for LoadTransaction<'_> {
    fn drop(&mut self) {
        if self.snapshot.is_some() {
            warn!("load transaction abandoned, rolling back");
            self.restore();
        }
    }
}

/// Decode from `reader` and, on success, make the result live.
pub fn load_from<R: BufRead>(
    engine: &mut ScheduleEngine,
    reader: R,
    verify: bool,
) -> Result<LoadReport, PersistError> {
    let tx = LoadTransaction::begin(engine);
    match build(reader, verify) {
        Ok(schedule) => {
            let stats = ScheduleStats::of(&schedule);
            let hash = canonical_hash(&schedule);
            let previous = tx.commit(schedule);
            let diff = compare_schedules(&previous, engine.schedule());
            Ok(LoadReport { stats, diff, hash })
        }
        Err(err) => {
            tx.rollback();
            Err(err)
        }
    }
}

/// Load the model stored at `path`. On any failure the engine holds
/// exactly the model it held before the call.
pub fn load_file(engine: &mut ScheduleEngine, path: &Path, verify: bool) -> Result<LoadReport, PersistError> {
    let file = File::open(path).map_err(|source| PersistError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    match load_from(engine, BufReader::new(file), verify) {
        Ok(report) => {
            info!(
                path = %path.display(),
                people = report.stats.people,
                rooms = report.stats.rooms,
                meetings = report.stats.meetings,
                "data loaded"
            );
            Ok(report)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "load failed, previous state restored");
            Err(err)
        }
    }
}

/// Write the live model to `path`. The model is never modified; only
/// the destination file is affected by a failure.
pub fn save_file(schedule: &Schedule, path: &Path) -> Result<SaveReport, PersistError> {
    let report = export_to_file(schedule, path)?;
    info!(path = %path.display(), bytes = report.bytes, sha256 = %report.sha256, "data saved");
    Ok(report)
}

fn build<R: BufRead>(reader: R, verify: bool) -> Result<Schedule, PersistError> {
    let schedule = decode_schedule(reader)?;
    if verify {
        try_validate_invariants(&schedule).map_err(PersistError::InvariantViolation)?;
    }
    Ok(schedule)
}
