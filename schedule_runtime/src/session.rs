//! Session — one live schedule plus the configuration it persists with.
//!
//! Commands go straight to the kernel engine. Save and load resolve
//! names against `data_dir`; absolute paths are used as given.
//! A load either replaces the whole model or leaves it untouched.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use schedule_kernel::hashing::canonical_hash;
use schedule_kernel::{Command, Outcome, Schedule, ScheduleEngine, ScheduleError};

use crate::config::SessionConfig;
use crate::error::PersistError;
use crate::snapshot_codec::SaveReport;
use crate::stats::ScheduleStats;
use crate::transaction::{self, LoadReport};

pub struct Session {
    config: SessionConfig,
    engine: ScheduleEngine,
}

impl Session {
    /// Empty schedule under `config`.
    pub fn new(config: SessionConfig) -> Self {
        debug!(data_dir = %config.data_dir.display(), "session opened");
        Self {
            config,
            engine: ScheduleEngine::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn schedule(&self) -> &Schedule {
        self.engine.schedule()
    }

    pub fn current_hash(&self) -> String {
        canonical_hash(self.engine.schedule())
    }

    pub fn stats(&self) -> ScheduleStats {
        ScheduleStats::of(self.engine.schedule())
    }

    /// Apply one command. A rejected command leaves the model unchanged.
    pub fn apply(&mut self, command: &Command) -> Result<Outcome, ScheduleError> {
        self.engine.apply(command)
    }

    /// Path a snapshot name refers to.
    pub fn resolve(&self, name: impl AsRef<Path>) -> PathBuf {
        self.config.data_dir.join(name)
    }

    /// Write the live model to `name`.
    pub fn save(&self, name: impl AsRef<Path>) -> Result<SaveReport, PersistError> {
        if self.config.create_data_dir && !self.config.data_dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.config.data_dir).map_err(|source| PersistError::Open {
                path: self.config.data_dir.clone(),
                source,
            })?;
        }
        let path = self.resolve(name);
        transaction::save_file(self.engine.schedule(), &path)
    }

    /// Replace the live model with the one stored at `name`.
    pub fn load(&mut self, name: impl AsRef<Path>) -> Result<LoadReport, PersistError> {
        let path = self.resolve(name);
        let report = transaction::load_file(&mut self.engine, &path, self.config.verify_after_load)?;
        if !report.diff.is_empty() {
            info!(
                added_people = report.diff.added_people.len(),
                removed_people = report.diff.removed_people.len(),
                added_rooms = report.diff.added_rooms.len(),
                removed_rooms = report.diff.removed_rooms.len(),
                meeting_delta = report.diff.meeting_delta,
                "model replaced"
            );
        }
        Ok(report)
    }
}
