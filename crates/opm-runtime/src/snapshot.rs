//! ---
//! opm_section: "01-core-functionality"
//! opm_subsection: "module"
//! opm_type: "source"
//! opm_scope: "code"
//! opm_description: "Committed dashboard snapshots and their store."
//! opm_version: "v0.1.0"
//! opm_owner: "tbd"
//! ---
use chrono::{DateTime, Local};
use opm_telemetry::{Alert, CurrentReadings, HistorySample};
use parking_lot::RwLock;
use serde::Serialize;

/// Everything the presentation layer reads after one committed tick.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub tick: u64,
    pub committed_at: DateTime<Local>,
    pub readings: CurrentReadings,
    pub history: Vec<HistorySample>,
    pub alerts: Vec<Alert>,
}

/// Latest-snapshot store: one writer (the tick task), any number of readers.
///
/// Readers always observe a fully committed snapshot; the lock is held only
/// for the clone, never across a tick.
#[derive(Debug)]
pub struct SnapshotStore {
    latest: RwLock<DashboardSnapshot>,
}

impl SnapshotStore {
    pub fn new(initial: DashboardSnapshot) -> Self {
        Self {
            latest: RwLock::new(initial),
        }
    }

    pub fn commit(&self, snapshot: DashboardSnapshot) {
        *self.latest.write() = snapshot;
    }

    pub fn latest(&self) -> DashboardSnapshot {
        self.latest.read().clone()
    }

    pub fn current_readings(&self) -> CurrentReadings {
        self.latest.read().readings.clone()
    }

    pub fn history(&self) -> Vec<HistorySample> {
        self.latest.read().history.clone()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.latest.read().alerts.clone()
    }

    pub fn tick(&self) -> u64 {
        self.latest.read().tick
    }
}
