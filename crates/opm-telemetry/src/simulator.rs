//! ---
//! opm_section: "11-simulation"
//! opm_subsection: "module"
//! opm_type: "source"
//! opm_scope: "code"
//! opm_description: "Bounded random-walk telemetry generator."
//! opm_version: "v0.1.0"
//! opm_owner: "tbd"
//! ---
use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::field::{Field, FieldTable};
use crate::history::{HistoryBuffer, HistorySample};
use crate::readings::CurrentReadings;

/// Owns the live readings and the rolling history, and advances both on each
/// tick. Single writer; readers only ever see committed snapshots taken
/// between ticks.
///
/// The random source is a type parameter so tests can drive the walk with a
/// fixed-sequence generator. Production code seeds a [`StdRng`].
#[derive(Debug)]
pub struct TelemetrySimulator<R = StdRng> {
    table: FieldTable,
    readings: CurrentReadings,
    history: HistoryBuffer,
    rng: R,
    ticks: u64,
}

impl TelemetrySimulator<StdRng> {
    pub fn new(table: FieldTable, capacity: usize, seed: u64, now: DateTime<Local>) -> Self {
        Self::with_rng(table, capacity, StdRng::seed_from_u64(seed), now)
    }
}

impl<R: Rng> TelemetrySimulator<R> {
    pub fn with_rng(table: FieldTable, capacity: usize, mut rng: R, now: DateTime<Local>) -> Self {
        let readings = CurrentReadings::baseline(&table);
        let history = HistoryBuffer::seeded(capacity, &mut rng, now);
        Self {
            table,
            readings,
            history,
            rng,
            ticks: 0,
        }
    }

    /// Advance the simulation by one tick and return the committed readings.
    ///
    /// The history sample recorded here carries the *pre-tick* readings, so
    /// the newest trend point trails the live display by one tick. The lag
    /// is intentional: the trend charts show what the process looked like
    /// when the tick fired, not the value that replaced it.
    pub fn tick(&mut self, now: DateTime<Local>) -> CurrentReadings {
        let sample = HistorySample {
            timestamp: opm_common::time::clock_label(now),
            pressure: self.readings.agzu_pressure,
            temperature: self.readings.agzu_temperature,
            flow_rate: self.readings.flow_rate,
        };

        for field in Field::ALL {
            let spec = self.table.spec(field);
            let next = spec.walk(self.readings.get(field), &mut self.rng);
            self.readings.set(field, next);
        }

        self.history.record(sample);
        self.ticks += 1;
        self.readings.clone()
    }

    pub fn current_readings(&self) -> &CurrentReadings {
        &self.readings
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn field_table(&self) -> &FieldTable {
        &self.table
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
