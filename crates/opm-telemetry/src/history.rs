//! ---
//! opm_section: "11-simulation"
//! opm_subsection: "module"
//! opm_type: "source"
//! opm_scope: "code"
//! opm_description: "Rolling trend history window."
//! opm_version: "v0.1.0"
//! opm_owner: "tbd"
//! ---
use std::collections::VecDeque;

use chrono::{DateTime, Local};
use opm_common::time::{clock_label, minutes_before};
use rand::Rng;
use serde::{Deserialize, Serialize};

// Seed draws are independent of the live readings: the window is back-filled
// as if the monitor had already been watching for twenty minutes.
const SEED_PRESSURE: (f64, f64) = (45.0, 50.0);
const SEED_TEMPERATURE: (f64, f64) = (65.0, 73.0);
const SEED_FLOW: (f64, f64) = (150.0, 165.0);

/// One past observation on the trend charts: AGZU pressure and temperature
/// plus line flow, tagged with a minute-resolution clock label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySample {
    pub timestamp: String,
    pub pressure: f64,
    pub temperature: f64,
    pub flow_rate: f64,
}

/// Fixed-capacity FIFO of [`HistorySample`], oldest first.
///
/// Once seeded the window holds exactly `capacity` samples forever: each
/// recorded sample evicts the oldest one.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    samples: VecDeque<HistorySample>,
    capacity: usize,
}

impl HistoryBuffer {
    /// Back-fill a full window of synthetic past samples spaced one minute
    /// apart, ending at `now`.
    pub fn seeded<R: Rng + ?Sized>(capacity: usize, rng: &mut R, now: DateTime<Local>) -> Self {
        let mut samples = VecDeque::with_capacity(capacity);
        for slot in 0..capacity {
            let minutes_back = (capacity - 1 - slot) as i64;
            samples.push_back(HistorySample {
                timestamp: clock_label(minutes_before(now, minutes_back)),
                pressure: rng.gen_range(SEED_PRESSURE.0..SEED_PRESSURE.1),
                temperature: rng.gen_range(SEED_TEMPERATURE.0..SEED_TEMPERATURE.1),
                flow_rate: rng.gen_range(SEED_FLOW.0..SEED_FLOW.1),
            });
        }
        Self { samples, capacity }
    }

    /// Append the newest sample, evicting the oldest when the window is full.
    pub fn record(&mut self, sample: HistorySample) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn oldest(&self) -> Option<&HistorySample> {
        self.samples.front()
    }

    pub fn newest(&self) -> Option<&HistorySample> {
        self.samples.back()
    }

    pub fn samples(&self) -> impl Iterator<Item = &HistorySample> {
        self.samples.iter()
    }

    pub fn to_vec(&self) -> Vec<HistorySample> {
        self.samples.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample(tag: &str) -> HistorySample {
        HistorySample {
            timestamp: tag.to_owned(),
            pressure: 46.0,
            temperature: 68.0,
            flow_rate: 155.0,
        }
    }

    #[test]
    fn seed_fills_the_whole_window() {
        let mut rng = StdRng::seed_from_u64(3);
        let buffer = HistoryBuffer::seeded(21, &mut rng, Local::now());
        assert_eq!(buffer.len(), 21);
        assert_eq!(buffer.capacity(), 21);
        for sample in buffer.samples() {
            assert!(sample.pressure >= SEED_PRESSURE.0 && sample.pressure < SEED_PRESSURE.1);
            assert!(
                sample.temperature >= SEED_TEMPERATURE.0
                    && sample.temperature < SEED_TEMPERATURE.1
            );
            assert!(sample.flow_rate >= SEED_FLOW.0 && sample.flow_rate < SEED_FLOW.1);
        }
    }

    #[test]
    fn record_keeps_length_invariant() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut buffer = HistoryBuffer::seeded(21, &mut rng, Local::now());
        for round in 0..100 {
            buffer.record(sample(&format!("t{round}")));
            assert_eq!(buffer.len(), 21);
        }
    }

    #[test]
    fn record_is_fifo() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut buffer = HistoryBuffer::seeded(3, &mut rng, Local::now());
        buffer.record(sample("a"));
        buffer.record(sample("b"));
        buffer.record(sample("c"));
        buffer.record(sample("d"));
        let order: Vec<&str> = buffer
            .samples()
            .map(|sample| sample.timestamp.as_str())
            .collect();
        assert_eq!(order, vec!["b", "c", "d"]);
        assert_eq!(buffer.oldest().unwrap().timestamp, "b");
        assert_eq!(buffer.newest().unwrap().timestamp, "d");
    }
}
