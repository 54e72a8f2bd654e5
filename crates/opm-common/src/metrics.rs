//! ---
//! opm_section: "01-core-functionality"
//! opm_subsection: "module"
//! opm_type: "source"
//! opm_scope: "code"
//! opm_description: "Shared primitives and utilities for the OPM runtime."
//! opm_version: "v0.1.0"
//! opm_owner: "tbd"
//! ---
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;

/// In-process histogram of tick-timing jitter samples.
#[derive(Debug, Default)]
pub struct JitterHistogram {
    samples: Mutex<Vec<f64>>,
}

impl JitterHistogram {
    pub fn record(&self, jitter: Duration) {
        let nanos = jitter.as_secs_f64() * 1_000_000_000.0;
        self.samples.lock().push(nanos);
    }

    pub fn summary(&self) -> Option<JitterSummary> {
        let samples = self.samples.lock();
        let slice = samples.as_slice();
        if slice.is_empty() {
            return None;
        }
        let count = slice.len() as f64;
        let mean = slice.iter().sum::<f64>() / count;
        let variance = if slice.len() > 1 {
            let sum_sq = slice
                .iter()
                .map(|value| {
                    let delta = value - mean;
                    delta * delta
                })
                .sum::<f64>();
            sum_sq / (count - 1.0)
        } else {
            0.0
        };
        let max = slice.iter().copied().fold(f64::MIN, f64::max);
        let min = slice.iter().copied().fold(f64::MAX, f64::min);
        Some(JitterSummary {
            mean_ns: mean,
            std_dev_ns: variance.sqrt(),
            max_ns: max,
            min_ns: min,
            samples: slice.len() as u64,
        })
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        if let Some(summary) = self.summary() {
            let mut file = File::create(path)?;
            let json = serde_json::to_vec_pretty(&summary)
                .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
            file.write_all(&json)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct JitterSummary {
    pub mean_ns: f64,
    pub std_dev_ns: f64,
    pub max_ns: f64,
    pub min_ns: f64,
    pub samples: u64,
}

/// Measures how far successive monitor ticks drift from the configured period.
#[derive(Debug)]
pub struct TickTimingReporter {
    target_interval: Duration,
    last_tick: Mutex<Option<Instant>>,
    histogram: JitterHistogram,
}

impl TickTimingReporter {
    pub fn new(target_interval: Duration) -> Self {
        Self {
            target_interval,
            last_tick: Mutex::new(None),
            histogram: JitterHistogram::default(),
        }
    }

    pub fn record_tick(&self) {
        let mut last_tick = self.last_tick.lock();
        let now = Instant::now();
        if let Some(previous) = *last_tick {
            let actual = now.duration_since(previous);
            let jitter = if actual > self.target_interval {
                actual - self.target_interval
            } else {
                self.target_interval - actual
            };
            self.histogram.record(jitter);
        }
        *last_tick = Some(now);
    }

    pub fn histogram(&self) -> &JitterHistogram {
        &self.histogram
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_histogram_has_no_summary() {
        assert!(JitterHistogram::default().summary().is_none());
    }

    #[test]
    fn summary_reflects_recorded_samples() {
        let histogram = JitterHistogram::default();
        histogram.record(Duration::from_millis(1));
        histogram.record(Duration::from_millis(3));
        let summary = histogram.summary().unwrap();
        assert_eq!(summary.samples, 2);
        assert!((summary.mean_ns - 2_000_000.0).abs() < 1.0);
        assert!(summary.min_ns < summary.max_ns);
    }

    #[test]
    fn first_tick_records_nothing() {
        let reporter = TickTimingReporter::new(Duration::from_millis(10));
        reporter.record_tick();
        assert!(reporter.histogram().summary().is_none());
    }

    #[test]
    fn summary_round_trips_to_json() {
        let histogram = JitterHistogram::default();
        histogram.record(Duration::from_millis(2));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jitter.json");
        histogram.write_json(&path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("mean_ns"));
    }
}
