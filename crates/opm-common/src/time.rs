//! ---
//! opm_section: "01-core-functionality"
//! opm_subsection: "module"
//! opm_type: "source"
//! opm_scope: "code"
//! opm_description: "Shared primitives and utilities for the OPM runtime."
//! opm_version: "v0.1.0"
//! opm_owner: "tbd"
//! ---
use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, Local};

/// Format a wall-clock instant as the minute-resolution label shown on trend
/// axes and alert rows (`14:32`).
pub fn clock_label(at: DateTime<Local>) -> String {
    at.format("%H:%M").to_string()
}

/// The instant `minutes` whole minutes before `at`. Used when pre-seeding the
/// history window with back-dated samples.
pub fn minutes_before(at: DateTime<Local>, minutes: i64) -> DateTime<Local> {
    at - ChronoDuration::minutes(minutes)
}

/// Signed deviation of an observed interval from its target, in microseconds.
pub fn jitter_us(actual: Duration, expected: Duration) -> i64 {
    let actual_us = actual.as_secs_f64() * 1_000_000.0;
    let expected_us = expected.as_secs_f64() * 1_000_000.0;
    (actual_us - expected_us).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn clock_label_is_minute_resolution() {
        let at = Local.with_ymd_and_hms(2024, 5, 4, 14, 32, 59).unwrap();
        assert_eq!(clock_label(at), "14:32");
    }

    #[test]
    fn minutes_before_steps_backwards() {
        let at = Local.with_ymd_and_hms(2024, 5, 4, 14, 32, 0).unwrap();
        assert_eq!(clock_label(minutes_before(at, 20)), "14:12");
    }

    #[test]
    fn jitter_is_signed() {
        assert_eq!(
            jitter_us(Duration::from_millis(3005), Duration::from_millis(3000)),
            5000
        );
        assert_eq!(
            jitter_us(Duration::from_millis(2995), Duration::from_millis(3000)),
            -5000
        );
    }
}
