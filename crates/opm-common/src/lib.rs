//! ---
//! opm_section: "01-core-functionality"
//! opm_subsection: "module"
//! opm_type: "source"
//! opm_scope: "code"
//! opm_description: "Shared primitives and utilities for the OPM runtime."
//! opm_version: "v0.1.0"
//! opm_owner: "tbd"
//! ---
//! Core shared primitives for the OPM monitoring workspace.
//! This crate exposes configuration loading, logging, timing, and
//! tick-metrics utilities consumed across the workspace.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod time;

pub use config::{AppConfig, FieldTuning, LoggingConfig, SimulationConfig};
pub use logging::{init_tracing, LogFormat};
pub use metrics::{JitterHistogram, TickTimingReporter};
pub use time::{clock_label, jitter_us, minutes_before};
