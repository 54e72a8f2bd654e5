//! ---
//! opm_section: "11-simulation"
//! opm_subsection: "01-bootstrap"
//! opm_type: "source"
//! opm_scope: "code"
//! opm_description: "Telemetry simulation module exports and shared types."
//! opm_version: "v0.1.0"
//! opm_owner: "tbd"
//! ---
//! Simulated process telemetry for the OPM dashboard.
//!
//! Everything here is synthesized: six live readings evolve by bounded random
//! walk, a fixed-capacity history window feeds the trend charts, and a static
//! alert feed rounds out the display contract. There is no sensor input and
//! no failure path; clamping keeps every value inside its declared bounds.

pub mod alerts;
pub mod field;
pub mod history;
pub mod readings;
pub mod simulator;
pub mod status;

pub use alerts::{seed_alerts, Alert, AlertLevel};
pub use field::{Field, FieldSpec, FieldSpecError, FieldTable};
pub use history::{HistoryBuffer, HistorySample};
pub use readings::CurrentReadings;
pub use simulator::TelemetrySimulator;
pub use status::{classify, Severity};
