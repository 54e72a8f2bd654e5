//! ---
//! opm_section: "01-core-functionality"
//! opm_subsection: "module"
//! opm_type: "source"
//! opm_scope: "code"
//! opm_description: "Monitor runtime module exports."
//! opm_version: "v0.1.0"
//! opm_owner: "tbd"
//! ---
//! Runtime glue for the OPM monitor: a single rate-limited tick task that
//! owns the telemetry simulator, a snapshot store for passive readers, and a
//! subscriber registry for per-tick callbacks.

pub mod monitor;
pub mod rate;
pub mod snapshot;
pub mod subscribers;

pub use monitor::{Monitor, MonitorHandle, MonitorSettings};
pub use rate::RateLimiter;
pub use snapshot::{DashboardSnapshot, SnapshotStore};
pub use subscribers::{SubscriberRegistry, SubscriptionId, TickCallback};
