//! ---
//! opm_section: "11-simulation"
//! opm_subsection: "module"
//! opm_type: "source"
//! opm_scope: "code"
//! opm_description: "Static alert feed shown on the dashboard."
//! opm_version: "v0.1.0"
//! opm_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};
use strum::Display;

/// Alert severity for the dashboard feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertLevel {
    Critical,
    Warning,
    Info,
}

/// One row of the alert feed. The feed is a fixed seed list in this version;
/// nothing inserts, expires, or correlates alerts with readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub level: AlertLevel,
    pub message: String,
    pub time: String,
}

/// The static alert feed displayed at startup.
pub fn seed_alerts() -> Vec<Alert> {
    vec![
        Alert {
            id: "1".to_owned(),
            level: AlertLevel::Warning,
            message: "AGZU pressure approaching upper limit".to_owned(),
            time: "14:32".to_owned(),
        },
        Alert {
            id: "2".to_owned(),
            level: AlertLevel::Info,
            message: "Scheduled maintenance due in 24 hours".to_owned(),
            time: "14:15".to_owned(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_feed_has_expected_levels() {
        let alerts = seed_alerts();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].level, AlertLevel::Warning);
        assert_eq!(alerts[1].level, AlertLevel::Info);
    }

    #[test]
    fn levels_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&AlertLevel::Critical).unwrap(),
            "\"critical\""
        );
        assert_eq!(AlertLevel::Warning.to_string(), "warning");
    }
}
