//! ---
//! opm_section: "11-simulation"
//! opm_subsection: "module"
//! opm_type: "source"
//! opm_scope: "code"
//! opm_description: "Display severity classification for readings."
//! opm_version: "v0.1.0"
//! opm_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};
use strum::Display;

/// Display band for a reading against its declared range. Drives colour
/// selection only; nothing feeds back into the walk or the alert feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Severity {
    OutOfRange,
    NearLimit,
    Normal,
}

/// Classify a value against `[min, max]`.
///
/// Near-limit means within the outer 10% of the range width on either side,
/// inclusive at the band edge. The band is defined on the width rather than
/// on scaled endpoints so that it behaves the same for ranges far from zero.
pub fn classify(value: f64, min: f64, max: f64) -> Severity {
    if value < min || value > max {
        return Severity::OutOfRange;
    }
    let margin = (max - min) * 0.1;
    if value <= min + margin || value >= max - margin {
        return Severity::NearLimit;
    }
    Severity::Normal
}
