//! ---
//! opm_section: "11-simulation"
//! opm_subsection: "module"
//! opm_type: "source"
//! opm_scope: "code"
//! opm_description: "Telemetry field definitions and walk parameters."
//! opm_version: "v0.1.0"
//! opm_owner: "tbd"
//! ---
use opm_common::config::FieldTuning;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The six live measurements tracked by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    AgzuPressure,
    AgzuTemperature,
    SeparatorPressure,
    SeparatorTemperature,
    FlowRate,
    OilLevel,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::AgzuPressure,
        Field::AgzuTemperature,
        Field::SeparatorPressure,
        Field::SeparatorTemperature,
        Field::FlowRate,
        Field::OilLevel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::AgzuPressure => "agzu_pressure",
            Field::AgzuTemperature => "agzu_temperature",
            Field::SeparatorPressure => "separator_pressure",
            Field::SeparatorTemperature => "separator_temperature",
            Field::FlowRate => "flow_rate",
            Field::OilLevel => "oil_level",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.name() == name)
    }
}

/// Walk parameters for one field: starting point, maximum step per tick, and
/// the hard bounds the value may never leave.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub baseline: f64,
    pub step: f64,
    pub min: f64,
    pub max: f64,
}

impl FieldSpec {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// One bounded random-walk step: perturb by a uniform draw from
    /// `(-step/2, step/2)` and clamp immediately. Clamping after every
    /// perturbation is what makes out-of-range values impossible.
    pub fn walk<R: Rng + ?Sized>(&self, current: f64, rng: &mut R) -> f64 {
        let half = self.step / 2.0;
        self.clamp(current + rng.gen_range(-half..=half))
    }

    pub fn validate(&self, field: &'static str) -> Result<(), FieldSpecError> {
        if self.step <= 0.0 {
            return Err(FieldSpecError::NonPositiveStep {
                field,
                step: self.step,
            });
        }
        if self.min >= self.max {
            return Err(FieldSpecError::InvertedBounds {
                field,
                min: self.min,
                max: self.max,
            });
        }
        if self.baseline < self.min || self.baseline > self.max {
            return Err(FieldSpecError::BaselineOutOfBounds {
                field,
                baseline: self.baseline,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Structural problems in a field specification, surfaced when configuration
/// overrides are applied.
#[derive(Debug, Error, PartialEq)]
pub enum FieldSpecError {
    #[error("{field}: step must be positive, got {step}")]
    NonPositiveStep { field: &'static str, step: f64 },
    #[error("{field}: min {min} must be below max {max}")]
    InvertedBounds {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("{field}: baseline {baseline} outside [{min}, {max}]")]
    BaselineOutOfBounds {
        field: &'static str,
        baseline: f64,
        min: f64,
        max: f64,
    },
}

/// Complete walk-parameter table for all six fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldTable {
    specs: [FieldSpec; 6],
}

impl Default for FieldTable {
    fn default() -> Self {
        // Baselines and bounds taken from the monitored process: AGZU feed
        // pressure/temperature, downstream separator pair, line flow, tank level.
        Self {
            specs: [
                FieldSpec {
                    baseline: 45.2,
                    step: 2.0,
                    min: 40.0,
                    max: 50.0,
                },
                FieldSpec {
                    baseline: 68.5,
                    step: 1.5,
                    min: 60.0,
                    max: 75.0,
                },
                FieldSpec {
                    baseline: 12.8,
                    step: 0.5,
                    min: 10.0,
                    max: 15.0,
                },
                FieldSpec {
                    baseline: 42.3,
                    step: 1.0,
                    min: 38.0,
                    max: 48.0,
                },
                FieldSpec {
                    baseline: 156.7,
                    step: 5.0,
                    min: 140.0,
                    max: 170.0,
                },
                FieldSpec {
                    baseline: 78.0,
                    step: 2.0,
                    min: 70.0,
                    max: 85.0,
                },
            ],
        }
    }
}

impl FieldTable {
    pub fn spec(&self, field: Field) -> &FieldSpec {
        &self.specs[Self::index(field)]
    }

    /// Overlay configuration tuning onto one field's built-in parameters.
    pub fn apply_tuning(&mut self, field: Field, tuning: &FieldTuning) {
        let spec = &mut self.specs[Self::index(field)];
        if let Some(baseline) = tuning.baseline {
            spec.baseline = baseline;
        }
        if let Some(step) = tuning.step {
            spec.step = step;
        }
        if let Some(min) = tuning.min {
            spec.min = min;
        }
        if let Some(max) = tuning.max {
            spec.max = max;
        }
    }

    pub fn validate(&self) -> Result<(), FieldSpecError> {
        for field in Field::ALL {
            self.spec(field).validate(field.name())?;
        }
        Ok(())
    }

    fn index(field: Field) -> usize {
        match field {
            Field::AgzuPressure => 0,
            Field::AgzuTemperature => 1,
            Field::SeparatorPressure => 2,
            Field::SeparatorTemperature => 3,
            Field::FlowRate => 4,
            Field::OilLevel => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn names_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_name(field.name()), Some(field));
        }
        assert_eq!(Field::from_name("casing_pressure"), None);
    }

    #[test]
    fn default_table_validates() {
        FieldTable::default().validate().unwrap();
    }

    #[test]
    fn walk_never_escapes_bounds() {
        let table = FieldTable::default();
        let mut rng = StdRng::seed_from_u64(11);
        for field in Field::ALL {
            let spec = table.spec(field);
            let mut value = spec.baseline;
            for _ in 0..10_000 {
                value = spec.walk(value, &mut rng);
                assert!(value >= spec.min && value <= spec.max, "{}", field.name());
            }
        }
    }

    #[test]
    fn walk_step_is_bounded() {
        let table = FieldTable::default();
        let mut rng = StdRng::seed_from_u64(12);
        for field in Field::ALL {
            let spec = table.spec(field);
            let mut value = spec.baseline;
            for _ in 0..1_000 {
                let next = spec.walk(value, &mut rng);
                assert!((next - value).abs() <= spec.step, "{}", field.name());
                value = next;
            }
        }
    }

    #[test]
    fn tuning_overlays_only_set_members() {
        let mut table = FieldTable::default();
        table.apply_tuning(
            Field::FlowRate,
            &FieldTuning {
                step: Some(8.0),
                max: Some(180.0),
                ..FieldTuning::default()
            },
        );
        let spec = table.spec(Field::FlowRate);
        assert_eq!(spec.step, 8.0);
        assert_eq!(spec.max, 180.0);
        assert_eq!(spec.min, 140.0);
        assert_eq!(spec.baseline, 156.7);
    }

    #[test]
    fn tuning_can_invalidate_table() {
        let mut table = FieldTable::default();
        table.apply_tuning(
            Field::OilLevel,
            &FieldTuning {
                baseline: Some(95.0),
                ..FieldTuning::default()
            },
        );
        assert!(matches!(
            table.validate(),
            Err(FieldSpecError::BaselineOutOfBounds { field: "oil_level", .. })
        ));
    }
}
