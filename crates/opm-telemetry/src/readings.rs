//! ---
//! opm_section: "11-simulation"
//! opm_subsection: "module"
//! opm_type: "source"
//! opm_scope: "code"
//! opm_description: "Live reading record for the monitored process."
//! opm_version: "v0.1.0"
//! opm_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};

use crate::field::{Field, FieldTable};

/// The six live readings at the latest committed tick.
///
/// Pressures are in bar, temperatures in °C, flow in m³/h, oil level in
/// percent of tank capacity. Each value stays inside its field's declared
/// bounds after every update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentReadings {
    pub agzu_pressure: f64,
    pub agzu_temperature: f64,
    pub separator_pressure: f64,
    pub separator_temperature: f64,
    pub flow_rate: f64,
    pub oil_level: f64,
}

impl CurrentReadings {
    /// Readings at the fixed baseline values the simulation starts from.
    pub fn baseline(table: &FieldTable) -> Self {
        Self {
            agzu_pressure: table.spec(Field::AgzuPressure).baseline,
            agzu_temperature: table.spec(Field::AgzuTemperature).baseline,
            separator_pressure: table.spec(Field::SeparatorPressure).baseline,
            separator_temperature: table.spec(Field::SeparatorTemperature).baseline,
            flow_rate: table.spec(Field::FlowRate).baseline,
            oil_level: table.spec(Field::OilLevel).baseline,
        }
    }

    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::AgzuPressure => self.agzu_pressure,
            Field::AgzuTemperature => self.agzu_temperature,
            Field::SeparatorPressure => self.separator_pressure,
            Field::SeparatorTemperature => self.separator_temperature,
            Field::FlowRate => self.flow_rate,
            Field::OilLevel => self.oil_level,
        }
    }

    pub fn set(&mut self, field: Field, value: f64) {
        match field {
            Field::AgzuPressure => self.agzu_pressure = value,
            Field::AgzuTemperature => self.agzu_temperature = value,
            Field::SeparatorPressure => self.separator_pressure = value,
            Field::SeparatorTemperature => self.separator_temperature = value,
            Field::FlowRate => self.flow_rate = value,
            Field::OilLevel => self.oil_level = value,
        }
    }
}
