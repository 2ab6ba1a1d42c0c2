//! Odometer, range, fill levels and HV battery temperature

use serde::{Deserialize, Serialize};

use crate::record::Resource;
use crate::schema::{FieldSpec, Schema, ValueType};

pub static MEASUREMENTS: Schema = Schema::new(
    "Measurements",
    &[
        FieldSpec::new("range_status", ValueType::Record(&RANGE_STATUS)),
        FieldSpec::new("odometer_status", ValueType::Record(&ODOMETER_STATUS)),
        FieldSpec::new("fuel_level_status", ValueType::Record(&FUEL_LEVEL_STATUS)),
        FieldSpec::new(
            "temperature_battery_status",
            ValueType::Record(&TEMPERATURE_BATTERY_STATUS),
        ),
    ],
);

pub static RANGE_STATUS: Schema = Schema::new(
    "RangeStatus",
    &[
        FieldSpec::new("electric_range", ValueType::Int),
        FieldSpec::new("gasoline_range", ValueType::Int),
        FieldSpec::new("total_range_km", ValueType::Int),
    ],
);

pub static ODOMETER_STATUS: Schema = Schema::new(
    "OdometerStatus",
    &[FieldSpec::new("odometer", ValueType::Int)],
);

pub static FUEL_LEVEL_STATUS: Schema = Schema::new(
    "FuelLevelStatus",
    &[
        FieldSpec::new("current_soc_pct", ValueType::Int),
        FieldSpec::new("current_fuel_level_pct", ValueType::Int),
        FieldSpec::new("primary_engine_type", ValueType::Str),
        FieldSpec::new("secondary_engine_type", ValueType::Str),
        FieldSpec::new("car_type", ValueType::Str),
    ],
);

pub static TEMPERATURE_BATTERY_STATUS: Schema = Schema::new(
    "TemperatureBatteryStatus",
    &[
        FieldSpec::new("temperature_hv_battery_max_k", ValueType::Float).required(),
        FieldSpec::new("temperature_hv_battery_min_k", ValueType::Float).required(),
    ],
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    pub range_status: Option<RangeStatus>,
    pub odometer_status: Option<OdometerStatus>,
    pub fuel_level_status: Option<FuelLevelStatus>,
    pub temperature_battery_status: Option<TemperatureBatteryStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeStatus {
    pub electric_range: Option<i64>,
    pub gasoline_range: Option<i64>,
    pub total_range_km: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OdometerStatus {
    pub odometer: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuelLevelStatus {
    pub current_soc_pct: Option<i64>,
    pub current_fuel_level_pct: Option<i64>,
    pub primary_engine_type: Option<String>,
    pub secondary_engine_type: Option<String>,
    pub car_type: Option<String>,
}

/// HV battery temperature bounds in Kelvin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureBatteryStatus {
    pub temperature_hv_battery_max_k: f64,
    pub temperature_hv_battery_min_k: f64,
}

const KELVIN_OFFSET: f64 = 273.15;

impl TemperatureBatteryStatus {
    pub fn max_celsius(&self) -> f64 {
        self.temperature_hv_battery_max_k - KELVIN_OFFSET
    }

    pub fn min_celsius(&self) -> f64 {
        self.temperature_hv_battery_min_k - KELVIN_OFFSET
    }
}

impl Resource for Measurements {
    fn schema() -> &'static Schema {
        &MEASUREMENTS
    }
}

impl Resource for TemperatureBatteryStatus {
    fn schema() -> &'static Schema {
        &TEMPERATURE_BATTERY_STATUS
    }
}

impl Resource for RangeStatus {
    fn schema() -> &'static Schema {
        &RANGE_STATUS
    }
}

impl Resource for OdometerStatus {
    fn schema() -> &'static Schema {
        &ODOMETER_STATUS
    }
}

impl Resource for FuelLevelStatus {
    fn schema() -> &'static Schema {
        &FUEL_LEVEL_STATUS
    }
}
