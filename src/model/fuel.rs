//! Fuel and combined range per engine

use serde::{Deserialize, Serialize};

use crate::record::Resource;
use crate::schema::{FieldSpec, Schema, ValueType};

pub static FUEL_STATUS: Schema = Schema::new(
    "FuelStatus",
    &[FieldSpec::new("range_status", ValueType::Record(&FUEL_RANGE_STATUS))],
);

pub static FUEL_RANGE_STATUS: Schema = Schema::new(
    "FuelRangeStatus",
    &[
        FieldSpec::new("car_type", ValueType::Str),
        FieldSpec::new("primary_engine", ValueType::Record(&ENGINE)),
        FieldSpec::new("secondary_engine", ValueType::Record(&ENGINE)),
        FieldSpec::new("total_range_km", ValueType::Int),
    ],
);

/// Primary and secondary engines share one shape
pub static ENGINE: Schema = Schema::new(
    "Engine",
    &[
        FieldSpec::new("type", ValueType::Str),
        FieldSpec::new("current_soc_pct", ValueType::Str),
        FieldSpec::new("remaining_range_km", ValueType::Int),
        FieldSpec::new("current_fuel_level_pct", ValueType::Int),
    ],
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuelStatus {
    pub range_status: Option<FuelRangeStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuelRangeStatus {
    pub car_type: Option<String>,
    pub primary_engine: Option<Engine>,
    pub secondary_engine: Option<Engine>,
    pub total_range_km: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Engine {
    /// `electric`, `gasoline`, `diesel`, ...
    #[serde(rename = "type")]
    pub engine_type: Option<String>,
    /// Reported as text; numbers are rendered
    pub current_soc_pct: Option<String>,
    pub remaining_range_km: Option<i64>,
    pub current_fuel_level_pct: Option<i64>,
}

impl Engine {
    pub fn is_electric(&self) -> bool {
        self.engine_type.as_deref() == Some("electric")
    }
}

impl FuelRangeStatus {
    /// Range of the electric engine, whichever slot it is in
    pub fn electric_range_km(&self) -> Option<i64> {
        [&self.primary_engine, &self.secondary_engine]
            .into_iter()
            .flatten()
            .find(|e| e.is_electric())
            .and_then(|e| e.remaining_range_km)
    }
}

impl Resource for FuelStatus {
    fn schema() -> &'static Schema {
        &FUEL_STATUS
    }
}

impl Resource for Engine {
    fn schema() -> &'static Schema {
        &ENGINE
    }
}

impl Resource for FuelRangeStatus {
    fn schema() -> &'static Schema {
        &FUEL_RANGE_STATUS
    }
}
