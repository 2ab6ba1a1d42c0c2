//! Service intervals, oil level and warning lights

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce::Coercion;
use crate::record::Resource;
use crate::schema::{FieldSpec, Schema, ValueType};

pub static VEHICLE_HEALTH_INSPECTION: Schema = Schema::new(
    "VehicleHealthInspection",
    &[FieldSpec::new("maintenance_status", ValueType::Record(&MAINTENANCE_STATUS))],
);

pub static MAINTENANCE_STATUS: Schema = Schema::new(
    "MaintenanceStatus",
    &[
        FieldSpec::new("inspection_due_days", ValueType::Int),
        FieldSpec::new("inspection_due_km", ValueType::Int),
        FieldSpec::new("mileage_km", ValueType::Int),
        FieldSpec::new("oil_service_due_days", ValueType::Int),
        FieldSpec::new("oil_service_due_km", ValueType::Int),
    ],
);

pub static OIL_LEVEL: Schema = Schema::new(
    "OilLevel",
    &[FieldSpec::new("oil_level_status", ValueType::Record(&OIL_LEVEL_STATUS))],
);

pub static OIL_LEVEL_STATUS: Schema = Schema::new(
    "OilLevelStatus",
    &[FieldSpec::new("value", ValueType::Bool).required()],
);

pub static VEHICLE_HEALTH_WARNINGS: Schema = Schema::new(
    "VehicleHealthWarnings",
    &[FieldSpec::new("warning_lights", ValueType::Record(&WARNING_LIGHTS))],
);

pub static WARNING_LIGHTS: Schema = Schema::new(
    "WarningLights",
    &[FieldSpec::new("lights", ValueType::Map).coerce(Coercion::StatusMap)],
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleHealthInspection {
    pub maintenance_status: Option<MaintenanceStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceStatus {
    pub inspection_due_days: Option<i64>,
    pub inspection_due_km: Option<i64>,
    pub mileage_km: Option<i64>,
    pub oil_service_due_days: Option<i64>,
    pub oil_service_due_km: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OilLevel {
    pub oil_level_status: Option<OilLevelStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OilLevelStatus {
    pub value: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleHealthWarnings {
    pub warning_lights: Option<WarningLights>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WarningLights {
    pub lights: Option<BTreeMap<String, Value>>,
}

impl MaintenanceStatus {
    /// Whichever of inspection or oil service comes first, in days
    pub fn next_service_days(&self) -> Option<i64> {
        match (self.inspection_due_days, self.oil_service_due_days) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

impl Resource for VehicleHealthInspection {
    fn schema() -> &'static Schema {
        &VEHICLE_HEALTH_INSPECTION
    }
}

impl Resource for OilLevel {
    fn schema() -> &'static Schema {
        &OIL_LEVEL
    }
}

impl Resource for VehicleHealthWarnings {
    fn schema() -> &'static Schema {
        &VEHICLE_HEALTH_WARNINGS
    }
}

impl Resource for WarningLights {
    fn schema() -> &'static Schema {
        &WARNING_LIGHTS
    }
}

impl Resource for MaintenanceStatus {
    fn schema() -> &'static Schema {
        &MAINTENANCE_STATUS
    }
}

impl Resource for OilLevelStatus {
    fn schema() -> &'static Schema {
        &OIL_LEVEL_STATUS
    }
}
