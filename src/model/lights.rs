//! Exterior lights

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce::Coercion;
use crate::record::Resource;
use crate::schema::{FieldSpec, Schema, ValueType};

use super::access::reports;

pub static VEHICLE_LIGHTS: Schema = Schema::new(
    "VehicleLights",
    &[FieldSpec::new("lights_status", ValueType::Record(&LIGHTS_STATUS))],
);

pub static LIGHTS_STATUS: Schema = Schema::new(
    "LightsStatus",
    &[FieldSpec::new("lights", ValueType::Map).coerce(Coercion::StatusMap)],
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleLights {
    pub lights_status: Option<LightsStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightsStatus {
    /// Light id -> status as reported
    pub lights: Option<BTreeMap<String, Value>>,
}

impl LightsStatus {
    /// Ids of lights reported `on`
    pub fn lights_on(&self) -> Vec<&str> {
        self.lights
            .iter()
            .flatten()
            .filter(|(_, status)| reports(status, "on"))
            .map(|(id, _)| id.as_str())
            .collect()
    }
}

impl Resource for VehicleLights {
    fn schema() -> &'static Schema {
        &VEHICLE_LIGHTS
    }
}

impl Resource for LightsStatus {
    fn schema() -> &'static Schema {
        &LIGHTS_STATUS
    }
}
