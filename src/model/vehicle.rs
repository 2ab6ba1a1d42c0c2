//! The vehicle status aggregate
//!
//! One poll of the status endpoint returns any subset of the sub-resources
//! below, so every one is optional and decoded independently of its
//! siblings: a malformed `charging` document does not cost the caller the
//! `access` state.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::decoder::{Decoder, Failure};
use crate::error::Result;
use crate::key::normalize_key;
use crate::record::Resource;
use crate::schema::{FieldSpec, Schema, ValueType};

use super::access::{Access, ACCESS};
use super::capabilities::{UserCapabilities, USER_CAPABILITIES};
use super::charging::{Charging, CHARGING};
use super::climatisation::{Climatisation, ClimatisationTimers, CLIMATISATION, CLIMATISATION_TIMERS};
use super::fuel::{FuelStatus, FUEL_STATUS};
use super::health::{
    OilLevel, VehicleHealthInspection, VehicleHealthWarnings, OIL_LEVEL,
    VEHICLE_HEALTH_INSPECTION, VEHICLE_HEALTH_WARNINGS,
};
use super::lights::{VehicleLights, VEHICLE_LIGHTS};
use super::measurements::{Measurements, MEASUREMENTS};

pub static MODEL: Schema = Schema::new(
    "Model",
    &[
        FieldSpec::new("user_capabilities", ValueType::Record(&USER_CAPABILITIES)),
        FieldSpec::new("access", ValueType::Record(&ACCESS)),
        FieldSpec::new("charging", ValueType::Record(&CHARGING)),
        FieldSpec::new("climatisation_timers", ValueType::Record(&CLIMATISATION_TIMERS)),
        FieldSpec::new("climatisation", ValueType::Record(&CLIMATISATION)),
        FieldSpec::new("fuel_status", ValueType::Record(&FUEL_STATUS)),
        FieldSpec::new("vehicle_health_inspection", ValueType::Record(&VEHICLE_HEALTH_INSPECTION)),
        FieldSpec::new("vehicle_lights", ValueType::Record(&VEHICLE_LIGHTS)),
        FieldSpec::new("measurements", ValueType::Record(&MEASUREMENTS)),
        FieldSpec::new("oil_level", ValueType::Record(&OIL_LEVEL)),
        FieldSpec::new("vehicle_health_warnings", ValueType::Record(&VEHICLE_HEALTH_WARNINGS)),
    ],
);

/// One sub-resource of the status endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubResource {
    UserCapabilities,
    Access,
    Charging,
    ClimatisationTimers,
    Climatisation,
    FuelStatus,
    VehicleHealthInspection,
    VehicleLights,
    Measurements,
    OilLevel,
    VehicleHealthWarnings,
}

impl SubResource {
    pub const ALL: [SubResource; 11] = [
        SubResource::UserCapabilities,
        SubResource::Access,
        SubResource::Charging,
        SubResource::ClimatisationTimers,
        SubResource::Climatisation,
        SubResource::FuelStatus,
        SubResource::VehicleHealthInspection,
        SubResource::VehicleLights,
        SubResource::Measurements,
        SubResource::OilLevel,
        SubResource::VehicleHealthWarnings,
    ];

    /// Key as sent by the API
    pub fn key(&self) -> &'static str {
        match self {
            Self::UserCapabilities => "userCapabilities",
            Self::Access => "access",
            Self::Charging => "charging",
            Self::ClimatisationTimers => "climatisationTimers",
            Self::Climatisation => "climatisation",
            Self::FuelStatus => "fuelStatus",
            Self::VehicleHealthInspection => "vehicleHealthInspection",
            Self::VehicleLights => "vehicleLights",
            Self::Measurements => "measurements",
            Self::OilLevel => "oilLevel",
            Self::VehicleHealthWarnings => "vehicleHealthWarnings",
        }
    }

    /// Field of [`Model`] holding this sub-resource
    pub fn field(&self) -> &'static str {
        match self {
            Self::UserCapabilities => "user_capabilities",
            Self::Access => "access",
            Self::Charging => "charging",
            Self::ClimatisationTimers => "climatisation_timers",
            Self::Climatisation => "climatisation",
            Self::FuelStatus => "fuel_status",
            Self::VehicleHealthInspection => "vehicle_health_inspection",
            Self::VehicleLights => "vehicle_lights",
            Self::Measurements => "measurements",
            Self::OilLevel => "oil_level",
            Self::VehicleHealthWarnings => "vehicle_health_warnings",
        }
    }

    pub fn schema(&self) -> &'static Schema {
        match self {
            Self::UserCapabilities => &USER_CAPABILITIES,
            Self::Access => &ACCESS,
            Self::Charging => &CHARGING,
            Self::ClimatisationTimers => &CLIMATISATION_TIMERS,
            Self::Climatisation => &CLIMATISATION,
            Self::FuelStatus => &FUEL_STATUS,
            Self::VehicleHealthInspection => &VEHICLE_HEALTH_INSPECTION,
            Self::VehicleLights => &VEHICLE_LIGHTS,
            Self::Measurements => &MEASUREMENTS,
            Self::OilLevel => &OIL_LEVEL,
            Self::VehicleHealthWarnings => &VEHICLE_HEALTH_WARNINGS,
        }
    }

    /// Look up by wire key or field name, in any casing
    pub fn from_key(key: &str) -> Option<Self> {
        let key = normalize_key(key);
        Self::ALL.into_iter().find(|r| r.field() == key)
    }
}

impl fmt::Display for SubResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Decoded vehicle status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub user_capabilities: Option<UserCapabilities>,
    pub access: Option<Access>,
    pub charging: Option<Charging>,
    pub climatisation_timers: Option<ClimatisationTimers>,
    pub climatisation: Option<Climatisation>,
    pub fuel_status: Option<FuelStatus>,
    pub vehicle_health_inspection: Option<VehicleHealthInspection>,
    pub vehicle_lights: Option<VehicleLights>,
    pub measurements: Option<Measurements>,
    pub oil_level: Option<OilLevel>,
    pub vehicle_health_warnings: Option<VehicleHealthWarnings>,
}

impl Resource for Model {
    fn schema() -> &'static Schema {
        &MODEL
    }
}

/// The aggregate plus the sub-resources that failed to decode
#[derive(Debug)]
pub struct StatusReport {
    pub model: Model,
    pub failures: Vec<Failure>,
}

impl StatusReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_resources(&self) -> Vec<SubResource> {
        self.failures
            .iter()
            .filter_map(|f| SubResource::from_key(f.field))
            .collect()
    }
}

impl Model {
    /// Decode a status document, isolating failures per sub-resource
    pub fn decode_report(decoder: &Decoder, raw: &Value) -> Result<StatusReport> {
        let report = decoder.decode_report(&MODEL, raw)?;
        let model = Model::from_record(&report.record)?;
        Ok(StatusReport {
            model,
            failures: report.failures,
        })
    }

    /// Assemble separately fetched sub-resource documents and decode them
    pub fn from_documents<I>(decoder: &Decoder, documents: I) -> Result<StatusReport>
    where
        I: IntoIterator<Item = (SubResource, Value)>,
    {
        let raw: Map<String, Value> = documents
            .into_iter()
            .map(|(resource, document)| (resource.key().to_string(), document))
            .collect();
        Self::decode_report(decoder, &Value::Object(raw))
    }

    pub fn is_locked(&self) -> Option<bool> {
        self.access.as_ref()?.access_status.as_ref()?.door_lock_status
    }

    /// When the car last reported its access state
    pub fn last_update(&self) -> Option<DateTime<FixedOffset>> {
        Some(self.access.as_ref()?.access_status.as_ref()?.car_captured_timestamp)
    }

    pub fn is_charging(&self) -> Option<bool> {
        self.charging.as_ref()?.charging_status.as_ref()?.charging_state
    }

    /// Battery state of charge in percent
    pub fn state_of_charge(&self) -> Option<i64> {
        let from_battery = self
            .charging
            .as_ref()
            .and_then(|c| c.battery_status.as_ref())
            .and_then(|b| b.current_soc_pct);
        from_battery.or_else(|| {
            self.measurements
                .as_ref()?
                .fuel_level_status
                .as_ref()?
                .current_soc_pct
        })
    }

    pub fn total_range_km(&self) -> Option<i64> {
        let from_fuel = self
            .fuel_status
            .as_ref()
            .and_then(|f| f.range_status.as_ref())
            .and_then(|r| r.total_range_km);
        from_fuel.or_else(|| self.measurements.as_ref()?.range_status.as_ref()?.total_range_km)
    }

    pub fn mileage_km(&self) -> Option<i64> {
        let from_odometer = self
            .measurements
            .as_ref()
            .and_then(|m| m.odometer_status.as_ref())
            .and_then(|o| o.odometer);
        from_odometer.or_else(|| {
            self.vehicle_health_inspection
                .as_ref()?
                .maintenance_status
                .as_ref()?
                .mileage_km
        })
    }
}
