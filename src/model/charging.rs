//! Battery, charging and plug state

use serde::{Deserialize, Serialize};

use crate::coerce::Coercion;
use crate::record::Resource;
use crate::schema::{FieldSpec, Schema, ValueType};

pub static CHARGING: Schema = Schema::new(
    "Charging",
    &[
        FieldSpec::new("battery_status", ValueType::Record(&BATTERY_STATUS)),
        FieldSpec::new("charging_status", ValueType::Record(&CHARGING_STATUS)),
        FieldSpec::new("charging_settings", ValueType::Record(&CHARGING_SETTINGS)),
        FieldSpec::new("plug_status", ValueType::Record(&PLUG_STATUS)),
        FieldSpec::new("charge_mode", ValueType::Record(&CHARGE_MODE)),
    ],
);

pub static BATTERY_STATUS: Schema = Schema::new(
    "BatteryStatus",
    &[
        FieldSpec::new("current_soc_pct", ValueType::Int).alias("currentSOC_pct"),
        FieldSpec::new("cruising_range_electric_km", ValueType::Int),
    ],
);

pub static CHARGING_STATUS: Schema = Schema::new(
    "ChargingStatus",
    &[
        FieldSpec::new("remaining", ValueType::Int).alias("remainingChargingTimeToComplete_min"),
        FieldSpec::new("charging_state", ValueType::Bool).coerce(Coercion::ChargingState),
        FieldSpec::new("charge_mode", ValueType::Str),
        FieldSpec::new("charge_power_kw", ValueType::Float).alias("chargePower_kW"),
        FieldSpec::new("charge_rate_kmph", ValueType::Int),
        FieldSpec::new("charge_type", ValueType::Str),
        FieldSpec::new("charge_settings", ValueType::Str),
    ],
);

pub static CHARGING_SETTINGS: Schema = Schema::new(
    "ChargingSettings",
    &[
        FieldSpec::new("max_charge_current_ac", ValueType::Str),
        FieldSpec::new("aut_unlock_plug_when_charged", ValueType::Bool).coerce(Coercion::OnOffState),
        FieldSpec::new("auto_unlock_plug_when_charged_ac", ValueType::Bool)
            .coerce(Coercion::OnOffState),
        FieldSpec::new("target_soc_pct", ValueType::Int).alias("targetSOC_pct"),
    ],
);

pub static PLUG_STATUS: Schema = Schema::new(
    "PlugStatus",
    &[
        FieldSpec::new("plug_connection_state", ValueType::Bool).coerce(Coercion::ConnectionState),
        FieldSpec::new("plug_lock_state", ValueType::Bool).coerce(Coercion::LockState),
        FieldSpec::new("external_power", ValueType::Str),
        FieldSpec::new("led_color", ValueType::Str),
    ],
);

pub static CHARGE_MODE: Schema = Schema::new(
    "ChargeMode",
    &[
        FieldSpec::new("preferred_charge_mode", ValueType::Str),
        FieldSpec::new("available_charge_modes", ValueType::StrList),
    ],
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Charging {
    pub battery_status: Option<BatteryStatus>,
    pub charging_status: Option<ChargingStatus>,
    pub charging_settings: Option<ChargingSettings>,
    pub plug_status: Option<PlugStatus>,
    pub charge_mode: Option<ChargeMode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatteryStatus {
    pub current_soc_pct: Option<i64>,
    pub cruising_range_electric_km: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargingStatus {
    /// Minutes until charging completes
    pub remaining: Option<i64>,
    /// `true` only while actively charging
    pub charging_state: Option<bool>,
    pub charge_mode: Option<String>,
    pub charge_power_kw: Option<f64>,
    pub charge_rate_kmph: Option<i64>,
    pub charge_type: Option<String>,
    pub charge_settings: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargingSettings {
    pub max_charge_current_ac: Option<String>,
    pub aut_unlock_plug_when_charged: Option<bool>,
    pub auto_unlock_plug_when_charged_ac: Option<bool>,
    pub target_soc_pct: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlugStatus {
    pub plug_connection_state: Option<bool>,
    pub plug_lock_state: Option<bool>,
    pub external_power: Option<String>,
    pub led_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargeMode {
    pub preferred_charge_mode: Option<String>,
    pub available_charge_modes: Option<Vec<String>>,
}

impl Resource for Charging {
    fn schema() -> &'static Schema {
        &CHARGING
    }
}

impl Resource for BatteryStatus {
    fn schema() -> &'static Schema {
        &BATTERY_STATUS
    }
}

impl Resource for ChargingStatus {
    fn schema() -> &'static Schema {
        &CHARGING_STATUS
    }
}

impl Resource for ChargingSettings {
    fn schema() -> &'static Schema {
        &CHARGING_SETTINGS
    }
}

impl Resource for PlugStatus {
    fn schema() -> &'static Schema {
        &PLUG_STATUS
    }
}

impl Resource for ChargeMode {
    fn schema() -> &'static Schema {
        &CHARGE_MODE
    }
}
