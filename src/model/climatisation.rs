//! Climate control state and departure timers

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::coerce::Coercion;
use crate::record::Resource;
use crate::schema::{FieldSpec, Schema, ValueType};

pub static CLIMATISATION: Schema = Schema::new(
    "Climatisation",
    &[
        FieldSpec::new("window_heating_status", ValueType::Record(&WINDOW_HEATING_STATUS)),
        FieldSpec::new("climatisation_status", ValueType::Record(&CLIMATISATION_STATUS)),
        FieldSpec::new("climatisation_settings", ValueType::Record(&CLIMATISATION_SETTINGS)),
    ],
);

pub static WINDOW_HEATING_STATUS: Schema = Schema::new(
    "WindowHeatingStatus",
    &[FieldSpec::new("window_heating_status", ValueType::ObjectList)],
);

pub static CLIMATISATION_STATUS: Schema = Schema::new(
    "ClimatisationStatus",
    &[
        FieldSpec::new("remaining_climatisation_time_min", ValueType::Int),
        FieldSpec::new("climatisation_state", ValueType::Bool).coerce(Coercion::OnOffState),
    ],
);

pub static CLIMATISATION_SETTINGS: Schema = Schema::new(
    "ClimatisationSettings",
    &[
        FieldSpec::new("target_temperature_c", ValueType::Float),
        FieldSpec::new("target_temperature_f", ValueType::Float),
        FieldSpec::new("unit_in_car", ValueType::Str),
        FieldSpec::new("climatization_at_unlock", ValueType::Bool),
        FieldSpec::new("window_heating_enabled", ValueType::Bool),
        FieldSpec::new("zone_front_left_enabled", ValueType::Bool),
        FieldSpec::new("zone_front_right_enabled", ValueType::Bool),
        FieldSpec::new("zone_rear_left_enabled", ValueType::Bool),
        FieldSpec::new("zone_rear_right_enabled", ValueType::Bool),
    ],
);

pub static CLIMATISATION_TIMERS: Schema = Schema::new(
    "ClimatisationTimers",
    &[FieldSpec::new(
        "climatisation_timers_status",
        ValueType::Record(&CLIMATISATION_TIMERS_STATUS),
    )],
);

pub static CLIMATISATION_TIMERS_STATUS: Schema = Schema::new(
    "ClimatisationTimersStatus",
    &[
        FieldSpec::new("time_in_car", ValueType::Timestamp).coerce(Coercion::Timestamp),
        FieldSpec::new("timers", ValueType::RecordList(&TIMER)),
    ],
);

pub static TIMER: Schema = Schema::new(
    "Timer",
    &[
        FieldSpec::new("id", ValueType::Int).required(),
        FieldSpec::new("enabled", ValueType::Bool).required(),
        FieldSpec::new("single_timer", ValueType::Record(&SINGLE_TIMER)).required(),
    ],
);

pub static SINGLE_TIMER: Schema = Schema::new(
    "SingleTimer",
    &[
        FieldSpec::new("start", ValueType::Timestamp).alias("startDateTime").required(),
        FieldSpec::new("target", ValueType::Timestamp).alias("targetDateTime").required(),
    ],
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Climatisation {
    pub window_heating_status: Option<WindowHeatingStatus>,
    pub climatisation_status: Option<ClimatisationStatus>,
    pub climatisation_settings: Option<ClimatisationSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowHeatingStatus {
    /// Per-window entries, kept as sent
    pub window_heating_status: Option<Vec<Map<String, Value>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClimatisationStatus {
    pub remaining_climatisation_time_min: Option<i64>,
    /// `false` only for `off`
    pub climatisation_state: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClimatisationSettings {
    pub target_temperature_c: Option<f64>,
    pub target_temperature_f: Option<f64>,
    pub unit_in_car: Option<String>,
    pub climatization_at_unlock: Option<bool>,
    pub window_heating_enabled: Option<bool>,
    pub zone_front_left_enabled: Option<bool>,
    pub zone_front_right_enabled: Option<bool>,
    pub zone_rear_left_enabled: Option<bool>,
    pub zone_rear_right_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClimatisationTimers {
    pub climatisation_timers_status: Option<ClimatisationTimersStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClimatisationTimersStatus {
    pub time_in_car: Option<DateTime<FixedOffset>>,
    pub timers: Option<Vec<Timer>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    pub id: i64,
    pub enabled: bool,
    pub single_timer: SingleTimer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleTimer {
    pub start: DateTime<FixedOffset>,
    pub target: DateTime<FixedOffset>,
}

impl ClimatisationTimersStatus {
    /// Enabled timers ordered by start time
    pub fn enabled_timers(&self) -> Vec<&Timer> {
        let mut timers: Vec<&Timer> = self
            .timers
            .iter()
            .flatten()
            .filter(|t| t.enabled)
            .collect();
        timers.sort_by_key(|t| t.single_timer.start);
        timers
    }
}

impl Resource for Climatisation {
    fn schema() -> &'static Schema {
        &CLIMATISATION
    }
}

impl Resource for ClimatisationSettings {
    fn schema() -> &'static Schema {
        &CLIMATISATION_SETTINGS
    }
}

impl Resource for ClimatisationTimers {
    fn schema() -> &'static Schema {
        &CLIMATISATION_TIMERS
    }
}

impl Resource for ClimatisationTimersStatus {
    fn schema() -> &'static Schema {
        &CLIMATISATION_TIMERS_STATUS
    }
}

impl Resource for Timer {
    fn schema() -> &'static Schema {
        &TIMER
    }
}

impl Resource for SingleTimer {
    fn schema() -> &'static Schema {
        &SINGLE_TIMER
    }
}

impl Resource for WindowHeatingStatus {
    fn schema() -> &'static Schema {
        &WINDOW_HEATING_STATUS
    }
}

impl Resource for ClimatisationStatus {
    fn schema() -> &'static Schema {
        &CLIMATISATION_STATUS
    }
}
