//! Door, window and central-locking state

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce::Coercion;
use crate::record::Resource;
use crate::schema::{FieldSpec, Schema, ValueType};

pub static ACCESS: Schema = Schema::new(
    "Access",
    &[FieldSpec::new("access_status", ValueType::Record(&ACCESS_STATUS))],
);

pub static ACCESS_STATUS: Schema = Schema::new(
    "AccessStatus",
    &[
        FieldSpec::new("car_captured_timestamp", ValueType::Timestamp).required(),
        FieldSpec::new("overall_status", ValueType::Str),
        FieldSpec::new("door_lock_status", ValueType::Bool).coerce(Coercion::LockState),
        FieldSpec::new("doors", ValueType::Map).coerce(Coercion::StatusMap),
        FieldSpec::new("windows", ValueType::Map).coerce(Coercion::StatusMap),
    ],
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Access {
    pub access_status: Option<AccessStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessStatus {
    pub car_captured_timestamp: DateTime<FixedOffset>,
    pub overall_status: Option<String>,
    /// `true` only when the car reports `locked`
    pub door_lock_status: Option<bool>,
    /// Door id -> status as reported
    pub doors: Option<BTreeMap<String, Value>>,
    pub windows: Option<BTreeMap<String, Value>>,
}

impl Resource for Access {
    fn schema() -> &'static Schema {
        &ACCESS
    }
}

impl Resource for AccessStatus {
    fn schema() -> &'static Schema {
        &ACCESS_STATUS
    }
}

impl AccessStatus {
    /// Whether every reported door status contains `closed`
    pub fn all_doors_closed(&self) -> Option<bool> {
        let doors = self.doors.as_ref()?;
        Some(doors.values().all(|status| reports(status, "closed")))
    }
}

/// Whether a status value (a string or a list of strings) contains `state`
pub(crate) fn reports(status: &Value, state: &str) -> bool {
    match status {
        Value::String(s) => s == state,
        Value::Array(items) => items.iter().any(|item| item.as_str() == Some(state)),
        _ => false,
    }
}
