//! Parking position and resolved location
//!
//! Fetched from their own endpoints, outside the status aggregate.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::record::Resource;
use crate::schema::{FieldSpec, Schema, ValueType};

pub static POSITION: Schema = Schema::new(
    "Position",
    &[
        FieldSpec::new("longitude", ValueType::Float).alias("lon"),
        FieldSpec::new("latitude", ValueType::Float).alias("lat"),
        FieldSpec::new("last_access", ValueType::Timestamp).alias("carCapturedTimestamp"),
    ],
);

pub static LOCATION: Schema = Schema::new(
    "Location",
    &[
        FieldSpec::new("proprietaries", ValueType::ObjectList),
        FieldSpec::new("addresses", ValueType::ObjectList),
    ],
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub last_access: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub proprietaries: Option<Vec<Map<String, Value>>>,
    pub addresses: Option<Vec<Map<String, Value>>>,
}

impl Position {
    /// `(latitude, longitude)` when both are known
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

impl Resource for Position {
    fn schema() -> &'static Schema {
        &POSITION
    }
}

impl Resource for Location {
    fn schema() -> &'static Schema {
        &LOCATION
    }
}
