//! Services the account may use on this vehicle

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::record::Resource;
use crate::schema::{FieldSpec, Schema, ValueType};

pub static USER_CAPABILITIES: Schema = Schema::new(
    "UserCapabilities",
    &[FieldSpec::new("capabilities_status", ValueType::ObjectList)],
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserCapabilities {
    pub capabilities_status: Option<Vec<Map<String, Value>>>,
}

impl UserCapabilities {
    /// Ids of the listed capabilities
    pub fn ids(&self) -> Vec<&str> {
        self.capabilities_status
            .iter()
            .flatten()
            .filter_map(|c| c.get("id").and_then(Value::as_str))
            .collect()
    }
}

impl Resource for UserCapabilities {
    fn schema() -> &'static Schema {
        &USER_CAPABILITIES
    }
}
