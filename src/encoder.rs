//! Schema-driven re-encoding
//!
//! The inverse of the decoder: a record's native form is written back to the
//! wire shape, each field under its alias (or canonical name), with the
//! paired encoder of its coercion applied. One-way coercions write the native
//! value, which the decoder accepts unchanged.

use serde_json::{Map, Value};

use crate::coerce::kind_of;
use crate::error::{DecodeError, FieldPath, Result};
use crate::record::Record;
use crate::schema::{Schema, ValueType};

/// Encode a decoded record to its wire form
pub fn encode(schema: &'static Schema, record: &Record) -> Result<Value> {
    let native = serde_json::to_value(record)?;
    encode_native(schema, &native)
}

/// Encode the native JSON form of a record (as produced by serde)
pub fn encode_native(schema: &'static Schema, native: &Value) -> Result<Value> {
    encode_at(schema, native, &FieldPath::root(schema.name))
}

fn encode_at(schema: &'static Schema, native: &Value, path: &FieldPath) -> Result<Value> {
    let object = match native {
        Value::Object(map) => map,
        Value::Null => return Ok(Value::Object(Map::new())),
        other => {
            return Err(DecodeError::NotAnObject {
                schema: schema.name,
                path: path.clone(),
                value: other.clone(),
            })
        }
    };

    let mut out = Map::new();
    for field in schema.fields {
        let Some(value) = object.get(field.name).filter(|v| !v.is_null()) else {
            continue;
        };
        let field_path = path.field(field.name);

        let wire = match (field.coercion, field.ty) {
            (Some(coercion), _) => coercion.encode(value).unwrap_or_else(|| value.clone()),
            (None, ValueType::Record(nested)) => encode_at(nested, value, &field_path)?,
            (None, ValueType::RecordList(nested)) => match value {
                Value::Array(items) => Value::Array(
                    items
                        .iter()
                        .enumerate()
                        .map(|(i, item)| encode_at(nested, item, &field_path.index(i)))
                        .collect::<Result<Vec<_>>>()?,
                ),
                other => {
                    return Err(DecodeError::FieldDecode {
                        schema: schema.name,
                        field: field.name,
                        path: field_path,
                        value: other.clone(),
                        reason: format!("expected a list, got {}", kind_of(other)),
                    })
                }
            },
            (None, _) => value.clone(),
        };

        out.insert(field.source_key().to_string(), wire);
    }

    Ok(Value::Object(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::Coercion;
    use crate::decoder::Decoder;
    use crate::schema::FieldSpec;
    use serde_json::json;

    static PLUG: Schema = Schema::new(
        "PlugStatus",
        &[
            FieldSpec::new("plug_connection_state", ValueType::Bool).coerce(Coercion::ConnectionState),
            FieldSpec::new("plug_lock_state", ValueType::Bool).coerce(Coercion::LockState),
            FieldSpec::new("charging_state", ValueType::Bool).coerce(Coercion::ChargingState),
            FieldSpec::new("remaining", ValueType::Int).alias("remainingChargingTimeToComplete_min"),
            FieldSpec::new("doors", ValueType::Map).coerce(Coercion::StatusMap),
            FieldSpec::new("captured", ValueType::Timestamp),
            FieldSpec::new("power_kw", ValueType::Float),
        ],
    );

    static WRAPPER: Schema = Schema::new(
        "Wrapper",
        &[
            FieldSpec::new("plugs", ValueType::RecordList(&PLUG)),
            FieldSpec::new("plug", ValueType::Record(&PLUG)),
        ],
    );

    fn raw_plug() -> Value {
        json!({
            "plugConnectionState": "connected",
            "plugLockState": "unlocked",
            "chargingState": "readyForCharging",
            "remainingChargingTimeToComplete_min": 45,
            "doors": [{"id": "frontLeft", "status": "closed"}, {"id": "trunk", "status": "open"}],
            "captured": "2023-05-01T12:00:00+02:00",
            "powerKw": "11"
        })
    }

    #[test]
    fn test_encode_writes_wire_keys() {
        let decoder = Decoder::default();
        let record = decoder.decode(&PLUG, Some(&raw_plug())).unwrap();
        let wire = encode(&PLUG, &record).unwrap();

        assert_eq!(wire["plug_connection_state"], "connected");
        assert_eq!(wire["plug_lock_state"], "unlocked");
        assert_eq!(wire["charging_state"], false);
        assert_eq!(wire["remainingChargingTimeToComplete_min"], 45);
        assert_eq!(wire["doors"][0], json!({"id": "frontLeft", "status": "closed"}));
        assert_eq!(wire["captured"], "2023-05-01T12:00:00+02:00");
        assert_eq!(wire["power_kw"], 11.0);
    }

    #[test]
    fn test_round_trip() {
        let decoder = Decoder::default();
        let raw = json!({"plugs": [raw_plug(), {}], "plug": raw_plug()});
        let record = decoder.decode(&WRAPPER, Some(&raw)).unwrap();
        let wire = encode(&WRAPPER, &record).unwrap();
        let again = decoder.decode(&WRAPPER, Some(&wire)).unwrap();
        assert_eq!(again, record);
    }

    #[test]
    fn test_absent_fields_not_written() {
        let record = Record::empty(&PLUG);
        assert_eq!(encode(&PLUG, &record).unwrap(), json!({}));
    }

    #[test]
    fn test_encode_native_rejects_bad_shapes() {
        assert!(matches!(
            encode_native(&PLUG, &json!("plug")),
            Err(DecodeError::NotAnObject { .. })
        ));
        assert!(matches!(
            encode_native(&WRAPPER, &json!({"plugs": {"a": 1}})),
            Err(DecodeError::FieldDecode { field: "plugs", .. })
        ));
    }
}
