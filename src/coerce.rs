//! Value coercions
//!
//! The closed catalogue of per-field transforms used by the vehicle schemas.
//! Each coercion is a named, pure function pair: `decode` maps the wire
//! representation to a [`TypedValue`], `encode` maps the native form back to
//! the wire representation when an inverse exists.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Value};

use crate::record::TypedValue;
use crate::schema::ValueType;

/// A named value coercion, dispatched by tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Coercion {
    /// `"locked"` -> true, anything else -> false
    LockState,
    /// `"off"` -> false, anything else -> true
    OnOffState,
    /// `"connected"` -> true, anything else -> false
    ConnectionState,
    /// `"charging"` -> true, anything else -> false (no inverse)
    ChargingState,
    /// `[{id, status}, ...]` -> `{id: status, ...}`
    StatusMap,
    /// ISO-8601 timestamp with explicit offset
    Timestamp,
}

impl Coercion {
    /// All coercions in the catalogue
    pub const ALL: [Coercion; 6] = [
        Coercion::LockState,
        Coercion::OnOffState,
        Coercion::ConnectionState,
        Coercion::ChargingState,
        Coercion::StatusMap,
        Coercion::Timestamp,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::LockState => "lock-state",
            Self::OnOffState => "on-off-state",
            Self::ConnectionState => "connection-state",
            Self::ChargingState => "charging-state",
            Self::StatusMap => "status-map",
            Self::Timestamp => "timestamp",
        }
    }

    /// Decode a present raw value
    pub fn decode(&self, raw: &Value) -> Result<TypedValue, String> {
        match self {
            Self::LockState => state_flag(raw, decode_lock),
            Self::OnOffState => state_flag(raw, decode_onoff),
            Self::ConnectionState => state_flag(raw, decode_connection),
            Self::ChargingState => state_flag(raw, decode_charging),
            Self::StatusMap => status_map(raw).map(TypedValue::Map),
            Self::Timestamp => match raw {
                Value::String(s) => parse_timestamp(s).map(TypedValue::Timestamp),
                other => Err(format!("expected a timestamp string, got {}", kind_of(other))),
            },
        }
    }

    /// Encode a native value back to its wire form.
    ///
    /// Returns `None` for one-way coercions; the caller writes the native
    /// value unchanged.
    pub fn encode(&self, native: &Value) -> Option<Value> {
        match (self, native) {
            (Self::LockState, Value::Bool(b)) => {
                Some(Value::from(if *b { "locked" } else { "unlocked" }))
            }
            (Self::OnOffState, Value::Bool(b)) => Some(Value::from(if *b { "on" } else { "off" })),
            (Self::ConnectionState, Value::Bool(b)) => {
                Some(Value::from(if *b { "connected" } else { "disconnected" }))
            }
            (Self::ChargingState, _) => None,
            (Self::StatusMap, Value::Object(map)) => Some(Value::Array(
                map.iter()
                    .map(|(id, status)| json!({ "id": id, "status": status }))
                    .collect(),
            )),
            (Self::Timestamp, Value::String(_)) => Some(native.clone()),
            _ => None,
        }
    }

    /// Whether `encode` inverts `decode`
    pub fn is_reversible(&self) -> bool {
        !matches!(self, Self::ChargingState)
    }

    /// Whether this coercion produces values of the declared field type
    pub fn produces(&self, ty: &ValueType) -> bool {
        match self {
            Self::LockState | Self::OnOffState | Self::ConnectionState | Self::ChargingState => {
                matches!(ty, ValueType::Bool)
            }
            Self::StatusMap => matches!(ty, ValueType::Map),
            Self::Timestamp => matches!(ty, ValueType::Timestamp),
        }
    }
}

impl fmt::Display for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// `true` iff the lock state is exactly `"locked"`
pub fn decode_lock(state: &str) -> bool {
    state == "locked"
}

/// `false` only for `"off"`; unknown states read as on
pub fn decode_onoff(state: &str) -> bool {
    state != "off"
}

pub fn decode_connection(state: &str) -> bool {
    state == "connected"
}

pub fn decode_charging(state: &str) -> bool {
    state == "charging"
}

// A boolean is accepted as already decoded, so the native form re-decodes.
fn state_flag(raw: &Value, decode: fn(&str) -> bool) -> Result<TypedValue, String> {
    match raw {
        Value::String(s) => Ok(TypedValue::Bool(decode(s))),
        Value::Bool(b) => Ok(TypedValue::Bool(*b)),
        other => Err(format!("expected a status string, got {}", kind_of(other))),
    }
}

/// Flatten a list of `{id, status}` items into an id -> status mapping.
///
/// The identifier is read from `id`, falling back to `name`. A mapping is
/// passed through unchanged.
pub fn status_map(raw: &Value) -> Result<BTreeMap<String, Value>, String> {
    match raw {
        Value::Object(map) => Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
        Value::Array(items) => {
            let mut statuses = BTreeMap::new();
            for (i, item) in items.iter().enumerate() {
                let id = item
                    .get("id")
                    .or_else(|| item.get("name"))
                    .and_then(Value::as_str)
                    .ok_or_else(|| format!("item {} has no string `id`", i))?;
                let status = item.get("status").cloned().unwrap_or(Value::Null);
                statuses.insert(id.to_string(), status);
            }
            Ok(statuses)
        }
        other => Err(format!("expected a list of status items, got {}", kind_of(other))),
    }
}

fn timestamp_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^([0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]{1,9})?)(Z|[+-][0-9]{2}:?[0-9]{2})$",
        )
        .expect("timestamp pattern is valid")
    })
}

/// Parse `YYYY-MM-DDTHH:MM:SS[.fff](Z|+HH:MM|+HHMM)` into an absolute instant.
///
/// Anything not matching the pattern exactly is rejected.
pub fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>, String> {
    let caps = timestamp_pattern()
        .captures(s)
        .ok_or_else(|| format!("`{}` is not an ISO-8601 timestamp with offset", s))?;

    let offset = &caps[2];
    let offset = if offset == "Z" || offset.contains(':') {
        offset.to_string()
    } else {
        format!("{}:{}", &offset[..3], &offset[3..])
    };

    DateTime::parse_from_rfc3339(&format!("{}{}", &caps[1], offset))
        .map_err(|e| format!("`{}` is not a valid timestamp: {}", s, e))
}

/// Integer from a JSON integer, an integral float or a numeric string
pub fn to_int(raw: &Value) -> Result<i64, String> {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| {
                let in_range = i64::MIN as f64..i64::MAX as f64;
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && in_range.contains(f))
                    .map(|f| f as i64)
            })
            .ok_or_else(|| format!("{} is not an integer", n)),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("`{}` is not an integer", s)),
        other => Err(format!("expected an integer, got {}", kind_of(other))),
    }
}

/// Float from any JSON number or a numeric string
pub fn to_float(raw: &Value) -> Result<f64, String> {
    match raw {
        Value::Number(n) => n.as_f64().ok_or_else(|| format!("{} is not a number", n)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| format!("`{}` is not a number", s)),
        other => Err(format!("expected a number, got {}", kind_of(other))),
    }
}

/// String, rendering scalar numbers and booleans to text
pub fn to_text(raw: &Value) -> Result<String, String> {
    match raw {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(format!("expected a string, got {}", kind_of(other))),
    }
}

pub fn to_bool(raw: &Value) -> Result<bool, String> {
    raw.as_bool()
        .ok_or_else(|| format!("expected a boolean, got {}", kind_of(raw)))
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_lock_state() {
        assert!(decode_lock("locked"));
        assert!(!decode_lock("unlocked"));
        assert!(!decode_lock("unknown"));
        assert!(!decode_lock("LOCKED"));
    }

    #[test]
    fn test_onoff_state() {
        assert!(!decode_onoff("off"));
        assert!(decode_onoff("on"));
        assert!(decode_onoff("anything-else"));
        assert!(decode_onoff(""));
    }

    #[test]
    fn test_connection_and_charging() {
        assert!(decode_connection("connected"));
        assert!(!decode_connection("disconnected"));
        assert!(decode_charging("charging"));
        assert!(!decode_charging("readyForCharging"));
    }

    #[test]
    fn test_state_flag_accepts_native_bool() {
        assert_eq!(Coercion::LockState.decode(&json!(true)).unwrap(), TypedValue::Bool(true));
        assert_eq!(Coercion::ChargingState.decode(&json!(false)).unwrap(), TypedValue::Bool(false));
        assert!(Coercion::OnOffState.decode(&json!(1)).is_err());
    }

    #[test]
    fn test_status_map_flattens() {
        let raw = json!([
            {"id": "frontLeft", "status": "closed"},
            {"name": "bonnet", "status": ["closed", "locked"]},
            {"id": "sunroof"}
        ]);
        let map = status_map(&raw).unwrap();
        assert_eq!(map["frontLeft"], json!("closed"));
        assert_eq!(map["bonnet"], json!(["closed", "locked"]));
        assert_eq!(map["sunroof"], Value::Null);
    }

    #[test]
    fn test_status_map_rejects_items_without_id() {
        let err = status_map(&json!([{"status": "open"}])).unwrap_err();
        assert!(err.contains("item 0"));
        assert!(status_map(&json!("closed")).is_err());
    }

    #[test]
    fn test_status_map_encode_decode() {
        let raw = json!([{"id": "rearRight", "status": "open"}, {"id": "frontLeft", "status": "closed"}]);
        let TypedValue::Map(map) = Coercion::StatusMap.decode(&raw).unwrap() else {
            panic!("expected map");
        };
        let native = serde_json::to_value(&map).unwrap();
        let wire = Coercion::StatusMap.encode(&native).unwrap();
        assert_eq!(status_map(&wire).unwrap(), map);
    }

    #[test]
    fn test_timestamp_with_offset() {
        let ts = parse_timestamp("2023-05-01T12:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2023, 5, 1, 10, 0, 0).unwrap());

        let compact = parse_timestamp("2023-05-01T12:00:00+0200").unwrap();
        assert_eq!(compact, ts);

        let zulu = parse_timestamp("2023-05-01T10:00:00.250Z").unwrap();
        assert_eq!(zulu.timestamp_millis(), ts.timestamp_millis() + 250);
    }

    #[test]
    fn test_timestamp_is_strict() {
        assert!(parse_timestamp("not-a-date").is_err());
        assert!(parse_timestamp("2023-05-01 12:00:00+02:00").is_err());
        assert!(parse_timestamp("2023-05-01T12:00:00").is_err());
        assert!(parse_timestamp("2023-13-01T12:00:00Z").is_err());
    }

    #[test]
    fn test_timestamp_rejects_non_ascii_digits() {
        assert!(parse_timestamp("2023-05-01T12:00:00+०२००").is_err());
        assert!(parse_timestamp("2023-05-01T12:00:00+٠٢:٠٠").is_err());
        assert!(parse_timestamp("２０２３-05-01T12:00:00Z").is_err());

        let err = Coercion::Timestamp
            .decode(&json!("2023-05-01T12:00:00+०२००"))
            .unwrap_err();
        assert!(err.contains("not an ISO-8601 timestamp"), "{}", err);
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(to_int(&json!(87)), Ok(87));
        assert_eq!(to_int(&json!(87.0)), Ok(87));
        assert_eq!(to_int(&json!("210")), Ok(210));
        assert!(to_int(&json!(87.5)).is_err());
        assert!(to_int(&json!("far")).is_err());
        assert!(to_int(&json!(true)).is_err());
        assert_eq!(to_int(&json!(-9_223_372_036_854_775_808.0_f64)), Ok(i64::MIN));
        assert!(to_int(&json!(9_223_372_036_854_775_808.0_f64)).is_err());

        assert_eq!(to_float(&json!(11)), Ok(11.0));
        assert_eq!(to_float(&json!("7.4")), Ok(7.4));
        assert!(to_float(&json!("NaN")).is_err());

        assert_eq!(to_text(&json!(42)), Ok("42".to_string()));
        assert!(to_text(&json!([1])).is_err());
        assert!(to_bool(&json!("true")).is_err());
    }

    #[test]
    fn test_encode_inverts_decode() {
        for state in ["locked", "unlocked"] {
            let decoded = Coercion::LockState.decode(&json!(state)).unwrap();
            let native = serde_json::to_value(&decoded).unwrap();
            let wire = Coercion::LockState.encode(&native).unwrap();
            assert_eq!(Coercion::LockState.decode(&wire).unwrap(), decoded);
        }
        assert_eq!(Coercion::ChargingState.encode(&json!(true)), None);
        assert!(!Coercion::ChargingState.is_reversible());
    }
}
