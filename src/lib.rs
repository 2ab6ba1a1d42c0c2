//! Vehicle Schemas
//!
//! Typed decoding of the JSON documents returned by a connected-vehicle
//! status API.
//!
//! ## Features
//!
//! - **Key normalization**: `currentSOC_pct`, `HVBatteryTemp` and
//!   `door_lock_status` all meet the same snake_case field names
//! - **Coercions**: string states such as `"locked"` or `"connected"` become
//!   booleans, `[{id, status}]` lists become maps, timestamps are parsed
//! - **Schema tables**: every record shape is a static [`Schema`] that both
//!   the [`Decoder`] and the [`encoder`] walk
//! - **Error policy**: collect every field error of a document or stop at
//!   the first, see [`ErrorPolicy`]
//! - **Isolation**: one malformed sub-resource does not fail the
//!   [`Model`] aggregate
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use vehicle_schemas::model::BatteryStatus;
//! use vehicle_schemas::Resource;
//!
//! let raw = json!({"currentSOC_pct": 87, "cruisingRangeElectricKm": 210});
//! let battery = BatteryStatus::from_raw(&raw).unwrap();
//! assert_eq!(battery.current_soc_pct, Some(87));
//! ```

pub mod coerce;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod key;
pub mod model;
pub mod record;
pub mod schema;

pub use coerce::Coercion;
pub use config::{DecoderConfig, ErrorPolicy, Settings};
pub use decoder::{Decoder, Failure, Report};
pub use encoder::{encode, encode_native};
pub use error::{DecodeError, FieldPath, FieldPathSegment, Result};
pub use key::normalize_key;
pub use model::{Model, StatusReport, SubResource};
pub use record::{Record, Resource, TypedValue};
pub use schema::{FieldSpec, IssueCode, Schema, SchemaIssue, ValueType};
