//! Typed records
//!
//! [`Record`] is the schema-shaped output of the decoder: one slot per
//! declared field, in declaration order, each either a validated
//! [`TypedValue`] or absent. Records serialize to their native JSON form
//! (field names as keys, absent fields omitted), which is how they are bridged
//! into the strongly typed structs of [`crate::model`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::de::DeserializeOwned;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::decoder::Decoder;
use crate::encoder;
use crate::error::Result;
use crate::schema::{FieldSpec, Schema};

/// A decoded field value
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Timestamp(DateTime<FixedOffset>),
    Map(BTreeMap<String, Value>),
    StrList(Vec<String>),
    Objects(Vec<Map<String, Value>>),
    Json(Value),
    Record(Record),
    Records(Vec<Record>),
}

impl TypedValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TypedValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TypedValue::Float(f) => Some(*f),
            TypedValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            TypedValue::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            TypedValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            TypedValue::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_records(&self) -> Option<&[Record]> {
        match self {
            TypedValue::Records(records) => Some(records),
            _ => None,
        }
    }
}

impl Serialize for TypedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            TypedValue::Bool(b) => serializer.serialize_bool(*b),
            TypedValue::Int(i) => serializer.serialize_i64(*i),
            TypedValue::Float(f) => serializer.serialize_f64(*f),
            TypedValue::Str(s) => serializer.serialize_str(s),
            TypedValue::Timestamp(ts) => {
                serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            TypedValue::Map(map) => map.serialize(serializer),
            TypedValue::StrList(items) => items.serialize(serializer),
            TypedValue::Objects(items) => items.serialize(serializer),
            TypedValue::Json(value) => value.serialize(serializer),
            TypedValue::Record(record) => record.serialize(serializer),
            TypedValue::Records(records) => records.serialize(serializer),
        }
    }
}

/// A decoded record of a given schema
#[derive(Clone, PartialEq)]
pub struct Record {
    schema: &'static Schema,
    values: Vec<Option<TypedValue>>,
}

impl Record {
    /// A record with every field absent
    pub fn empty(schema: &'static Schema) -> Self {
        Self {
            schema,
            values: vec![None; schema.fields.len()],
        }
    }

    pub(crate) fn from_values(schema: &'static Schema, values: Vec<Option<TypedValue>>) -> Self {
        debug_assert_eq!(values.len(), schema.fields.len());
        Self { schema, values }
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Value of a field, `None` when absent or not declared
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        let index = self.schema.fields.iter().position(|f| f.name == name)?;
        self.values[index].as_ref()
    }

    /// Nested record held by a field
    pub fn record(&self, name: &str) -> Option<&Record> {
        self.get(name).and_then(TypedValue::as_record)
    }

    pub(crate) fn set(&mut self, name: &str, value: Option<TypedValue>) {
        if let Some(index) = self.schema.fields.iter().position(|f| f.name == name) {
            self.values[index] = value;
        }
    }

    /// Fields in declaration order with their values
    pub fn iter(&self) -> impl Iterator<Item = (&'static FieldSpec, Option<&TypedValue>)> + '_ {
        self.schema.fields.iter().zip(self.values.iter().map(Option::as_ref))
    }

    /// Names of the fields holding a value
    pub fn present_fields(&self) -> Vec<&'static str> {
        self.iter()
            .filter(|(_, v)| v.is_some())
            .map(|(f, _)| f.name)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Deserialize the native form into a typed struct
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T> {
        let native = serde_json::to_value(self)?;
        Ok(serde_json::from_value(native)?)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct(self.schema.name);
        for (field, value) in self.iter() {
            if let Some(value) = value {
                debug.field(field.name, value);
            }
        }
        debug.finish()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let present = self.values.iter().filter(|v| v.is_some()).count();
        let mut map = serializer.serialize_map(Some(present))?;
        for (field, value) in self.iter() {
            if let Some(value) = value {
                map.serialize_entry(field.name, value)?;
            }
        }
        map.end()
    }
}

/// A strongly typed record backed by a schema table
pub trait Resource: Serialize + DeserializeOwned {
    fn schema() -> &'static Schema;

    /// Decode a raw wire document with the default decoder
    fn from_raw(raw: &Value) -> Result<Self> {
        Decoder::default().decode_into(raw)
    }

    fn from_record(record: &Record) -> Result<Self> {
        debug_assert_eq!(record.schema().name, Self::schema().name);
        record.to_typed()
    }

    /// Re-encode to the wire form
    fn to_raw(&self) -> Result<Value> {
        let native = serde_json::to_value(self)?;
        encoder::encode_native(Self::schema(), &native)
    }
}
