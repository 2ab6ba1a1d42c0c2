//! Typed decoder
//!
//! Maps one raw JSON document onto a [`Schema`], field by field:
//!
//! 1. every raw key is folded with [`normalize_key`]; aliased fields are
//!    looked up verbatim instead
//! 2. a missing (or `null`) optional field decodes to "no value"
//! 3. a missing required field is a [`DecodeError::MissingField`]
//! 4. a present value goes through the field's [`Coercion`] if one is
//!    declared, otherwise it is coerced to the declared [`ValueType`]
//!    (nested objects and lists of objects recurse)
//!
//! Unknown keys are ignored. Decoding a record is all-or-nothing; with
//! [`ErrorPolicy::Collect`] every field is still attempted so that the
//! returned error lists all malformed fields of the document.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::coerce::{self, Coercion};
use crate::config::{DecoderConfig, ErrorPolicy};
use crate::error::{DecodeError, FieldPath, Result};
use crate::key::normalize_key;
use crate::record::{Record, Resource, TypedValue};
use crate::schema::{FieldSpec, Schema, ValueType};

/// Schema-driven JSON decoder
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode a raw fragment (`None` or `null` for no data) into a record
    pub fn decode(&self, schema: &'static Schema, raw: Option<&Value>) -> Result<Record> {
        trace!(schema = schema.name, "decoding record");
        self.decode_record(schema, raw, &FieldPath::root(schema.name))
    }

    /// Parse JSON text and decode it
    pub fn decode_str(&self, schema: &'static Schema, text: &str) -> Result<Record> {
        let raw: Value = serde_json::from_str(text)?;
        self.decode(schema, Some(&raw))
    }

    /// Decode straight into a typed struct
    pub fn decode_into<T: Resource>(&self, raw: &Value) -> Result<T> {
        let record = self.decode(T::schema(), Some(raw))?;
        T::from_record(&record)
    }

    /// Decode an aggregate, attempting each top-level field independently.
    ///
    /// A field that fails to decode is left absent in the record and its
    /// error is kept in [`Report::failures`]; sibling fields are unaffected.
    pub fn decode_report(&self, schema: &'static Schema, raw: &Value) -> Result<Report> {
        let root = FieldPath::root(schema.name);
        let object = as_object(schema, Some(raw), &root)?;
        let index = KeyIndex::build(schema, object);
        self.report_unknown_keys(schema, &index);

        let mut record = Record::empty(schema);
        let mut failures = Vec::new();

        for field in schema.fields {
            match self.decode_field(schema, field, index.get(field), &root) {
                Ok(value) => record.set(field.name, value),
                Err(error) => {
                    warn!(
                        schema = schema.name,
                        field = field.name,
                        error = %error,
                        "sub-resource failed to decode"
                    );
                    failures.push(Failure {
                        field: field.name,
                        error,
                    });
                }
            }
        }

        Ok(Report { record, failures })
    }

    fn decode_record(
        &self,
        schema: &'static Schema,
        raw: Option<&Value>,
        path: &FieldPath,
    ) -> Result<Record> {
        let object = as_object(schema, raw, path)?;
        let index = KeyIndex::build(schema, object);
        self.report_unknown_keys(schema, &index);

        let mut values = Vec::with_capacity(schema.fields.len());
        let mut errors = Vec::new();

        for field in schema.fields {
            match self.decode_field(schema, field, index.get(field), path) {
                Ok(value) => values.push(value),
                Err(error) => {
                    if self.config.error_policy == ErrorPolicy::FailFast {
                        return Err(error);
                    }
                    collect(&mut errors, error);
                    values.push(None);
                }
            }
        }

        match errors.len() {
            0 => Ok(Record::from_values(schema, values)),
            1 => Err(errors.remove(0)),
            _ => Err(DecodeError::Invalid {
                schema: schema.name,
                path: path.clone(),
                errors,
            }),
        }
    }

    fn decode_field(
        &self,
        schema: &'static Schema,
        field: &'static FieldSpec,
        raw: Option<&Value>,
        record_path: &FieldPath,
    ) -> Result<Option<TypedValue>> {
        let path = record_path.field(field.name);
        match raw {
            None if field.required => Err(DecodeError::MissingField {
                schema: schema.name,
                field: field.name,
                path,
            }),
            None => Ok(None),
            Some(value) => self.decode_value(schema, field, value, &path).map(Some),
        }
    }

    fn decode_value(
        &self,
        schema: &'static Schema,
        field: &'static FieldSpec,
        raw: &Value,
        path: &FieldPath,
    ) -> Result<TypedValue> {
        let invalid = |reason: String| DecodeError::FieldDecode {
            schema: schema.name,
            field: field.name,
            path: path.clone(),
            value: raw.clone(),
            reason,
        };

        if let Some(coercion) = field.coercion {
            return coercion.decode(raw).map_err(invalid);
        }

        match field.ty {
            ValueType::Bool => coerce::to_bool(raw).map(TypedValue::Bool).map_err(invalid),
            ValueType::Int => coerce::to_int(raw).map(TypedValue::Int).map_err(invalid),
            ValueType::Float => coerce::to_float(raw).map(TypedValue::Float).map_err(invalid),
            ValueType::Str => coerce::to_text(raw).map(TypedValue::Str).map_err(invalid),
            ValueType::Timestamp => Coercion::Timestamp.decode(raw).map_err(invalid),
            ValueType::Map => match raw {
                Value::Object(map) => Ok(TypedValue::Map(
                    map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                )),
                other => Err(invalid(format!("expected an object, got {}", coerce::kind_of(other)))),
            },
            ValueType::StrList => match raw {
                Value::Array(items) => items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                    .map(TypedValue::StrList)
                    .ok_or_else(|| invalid("expected a list of strings".into())),
                other => Err(invalid(format!("expected a list, got {}", coerce::kind_of(other)))),
            },
            ValueType::ObjectList => match raw {
                Value::Array(items) => items
                    .iter()
                    .map(|item| item.as_object().cloned())
                    .collect::<Option<Vec<_>>>()
                    .map(TypedValue::Objects)
                    .ok_or_else(|| invalid("expected a list of objects".into())),
                other => Err(invalid(format!("expected a list, got {}", coerce::kind_of(other)))),
            },
            ValueType::Json => Ok(TypedValue::Json(raw.clone())),
            ValueType::Record(nested) => match raw {
                Value::Object(_) => self
                    .decode_record(nested, Some(raw), path)
                    .map(TypedValue::Record),
                other => Err(invalid(format!("expected an object, got {}", coerce::kind_of(other)))),
            },
            ValueType::RecordList(nested) => match raw {
                Value::Array(items) => self.decode_list(schema, field, nested, items, path),
                other => Err(invalid(format!("expected a list, got {}", coerce::kind_of(other)))),
            },
        }
    }

    fn decode_list(
        &self,
        schema: &'static Schema,
        field: &'static FieldSpec,
        nested: &'static Schema,
        items: &[Value],
        path: &FieldPath,
    ) -> Result<TypedValue> {
        let mut records = Vec::with_capacity(items.len());
        let mut errors = Vec::new();

        for (i, item) in items.iter().enumerate() {
            let item_path = path.index(i);
            let decoded = match item {
                Value::Object(_) => self.decode_record(nested, Some(item), &item_path),
                other => Err(DecodeError::FieldDecode {
                    schema: schema.name,
                    field: field.name,
                    path: item_path,
                    value: other.clone(),
                    reason: format!("expected an object, got {}", coerce::kind_of(other)),
                }),
            };
            match decoded {
                Ok(record) => records.push(record),
                Err(error) if self.config.error_policy == ErrorPolicy::FailFast => return Err(error),
                Err(error) => collect(&mut errors, error),
            }
        }

        match errors.len() {
            0 => Ok(TypedValue::Records(records)),
            1 => Err(errors.remove(0)),
            _ => Err(DecodeError::Invalid {
                schema: nested.name,
                path: path.clone(),
                errors,
            }),
        }
    }

    fn report_unknown_keys(&self, schema: &'static Schema, index: &KeyIndex<'_>) {
        if !self.config.log_unknown_keys {
            return;
        }
        for key in index.unknown_keys() {
            debug!(schema = schema.name, key, "ignoring unrecognized key");
        }
    }
}

/// Outcome of [`Decoder::decode_report`]
#[derive(Debug)]
pub struct Report {
    /// The aggregate, with failed fields absent
    pub record: Record,
    pub failures: Vec<Failure>,
}

impl Report {
    /// Whether every present field decoded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failure(&self, field: &str) -> Option<&DecodeError> {
        self.failures
            .iter()
            .find(|f| f.field == field)
            .map(|f| &f.error)
    }
}

/// A top-level field that failed to decode
#[derive(Debug)]
pub struct Failure {
    pub field: &'static str,
    pub error: DecodeError,
}

static EMPTY: std::sync::OnceLock<Map<String, Value>> = std::sync::OnceLock::new();

fn as_object<'a>(
    schema: &'static Schema,
    raw: Option<&'a Value>,
    path: &FieldPath,
) -> Result<&'a Map<String, Value>> {
    match raw {
        None | Some(Value::Null) => Ok(EMPTY.get_or_init(Map::new)),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(DecodeError::NotAnObject {
            schema: schema.name,
            path: path.clone(),
            value: other.clone(),
        }),
    }
}

fn collect(errors: &mut Vec<DecodeError>, error: DecodeError) {
    match error {
        DecodeError::Invalid { errors: nested, .. } => errors.extend(nested),
        other => errors.push(other),
    }
}

/// Raw keys of one object, indexed by their normalized form
struct KeyIndex<'a> {
    schema: &'static Schema,
    raw: &'a Map<String, Value>,
    normalized: HashMap<String, (&'a str, &'a Value)>,
}

impl<'a> KeyIndex<'a> {
    fn build(schema: &'static Schema, raw: &'a Map<String, Value>) -> Self {
        let mut normalized = HashMap::with_capacity(raw.len());
        for (key, value) in raw {
            match normalized.entry(normalize_key(key)) {
                Entry::Vacant(slot) => {
                    slot.insert((key.as_str(), value));
                }
                Entry::Occupied(slot) => {
                    let (kept, _) = slot.get();
                    debug!(
                        schema = schema.name,
                        key = key.as_str(),
                        kept = *kept,
                        "duplicate key after normalization"
                    );
                }
            }
        }
        Self {
            schema,
            raw,
            normalized,
        }
    }

    /// Raw value for a field; `null` counts as absent
    fn get(&self, field: &FieldSpec) -> Option<&'a Value> {
        let value = match field.alias {
            Some(alias) => self.raw.get(alias),
            None => self.normalized.get(field.name).map(|(_, v)| *v),
        };
        value.filter(|v| !v.is_null())
    }

    fn unknown_keys(&self) -> Vec<&'a str> {
        self.raw
            .keys()
            .filter(|key| {
                !self.schema.fields.iter().any(|field| match field.alias {
                    Some(alias) => alias == key.as_str(),
                    None => self
                        .normalized
                        .get(field.name)
                        .is_some_and(|(kept, _)| kept == &key.as_str()),
                })
            })
            .map(String::as_str)
            .collect()
    }
}
