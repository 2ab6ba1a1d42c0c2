//! Error types for the typed decoder

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Result type for decode/encode operations
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Decoder errors
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("{path}: missing required field `{field}` of {schema}")]
    MissingField {
        schema: &'static str,
        field: &'static str,
        path: FieldPath,
    },

    #[error("{path}: cannot decode field `{field}` of {schema} from {value}: {reason}")]
    FieldDecode {
        schema: &'static str,
        field: &'static str,
        path: FieldPath,
        value: Value,
        reason: String,
    },

    #[error("{path}: expected an object for {schema}, got {value}")]
    NotAnObject {
        schema: &'static str,
        path: FieldPath,
        value: Value,
    },

    #[error("{path}: {} field errors in {schema}: {}", .errors.len(), join_errors(.errors))]
    Invalid {
        schema: &'static str,
        path: FieldPath,
        errors: Vec<DecodeError>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DecodeError {
    /// Path of the failing field (the record path for `Invalid`)
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            Self::MissingField { path, .. }
            | Self::FieldDecode { path, .. }
            | Self::NotAnObject { path, .. }
            | Self::Invalid { path, .. } => Some(path),
            Self::Json(_) => None,
        }
    }

    /// Leaf errors: the collected errors of `Invalid`, or the error itself
    pub fn leaves(&self) -> Vec<&DecodeError> {
        match self {
            Self::Invalid { errors, .. } => errors.iter().flat_map(|e| e.leaves()).collect(),
            other => vec![other],
        }
    }

    pub fn is_missing_field(&self) -> bool {
        matches!(self, Self::MissingField { .. })
    }
}

fn join_errors(errors: &[DecodeError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// One step from a record root down to a value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldPathSegment {
    /// A named field in a record
    Field(&'static str),
    /// An element of a list of records
    Index(usize),
}

impl fmt::Display for FieldPathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, ".{}", name),
            Self::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// Path from the root schema to a field, e.g. `Model.charging.battery_status`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    root: &'static str,
    segments: Vec<FieldPathSegment>,
}

impl FieldPath {
    pub fn root(schema: &'static str) -> Self {
        Self {
            root: schema,
            segments: Vec::new(),
        }
    }

    pub fn field(&self, name: &'static str) -> Self {
        let mut path = self.clone();
        path.segments.push(FieldPathSegment::Field(name));
        path
    }

    pub fn index(&self, i: usize) -> Self {
        let mut path = self.clone();
        path.segments.push(FieldPathSegment::Index(i));
        path
    }

    /// Name of the outermost schema
    pub fn root_schema(&self) -> &'static str {
        self.root
    }

    pub fn segments(&self) -> &[FieldPathSegment] {
        &self.segments
    }

    /// The first named field below the root (the sub-resource in an aggregate)
    pub fn top_field(&self) -> Option<&'static str> {
        self.segments.iter().find_map(|s| match s {
            FieldPathSegment::Field(name) => Some(*name),
            FieldPathSegment::Index(_) => None,
        })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for segment in &self.segments {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_path_display() {
        let path = FieldPath::root("ClimatisationTimersStatus")
            .field("timers")
            .index(1)
            .field("single_timer")
            .field("start");
        assert_eq!(
            path.to_string(),
            "ClimatisationTimersStatus.timers[1].single_timer.start"
        );
        assert_eq!(path.top_field(), Some("timers"));
    }

    #[test]
    fn test_invalid_leaves_flatten() {
        let path = FieldPath::root("BatteryStatus");
        let err = DecodeError::Invalid {
            schema: "BatteryStatus",
            path: path.clone(),
            errors: vec![
                DecodeError::MissingField {
                    schema: "BatteryStatus",
                    field: "current_soc_pct",
                    path: path.field("current_soc_pct"),
                },
                DecodeError::FieldDecode {
                    schema: "BatteryStatus",
                    field: "cruising_range_electric_km",
                    path: path.field("cruising_range_electric_km"),
                    value: Value::String("far".into()),
                    reason: "not an integer".into(),
                },
            ],
        };
        assert_eq!(err.leaves().len(), 2);
        assert!(err.to_string().contains("2 field errors in BatteryStatus"));
    }
}
