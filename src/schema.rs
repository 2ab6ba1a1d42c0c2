//! Schema tables
//!
//! A [`Schema`] is a static description of a record: its name and an ordered
//! table of [`FieldSpec`]s. Tables are declared once per record type as
//! `static` items and consulted by the generic decoder and encoder.

use std::collections::HashSet;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::coerce::Coercion;
use crate::key::normalize_key;

/// Semantic type of a field value
#[derive(Debug, Clone, Copy)]
pub enum ValueType {
    Bool,
    Int,
    Float,
    Str,
    /// Absolute instant with offset
    Timestamp,
    /// String-keyed mapping of verbatim JSON values
    Map,
    StrList,
    /// List of verbatim JSON objects
    ObjectList,
    /// Any JSON value, kept verbatim
    Json,
    /// A nested record
    Record(&'static Schema),
    /// An ordered list of nested records
    RecordList(&'static Schema),
}

impl ValueType {
    /// The nested schema, for record-valued types
    pub fn schema(&self) -> Option<&'static Schema> {
        match self {
            ValueType::Record(schema) | ValueType::RecordList(schema) => Some(schema),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Bool => write!(f, "bool"),
            ValueType::Int => write!(f, "int"),
            ValueType::Float => write!(f, "float"),
            ValueType::Str => write!(f, "string"),
            ValueType::Timestamp => write!(f, "timestamp"),
            ValueType::Map => write!(f, "map"),
            ValueType::StrList => write!(f, "list<string>"),
            ValueType::ObjectList => write!(f, "list<object>"),
            ValueType::Json => write!(f, "json"),
            ValueType::Record(schema) => write!(f, "{}", schema.name),
            ValueType::RecordList(schema) => write!(f, "list<{}>", schema.name),
        }
    }
}

impl Serialize for ValueType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Descriptor of a single record field
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    /// Output field name (canonical `snake_case`)
    pub name: &'static str,
    /// Exact source key, bypassing key normalization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<&'static str>,
    #[serde(rename = "type")]
    pub ty: ValueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coercion: Option<Coercion>,
    pub required: bool,
}

impl FieldSpec {
    /// An optional field read from its normalized key
    pub const fn new(name: &'static str, ty: ValueType) -> Self {
        Self {
            name,
            alias: None,
            ty,
            coercion: None,
            required: false,
        }
    }

    pub const fn alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    pub const fn coerce(mut self, coercion: Coercion) -> Self {
        self.coercion = Some(coercion);
        self
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Key this field is read from and written to
    pub fn source_key(&self) -> &'static str {
        self.alias.unwrap_or(self.name)
    }
}

/// A named record shape
#[derive(Debug, Serialize)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl Schema {
    pub const fn new(name: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self { name, fields }
    }

    /// Get a field by output name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Wire key of a field: its alias, else its name
    pub fn source_key(&self, name: &str) -> Option<&'static str> {
        self.field(name).map(FieldSpec::source_key)
    }

    /// Names of the required fields
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }

    /// Whether a `null` document decodes without error
    pub fn is_all_optional(&self) -> bool {
        self.fields.iter().all(|f| !f.required)
    }

    /// This schema and every schema reachable from it, depth first, each once
    pub fn walk(&'static self) -> Vec<&'static Schema> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.walk_into(&mut seen, &mut out);
        out
    }

    fn walk_into(&'static self, seen: &mut HashSet<&'static str>, out: &mut Vec<&'static Schema>) {
        if !seen.insert(self.name) {
            return;
        }
        out.push(self);
        for field in self.fields {
            if let Some(nested) = field.ty.schema() {
                nested.walk_into(seen, out);
            }
        }
    }

    /// Lint this table (not nested tables)
    pub fn check(&self) -> Vec<SchemaIssue> {
        let mut issues = Vec::new();
        let mut names = HashSet::new();
        let mut keys = HashSet::new();

        for field in self.fields {
            if !names.insert(field.name) {
                issues.push(self.issue(field, IssueCode::DuplicateField, "field declared twice".into()));
            }

            let lookup_key = match field.alias {
                Some(alias) => alias.to_string(),
                None => normalize_key(field.name),
            };
            if !keys.insert(lookup_key.clone()) {
                issues.push(self.issue(
                    field,
                    IssueCode::DuplicateSourceKey,
                    format!("source key `{}` is read by another field", lookup_key),
                ));
            }

            if field.alias.is_none() && lookup_key != field.name {
                issues.push(self.issue(
                    field,
                    IssueCode::NonCanonicalName,
                    format!("normalized key `{}` never matches; declare an alias", lookup_key),
                ));
            }

            if let Some(coercion) = field.coercion {
                if !coercion.produces(&field.ty) {
                    issues.push(self.issue(
                        field,
                        IssueCode::CoercionTypeMismatch,
                        format!("{} does not produce {}", coercion, field.ty),
                    ));
                }
            }
        }

        issues
    }

    /// Lint this table and every nested table
    pub fn check_all(&'static self) -> Vec<SchemaIssue> {
        self.walk().into_iter().flat_map(|s| s.check()).collect()
    }

    fn issue(&self, field: &FieldSpec, code: IssueCode, message: String) -> SchemaIssue {
        SchemaIssue {
            schema: self.name,
            field: field.name,
            code,
            message,
        }
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Problem found by [`Schema::check`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaIssue {
    pub schema: &'static str,
    pub field: &'static str,
    pub code: IssueCode,
    pub message: String,
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}.{}: {}", self.code, self.schema, self.field, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IssueCode {
    DuplicateField,
    DuplicateSourceKey,
    NonCanonicalName,
    CoercionTypeMismatch,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuplicateField => "S001",
            Self::DuplicateSourceKey => "S002",
            Self::NonCanonicalName => "S003",
            Self::CoercionTypeMismatch => "S004",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static INNER: Schema = Schema::new("Inner", &[FieldSpec::new("value", ValueType::Int)]);

    static OUTER: Schema = Schema::new(
        "Outer",
        &[
            FieldSpec::new("inner", ValueType::Record(&INNER)),
            FieldSpec::new("items", ValueType::RecordList(&INNER)),
            FieldSpec::new("soc", ValueType::Int).alias("currentSOC_pct").required(),
        ],
    );

    static BROKEN: Schema = Schema::new(
        "Broken",
        &[
            FieldSpec::new("locked", ValueType::Str).coerce(Coercion::LockState),
            FieldSpec::new("locked", ValueType::Bool),
            FieldSpec::new("targetTemp", ValueType::Int),
            FieldSpec::new("other", ValueType::Int).alias("locked"),
        ],
    );

    #[test]
    fn test_builder() {
        let soc = OUTER.field("soc").unwrap();
        assert_eq!(soc.source_key(), "currentSOC_pct");
        assert!(soc.required);
        assert!(!OUTER.is_all_optional());
        assert_eq!(OUTER.required_fields().collect::<Vec<_>>(), vec!["soc"]);
        assert_eq!(OUTER.field("inner").unwrap().source_key(), "inner");
        assert_eq!(OUTER.source_key("soc"), Some("currentSOC_pct"));
        assert_eq!(OUTER.source_key("missing"), None);
    }

    #[test]
    fn test_walk_visits_each_schema_once() {
        let names: Vec<_> = OUTER.walk().iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Outer", "Inner"]);
    }

    #[test]
    fn test_check_clean() {
        assert!(OUTER.check_all().is_empty());
    }

    #[test]
    fn test_check_reports_issues() {
        let codes: Vec<_> = BROKEN.check().into_iter().map(|i| i.code).collect();
        assert!(codes.contains(&IssueCode::CoercionTypeMismatch));
        assert!(codes.contains(&IssueCode::DuplicateField));
        assert!(codes.contains(&IssueCode::NonCanonicalName));
        assert!(codes.contains(&IssueCode::DuplicateSourceKey));
    }

    #[test]
    fn test_serialize_table() {
        let json = serde_json::to_value(&OUTER).unwrap();
        assert_eq!(json["name"], "Outer");
        assert_eq!(json["fields"][1]["type"], "list<Inner>");
        assert_eq!(json["fields"][2]["alias"], "currentSOC_pct");
        assert!(json["fields"][0].get("alias").is_none());
    }
}
