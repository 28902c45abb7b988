//! Response validation against statically declared record shapes.
//!
//! Every record type declares the fields it depends on in a [`Schema`].
//! Before a raw body is deserialized it is checked field by field, so that a
//! 200 response whose shape drifted upstream is reported as
//! [`ZaptecError::SchemaValidation`] naming every missing or mistyped field,
//! instead of surfacing as an opaque parse error or being silently
//! defaulted. Unknown fields are ignored.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Result, ZaptecError};
use crate::models::parse_timestamp;

/// Declared shape of a record.
#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

/// One declared field.
#[derive(Debug)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl Field {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// Expected JSON type of a field.
#[derive(Debug)]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Bool,
    /// ISO-8601 timestamp, with or without offset.
    DateTime,
    Uuid,
    Object(&'static Schema),
    ListOf(&'static Schema),
    ListOfStrings,
}

impl FieldKind {
    fn describe(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Bool => "boolean",
            Self::DateTime => "timestamp",
            Self::Uuid => "uuid",
            Self::Object(_) => "object",
            Self::ListOf(_) | Self::ListOfStrings => "array",
        }
    }
}

/// A typed record that can be validated from a raw response.
pub trait Record: DeserializeOwned + Send {
    /// The field set this record depends on.
    const SCHEMA: &'static Schema;

    /// Adjust a raw item before validation.
    fn prepare(_raw: &mut Value) {}
}

/// Accumulated findings of a structural check.
#[derive(Debug, Default)]
struct Report {
    missing_fields: Vec<String>,
    unexpected_types: Vec<String>,
}

impl Report {
    fn is_empty(&self) -> bool {
        self.missing_fields.is_empty() && self.unexpected_types.is_empty()
    }

    fn missing(&mut self, path: String) {
        self.missing_fields.push(path);
    }

    fn mismatch(&mut self, path: &str, expected: &str, found: &Value) {
        self.unexpected_types
            .push(format!("{path}: expected {expected}, found {}", json_type(found)));
    }

    fn into_error(self, schema: &'static str) -> ZaptecError {
        tracing::warn!(
            schema,
            missing = ?self.missing_fields,
            unexpected = ?self.unexpected_types,
            "response does not match expected schema"
        );
        ZaptecError::SchemaValidation {
            schema,
            missing_fields: self.missing_fields,
            unexpected_types: self.unexpected_types,
        }
    }

    fn into_result(self, schema: &'static str) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.into_error(schema))
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn check_record(schema: &Schema, value: &Value, path: &str, report: &mut Report) {
    let Some(object) = value.as_object() else {
        let at = if path.is_empty() { schema.name } else { path };
        report.mismatch(at, "object", value);
        return;
    };
    check_fields(schema, object, path, report);
}

fn check_fields(schema: &Schema, object: &Map<String, Value>, path: &str, report: &mut Report) {
    for field in schema.fields {
        let field_path = join(path, field.name);
        match object.get(field.name) {
            None | Some(Value::Null) => {
                if field.required {
                    report.missing(field_path);
                }
            }
            Some(value) => check_kind(&field.kind, value, &field_path, report),
        }
    }
}

fn check_kind(kind: &FieldKind, value: &Value, path: &str, report: &mut Report) {
    let ok = match (kind, value) {
        (FieldKind::String, Value::String(_)) => true,
        (FieldKind::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
        (FieldKind::Number, Value::Number(_)) => true,
        (FieldKind::Bool, Value::Bool(_)) => true,
        (FieldKind::DateTime, Value::String(s)) => parse_timestamp(s).is_some(),
        (FieldKind::Uuid, Value::String(s)) => uuid::Uuid::parse_str(s).is_ok(),
        (FieldKind::Object(schema), Value::Object(object)) => {
            check_fields(schema, object, path, report);
            true
        }
        (FieldKind::ListOf(schema), Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                check_record(schema, item, &format!("{path}[{i}]"), report);
            }
            true
        }
        (FieldKind::ListOfStrings, Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                if !item.is_string() {
                    report.mismatch(&format!("{path}[{i}]"), "string", item);
                }
            }
            true
        }
        _ => false,
    };

    if !ok {
        report.mismatch(path, kind.describe(), value);
    }
}

fn deserialize<T: Record>(value: Value, path: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ZaptecError::SchemaValidation {
        schema: T::SCHEMA.name,
        missing_fields: Vec::new(),
        unexpected_types: vec![if path.is_empty() {
            e.to_string()
        } else {
            format!("{path}: {e}")
        }],
    })
}

/// Validate a single-object response and map it to `T`.
///
/// # Errors
///
/// Returns [`ZaptecError::SchemaValidation`] listing every absent or
/// mistyped required field.
pub fn validate<T: Record>(mut raw: Value) -> Result<T> {
    T::prepare(&mut raw);

    let mut report = Report::default();
    check_record(T::SCHEMA, &raw, "", &mut report);
    report.into_result(T::SCHEMA.name)?;

    deserialize(raw, "")
}

/// Validate a list envelope (`{"Pages": n, "Data": [...]}`).
///
/// Returns the reported page total and the validated items.
///
/// # Errors
///
/// Returns [`ZaptecError::SchemaValidation`] if the envelope or any item
/// does not match.
pub fn validate_page<T: Record>(raw: Value) -> Result<(u32, Vec<T>)> {
    let mut report = Report::default();

    let mut object = match raw {
        Value::Object(object) => object,
        other => {
            report.mismatch(T::SCHEMA.name, "object", &other);
            return Err(report.into_error(T::SCHEMA.name));
        }
    };

    let total_pages = match object.get("Pages") {
        None | Some(Value::Null) => {
            report.missing("Pages".to_string());
            0
        }
        Some(value) => match value.as_u64() {
            Some(n) => u32::try_from(n).unwrap_or(u32::MAX),
            None => {
                report.mismatch("Pages", "non-negative integer", value);
                0
            }
        },
    };

    let mut items = match object.remove("Data") {
        None | Some(Value::Null) => {
            report.missing("Data".to_string());
            Vec::new()
        }
        Some(Value::Array(items)) => items,
        Some(other) => {
            report.mismatch("Data", "array", &other);
            Vec::new()
        }
    };

    for (i, item) in items.iter_mut().enumerate() {
        T::prepare(item);
        check_record(T::SCHEMA, item, &format!("Data[{i}]"), &mut report);
    }
    report.into_result(T::SCHEMA.name)?;

    let records = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| deserialize(item, &format!("Data[{i}]")))
        .collect::<Result<Vec<T>>>()?;

    Ok((total_pages, records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct Meter {
        name: String,
        reading: f64,
        owner: Owner,
        #[serde(default)]
        note: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct Owner {
        email: String,
    }

    impl Record for Owner {
        const SCHEMA: &'static Schema = &Schema {
            name: "Owner",
            fields: &[Field::required("Email", FieldKind::String)],
        };
    }

    impl Record for Meter {
        const SCHEMA: &'static Schema = &Schema {
            name: "Meter",
            fields: &[
                Field::required("Name", FieldKind::String),
                Field::required("Reading", FieldKind::Number),
                Field::required("Owner", FieldKind::Object(Owner::SCHEMA)),
                Field::optional("Note", FieldKind::String),
            ],
        };

        fn prepare(raw: &mut Value) {
            if let Some(object) = raw.as_object_mut() {
                object.remove("Secret");
            }
        }
    }

    fn meter() -> Value {
        json!({
            "Name": "m1",
            "Reading": 12.5,
            "Owner": {"Email": "a@example.com"},
            "Secret": "dropped",
            "AddedUpstream": true
        })
    }

    #[test]
    fn test_validate_accepts_unknown_fields() {
        let meter: Meter = validate(meter()).unwrap();
        assert_eq!(meter.name, "m1");
        assert_eq!(meter.reading, 12.5);
        assert_eq!(meter.owner.email, "a@example.com");
        assert!(meter.note.is_none());
    }

    #[test]
    fn test_validate_names_missing_fields() {
        let mut raw = meter();
        raw.as_object_mut().unwrap().remove("Reading");
        raw["Owner"].as_object_mut().unwrap().remove("Email");

        match validate::<Meter>(raw).unwrap_err() {
            ZaptecError::SchemaValidation {
                schema,
                missing_fields,
                unexpected_types,
            } => {
                assert_eq!(schema, "Meter");
                assert_eq!(missing_fields, vec!["Reading", "Owner.Email"]);
                assert!(unexpected_types.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_null_required_field_is_missing() {
        let mut raw = meter();
        raw["Name"] = Value::Null;

        let err = validate::<Meter>(raw).unwrap_err();
        assert!(matches!(
            err,
            ZaptecError::SchemaValidation { ref missing_fields, .. } if missing_fields == &["Name"]
        ));
    }

    #[test]
    fn test_validate_reports_type_mismatch() {
        let mut raw = meter();
        raw["Reading"] = json!("12.5");
        raw["Note"] = json!(7);

        match validate::<Meter>(raw).unwrap_err() {
            ZaptecError::SchemaValidation {
                missing_fields,
                unexpected_types,
                ..
            } => {
                assert!(missing_fields.is_empty());
                assert_eq!(
                    unexpected_types,
                    vec![
                        "Reading: expected number, found string",
                        "Note: expected string, found integer"
                    ]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_non_object() {
        let err = validate::<Meter>(json!([1, 2])).unwrap_err();
        assert!(err.is_contract_change());
    }

    #[test]
    fn test_validate_page() {
        let raw = json!({"Pages": 3, "Data": [meter(), meter()]});
        let (pages, items) = validate_page::<Meter>(raw).unwrap();
        assert_eq!(pages, 3);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_validate_page_item_paths() {
        let mut broken = meter();
        broken.as_object_mut().unwrap().remove("Name");
        let raw = json!({"Pages": 1, "Data": [meter(), broken]});

        match validate_page::<Meter>(raw).unwrap_err() {
            ZaptecError::SchemaValidation { missing_fields, .. } => {
                assert_eq!(missing_fields, vec!["Data[1].Name"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_page_envelope() {
        let err = validate_page::<Meter>(json!({"Data": []})).unwrap_err();
        assert!(matches!(
            err,
            ZaptecError::SchemaValidation { ref missing_fields, .. } if missing_fields == &["Pages"]
        ));

        let err = validate_page::<Meter>(json!({"Pages": -1, "Data": []})).unwrap_err();
        assert!(err.is_contract_change());

        let err = validate_page::<Meter>(json!({"Pages": 1, "Data": {}})).unwrap_err();
        assert!(err.is_contract_change());
    }
}
