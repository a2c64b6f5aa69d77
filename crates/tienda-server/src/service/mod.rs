//! Per-resource validation and output formatting.
//!
//! Validation applies to the create path only; updates accept arbitrary
//! partial payloads. Formatting coerces the numeric fields of each resource
//! to JSON numbers on the way out, so a document created with
//! `"price": "10"` reads back as `"price": 10`.

mod clients;
mod products;

pub use clients::ClientService;
pub use products::ProductService;

use serde_json::Value;
use tienda_storage::{Payload, StoredDocument};

/// Validation and formatting rules for one resource type.
///
/// Implementations are shared across request handlers, so they must be
/// usable behind a `&dyn` reference held across await points.
pub trait ResourceService: Sync {
    /// Fields coerced to JSON numbers when serializing a document.
    fn numeric_fields(&self) -> &'static [&'static str];

    /// Validates a create payload, collecting every problem rather than
    /// stopping at the first.
    fn validate_create(&self, payload: &Payload) -> Vec<String>;

    /// Serializes a document for the HTTP surface: payload flattened next to
    /// `"storageId"`, numeric fields coerced.
    fn format(&self, doc: &StoredDocument) -> Value {
        let mut out = doc.payload.clone();
        for field in self.numeric_fields() {
            if let Some(value) = out.get(*field) {
                if let Some(coerced) = coerce_number(value) {
                    out.insert((*field).to_string(), coerced);
                }
            }
        }
        let mut wrapped = serde_json::Map::new();
        for (k, v) in out {
            wrapped.insert(k, v);
        }
        // Inserted last so a payload field named "storageId" can never mask
        // the store-assigned identifier.
        wrapped.insert("storageId".to_string(), Value::String(doc.storage_id.clone()));
        Value::Object(wrapped)
    }
}

/// Reads a value as a JSON number: numbers pass through, numeric strings
/// are parsed. Integer-valued strings parse as integers so they round-trip
/// without a fractional part. Returns `None` for anything else (nulls stay
/// null).
fn coerce_number(value: &Value) -> Option<Value> {
    match value {
        Value::Number(_) => Some(value.clone()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(int) = s.parse::<i64>() {
                return Some(Value::Number(int.into()));
            }
            let parsed: f64 = s.parse().ok()?;
            serde_json::Number::from_f64(parsed).map(Value::Number)
        }
        _ => None,
    }
}

/// True when the value is a number or a string parseable as one.
pub(crate) fn is_numeric(value: &Value) -> bool {
    coerce_number(value).is_some()
}

/// True when the value is a non-empty string.
pub(crate) fn is_nonempty_string(value: &Value) -> bool {
    matches!(value, Value::String(s) if !s.trim().is_empty())
}

/// Shared required-field check used by both resource services.
pub(crate) fn require_numeric(payload: &Payload, field: &str, errors: &mut Vec<String>) {
    match payload.get(field) {
        None | Some(Value::Null) => errors.push(format!("{field} is required")),
        Some(value) if !is_numeric(value) => errors.push(format!("{field} must be numeric")),
        Some(_) => {}
    }
}

pub(crate) fn require_name(payload: &Payload, errors: &mut Vec<String>) {
    match payload.get("name") {
        None | Some(Value::Null) => errors.push("name is required".to_string()),
        Some(value) if !is_nonempty_string(value) => {
            errors.push("name must be a non-empty string".to_string())
        }
        Some(_) => {}
    }
}
