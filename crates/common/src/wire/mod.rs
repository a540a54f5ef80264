//! Conversion between typed records and JSON wire payloads
//!
//! [`to_wire`] turns any named-field record into a [`WireRecord`]:
//!
//! - `rust_decimal::Decimal` values render as their exact base-10 string
//!   (`12.50` stays `"12.50"`)
//! - `chrono` dates and datetimes render as ISO-8601 strings
//! - nested records and sequences are converted depth-first
//! - `null` values are removed from objects at every depth and from arrays
//!
//! Key order follows field declaration order, so converting the same record
//! twice yields byte-identical JSON.
//!
//! ```
//! use freeagent_common::wire::to_wire;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Explanation {
//!     description: String,
//!     bank_transaction: Option<String>,
//! }
//!
//! let record = to_wire(&Explanation { description: "Coffee".into(), bank_transaction: None })?;
//! assert_eq!(serde_json::to_string(&record)?, r#"{"description":"Coffee"}"#);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod probe;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use self::probe::{probe, ProbeError, Shape};

/// JSON object in field order, with nulls removed
pub type WireRecord = Map<String, Value>;

/// Wire conversion errors
#[derive(Debug, Error)]
pub enum WireError {
    /// Top-level value is not a named-field record
    #[error("unsupported input kind: {kind}")]
    UnsupportedInputKind { kind: String },

    /// A field's `Serialize` impl failed
    #[error("failed to encode record: {0}")]
    Encode(String),

    /// A wire record does not match the target type
    #[error("failed to decode record: {0}")]
    Decode(String),
}

/// Convert a record into its wire representation
///
/// # Errors
/// - `WireError::UnsupportedInputKind` for scalars, sequences, maps, unit and
///   enum values
/// - `WireError::Encode` when a field fails to serialize
pub fn to_wire<T: Serialize + ?Sized>(record: &T) -> Result<WireRecord, WireError> {
    match probe(record) {
        Ok(Shape::Record) => {}
        Err(ProbeError::Unsupported(kind)) => {
            return Err(WireError::UnsupportedInputKind { kind: kind.to_string() });
        }
        Err(ProbeError::Custom(msg)) => return Err(WireError::Encode(msg)),
    }

    match serde_json::to_value(record).map_err(|e| WireError::Encode(e.to_string()))? {
        Value::Object(map) => Ok(strip_nulls_from_map(map)),
        other => Err(WireError::UnsupportedInputKind { kind: kind_of(&other).to_string() }),
    }
}

/// Decode a wire record into a typed record
///
/// # Errors
/// Returns `WireError::Decode` when fields are missing or mistyped
pub fn from_wire<T: DeserializeOwned>(record: WireRecord) -> Result<T, WireError> {
    serde_json::from_value(Value::Object(record)).map_err(|e| WireError::Decode(e.to_string()))
}

/// Wrap `body` as `{root_key: body}`
#[must_use]
pub fn envelope(root_key: &str, body: WireRecord) -> WireRecord {
    let mut wrapped = Map::with_capacity(1);
    wrapped.insert(root_key.to_string(), Value::Object(body));
    wrapped
}

fn strip_nulls_from_map(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key, strip_nulls(value)))
        .collect()
}

fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(strip_nulls_from_map(map)),
        Value::Array(items) => {
            Value::Array(items.into_iter().filter(|item| !item.is_null()).map(strip_nulls).collect())
        }
        other => other,
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "map",
    }
}
