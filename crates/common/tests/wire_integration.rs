//! Integration tests for wire conversion of nested records

use chrono::{NaiveDate, TimeZone, Utc};
use freeagent_common::wire::{envelope, from_wire, to_wire, WireError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Attachment {
    file_name: String,
    description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Explanation {
    category: String,
    dated_on: NaiveDate,
    gross_value: Decimal,
    description: Option<String>,
    attachment: Option<Attachment>,
    tags: Vec<Option<String>>,
    created_at: chrono::DateTime<Utc>,
}

fn explanation() -> Explanation {
    Explanation {
        category: "https://api.freeagent.com/v2/categories/285".to_string(),
        dated_on: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
        gross_value: Decimal::new(-1250, 2),
        description: None,
        attachment: Some(Attachment { file_name: "receipt.pdf".to_string(), description: None }),
        tags: vec![Some("travel".to_string()), None],
        created_at: Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap(),
    }
}

/// Validates depth-first conversion: decimals and dates as strings, nulls
/// removed from nested objects and arrays.
#[test]
fn test_nested_record_conversion() {
    let record = to_wire(&explanation()).unwrap();

    assert_eq!(
        Value::Object(record),
        json!({
            "category": "https://api.freeagent.com/v2/categories/285",
            "dated_on": "2024-05-17",
            "gross_value": "-12.50",
            "attachment": {"file_name": "receipt.pdf"},
            "tags": ["travel"],
            "created_at": "2024-05-17T09:30:00Z"
        })
    );
}

/// Validates that repeated conversion produces byte-identical JSON.
#[test]
fn test_conversion_is_deterministic() {
    let record = explanation();

    let first = serde_json::to_string(&to_wire(&record).unwrap()).unwrap();
    let second = serde_json::to_string(&to_wire(&record).unwrap()).unwrap();

    assert_eq!(first, second);
}

/// Validates that conversion leaves the input untouched and decodes back.
#[test]
fn test_decode_after_encode() {
    let mut record = explanation();
    record.tags = vec![Some("travel".to_string())];
    record.description = Some("Train".to_string());

    let decoded: Explanation = from_wire(to_wire(&record).unwrap()).unwrap();

    assert_eq!(decoded, record);
}

/// Validates the root-key envelope used by PUT and POST.
#[test]
fn test_envelope_shape() {
    let body = to_wire(&explanation()).unwrap();

    let wrapped = envelope("bank_transaction_explanation", body.clone());

    assert_eq!(Value::Object(wrapped), json!({"bank_transaction_explanation": body}));
}

/// Validates the unsupported top-level kinds reported to callers.
#[test]
fn test_unsupported_inputs() {
    assert!(matches!(
        to_wire(&vec![explanation()]),
        Err(WireError::UnsupportedInputKind { ref kind }) if kind == "sequence"
    ));
    assert!(matches!(
        to_wire(&Decimal::new(1, 0)),
        Err(WireError::UnsupportedInputKind { ref kind }) if kind == "string"
    ));
    assert!(matches!(
        to_wire(&()),
        Err(WireError::UnsupportedInputKind { ref kind }) if kind == "unit"
    ));
}
