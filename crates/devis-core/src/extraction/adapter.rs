//! Converts a parsed provider response into an [`ExtractedRecord`].

use serde_json::{Map, Value};
use tracing::debug;

use super::Result;
use crate::error::ExtractionError;
use crate::models::field::{ExtractedField, FieldValue};
use crate::models::record::{ExtractedRecord, FieldName, OptionalFields, RequiredFields};

/// Confidence assumed when the provider omits one.
pub const DEFAULT_CONFIDENCE: f32 = 0.5;

/// Raw provider response: field key to `{value, confidence, source_text, alternatives}`.
pub type RawResponse = Map<String, Value>;

/// Strip a Markdown code fence and parse the JSON object inside.
pub fn parse_response_text(text: &str) -> Result<RawResponse> {
    let body = strip_code_fence(text);

    let value: Value = serde_json::from_str(body.trim())
        .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ExtractionError::MalformedResponse(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let inner = if let Some((_, rest)) = text.split_once("```json") {
        rest
    } else if let Some((_, rest)) = text.split_once("```") {
        rest
    } else {
        return text;
    };

    inner.split("```").next().unwrap_or(inner)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Build a record from a raw response without judging the values.
///
/// Required fields must be present and non-null; optional fields are kept
/// only when their `value` is non-null and not blank.
pub fn adapt_response(raw: &RawResponse) -> Result<ExtractedRecord> {
    let required = |name: FieldName| -> Result<ExtractedField> {
        match raw.get(name.key()) {
            None | Some(Value::Null) => Err(ExtractionError::MissingField(name.key().to_string())),
            Some(payload) => make_field(name, payload),
        }
    };

    let required_fields = RequiredFields {
        client_surname: required(FieldName::ClientSurname)?,
        client_given_name: required(FieldName::ClientGivenName)?,
        address: required(FieldName::Address)?,
        postal_code: required(FieldName::PostalCode)?,
        city: required(FieldName::City)?,
        request_date: required(FieldName::RequestDate)?,
        subject: required(FieldName::Subject)?,
        main_message: required(FieldName::MainMessage)?,
    };

    let optional = |name: FieldName| -> Result<Option<ExtractedField>> {
        let Some(payload) = raw.get(name.key()) else {
            return Ok(None);
        };
        if payload.is_null() {
            return Ok(None);
        }
        let field = make_field(name, payload)?;
        match &field.value {
            Some(value) if !value.is_blank() => Ok(Some(field)),
            _ => Ok(None),
        }
    };

    let optional_fields = OptionalFields {
        lot: optional(FieldName::Lot)?,
        floor: optional(FieldName::Floor)?,
        phone: optional(FieldName::Phone)?,
        email: optional(FieldName::Email)?,
        quote_number: optional(FieldName::QuoteNumber)?,
        desired_response_date: optional(FieldName::DesiredResponseDate)?,
        urgency: optional(FieldName::Urgency)?,
    };

    let record = ExtractedRecord::new(required_fields, optional_fields);
    debug!(
        "Adapted response with {} optional fields",
        record.optional_fields().count()
    );

    Ok(record)
}

/// Text value of a raw payload, used for fields that are mapped rather
/// than validated (e.g. the agency).
pub fn payload_text<'a>(raw: &'a RawResponse, key: &str) -> Option<&'a str> {
    raw.get(key)?
        .get("value")?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn make_field(name: FieldName, payload: &Value) -> Result<ExtractedField> {
    let key = name.key();
    let invalid = |reason: &str| ExtractionError::InvalidPayload {
        field: key.to_string(),
        reason: reason.to_string(),
    };

    let Value::Object(obj) = payload else {
        return Err(invalid(&format!("expected an object, got {}", json_kind(payload))));
    };

    let value = obj.get("value").and_then(FieldValue::from_json);

    let confidence = match obj.get("confidence") {
        None | Some(Value::Null) => DEFAULT_CONFIDENCE as f64,
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| invalid("confidence is not a finite number"))?,
        Some(other) => {
            return Err(invalid(&format!("confidence must be a number, got {}", json_kind(other))));
        }
    };

    let source_text = match obj.get("source_text") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            return Err(invalid(&format!("source_text must be a string, got {}", json_kind(other))));
        }
    };

    let alternatives = match obj.get("alternatives") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(other) => {
            return Err(invalid(&format!("alternatives must be an array, got {}", json_kind(other))));
        }
    };

    let field = ExtractedField::new(value, confidence as f32).map_err(|_| {
        ExtractionError::InvalidConfidence {
            field: key.to_string(),
            value: confidence,
        }
    })?;

    let field = field.with_alternatives(alternatives);
    Ok(match source_text {
        Some(source) => field.with_source_text(source),
        None => field,
    })
}
