//! Field-level readers for goal-shaped JSON objects.
//!
//! Shared by snapshot decoding and plan-draft parsing so both report the same
//! `GoalValidationError` for the same defect.

use crate::model::goal::{GoalCategory, GoalValidationError};
use serde_json::{Map, Value};

pub(crate) fn as_object<'a>(
    value: &'a Value,
) -> Result<&'a Map<String, Value>, GoalValidationError> {
    value.as_object().ok_or_else(|| GoalValidationError::InvalidField {
        field: "record",
        message: format!("expected object, got {}", json_type(value)),
    })
}

pub(crate) fn required_str(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<String, GoalValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(GoalValidationError::MissingField(field)),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(other) => Err(unexpected(field, "string", other)),
    }
}

pub(crate) fn optional_str(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, GoalValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(other) => Err(unexpected(field, "string", other)),
    }
}

pub(crate) fn required_number(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<f64, GoalValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(GoalValidationError::MissingField(field)),
        Some(Value::Number(value)) => value
            .as_f64()
            .ok_or_else(|| unexpected(field, "number", &Value::Number(value.clone()))),
        Some(other) => Err(unexpected(field, "number", other)),
    }
}

pub(crate) fn required_category(
    object: &Map<String, Value>,
) -> Result<GoalCategory, GoalValidationError> {
    required_str(object, "category")?.parse()
}

fn unexpected(field: &'static str, expected: &str, actual: &Value) -> GoalValidationError {
    GoalValidationError::InvalidField {
        field,
        message: format!("expected {expected}, got {}", json_type(actual)),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
