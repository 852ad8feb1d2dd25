//! Request body decoding and schema validation.
//!
//! Each request type declares a [`Schema`] listing its fields, their kind and
//! whether they are required. Bodies are parsed to JSON, checked against the
//! schema by the injected [`Validator`], then converted to the typed request.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::web::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldRule {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        FieldRule {
            name,
            kind,
            required: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub fields: &'static [FieldRule],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
    /// Absent, null, empty string or zero.
    Missing,
    /// Present with a value of the wrong JSON type.
    WrongType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub problem: Problem,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn has_type_errors(&self) -> bool {
        self.errors.iter().any(|e| e.problem == Problem::WrongType)
    }

    pub fn fields(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.field.to_string()).collect()
    }
}

pub trait Validator: Send + Sync {
    fn validate(
        &self,
        schema: &Schema,
        input: &Map<String, Value>,
    ) -> Result<(), ValidationErrors>;
}

/// Rejects required fields that are absent or hold their zero value.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequiredFieldValidator;

impl Validator for RequiredFieldValidator {
    fn validate(
        &self,
        schema: &Schema,
        input: &Map<String, Value>,
    ) -> Result<(), ValidationErrors> {
        let errors: Vec<FieldError> = schema
            .fields
            .iter()
            .filter_map(|rule| {
                check_field(rule, input.get(rule.name)).map(|problem| FieldError {
                    field: rule.name,
                    problem,
                })
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { errors })
        }
    }
}

fn check_field(rule: &FieldRule, value: Option<&Value>) -> Option<Problem> {
    let value = match value {
        None | Some(Value::Null) => return rule.required.then_some(Problem::Missing),
        Some(value) => value,
    };

    let is_zero = match (rule.kind, value) {
        (FieldKind::Text, Value::String(s)) => s.is_empty(),
        (FieldKind::Integer, Value::Number(n)) => match n.as_i64() {
            Some(i) if i32::try_from(i).is_ok() => i == 0,
            _ => return Some(Problem::WrongType),
        },
        _ => return Some(Problem::WrongType),
    };

    (is_zero && rule.required).then_some(Problem::Missing)
}

/// A JSON request body with a declared schema and its error messages.
pub trait RequestSchema: DeserializeOwned {
    const SCHEMA: Schema;
    const DECODE_MESSAGE: &'static str = "Failed to parse body";
    const VALIDATION_MESSAGE: &'static str = "Validation failed";
}

/// Parses `body` as `T`, reporting malformed JSON or mistyped fields as a
/// decode error and missing required fields as a validation error.
///
/// A literal `null` body is treated as an object with every field absent.
pub fn decode_request<T: RequestSchema>(
    validator: &dyn Validator,
    body: &[u8],
) -> Result<T, AppError> {
    let decode_error = || AppError::Decode(T::DECODE_MESSAGE.to_string());

    let object = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => object,
        Ok(Value::Null) => Map::new(),
        _ => return Err(decode_error()),
    };

    if let Err(errors) = validator.validate(&T::SCHEMA, &object) {
        if errors.has_type_errors() {
            return Err(decode_error());
        }
        return Err(AppError::Validation {
            message: T::VALIDATION_MESSAGE.to_string(),
            fields: errors.fields(),
        });
    }

    serde_json::from_value(Value::Object(object)).map_err(|_| decode_error())
}
