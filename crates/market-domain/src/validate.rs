//! Per-field validation rules and the field-error map returned on 422s.

use std::collections::BTreeMap;

use serde::Serialize;

pub const VALIDATION_LEN_FAILED: &str = "error.model.validation_len_failed";
pub const VALIDATION_FAILED: &str = "error.model.validation_failed";

pub const FULL_NAME_LEN: (usize, usize) = (1, 50);
pub const ROOM_LEN: (usize, usize) = (1, 10);
pub const PHONE_LEN: (usize, usize) = (8, 15);
pub const IDENTITY_NUMBER_LEN: (usize, usize) = (9, 12);
pub const PASSWORD_LEN: (usize, usize) = (8, 72);
pub const NAME_LEN: (usize, usize) = (1, 50);
pub const DESCRIPTION_LEN: (usize, usize) = (1, 125);

pub const GENDERS: [&str; 3] = ["male", "female", "other"];

/// A single field failure, as serialized inside the `errors` map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub message: String,
    pub message_code: &'static str,
}

/// Validation failures keyed by field name.
///
/// Every field is evaluated; all failures are collected before the request is
/// rejected as a whole. `BTreeMap` keeps the serialized key order stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub BTreeMap<&'static str, FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn add(&mut self, field: &'static str, message: String, message_code: &'static str) {
        self.0.insert(
            field,
            FieldError {
                message,
                message_code,
            },
        );
    }

    /// `Ok(())` when no field failed, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Character-length rule shared by most text fields.
pub fn check_len(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    (min, max): (usize, usize),
) {
    let len = value.chars().count();
    if len < min || len > max {
        errors.add(
            field,
            format!("Validation len failed: {field} must be {min} to {max} characters"),
            VALIDATION_LEN_FAILED,
        );
    }
}

pub fn check_gender(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if !GENDERS.contains(&value) {
        errors.add(
            field,
            format!("Validation failed: {field} must be one of male, female, other"),
            VALIDATION_FAILED,
        );
    }
}

/// Minimal `local@domain` shape check. Full address validation is the mail
/// system's problem.
pub fn check_email(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    let valid = match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    };
    if !valid {
        errors.add(
            field,
            format!("Validation failed: {field} must be an email address"),
            VALIDATION_FAILED,
        );
    }
}
