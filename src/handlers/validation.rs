use std::collections::BTreeMap;

use axum::{extract::rejection::JsonRejection, Json};

use crate::error::ApiError;

/// Unwrap a JSON body, turning axum's rejection into our error envelope
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::invalid_json(rejection.body_text())),
    }
}

/// Path ids are integers; anything else is a client error
pub fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|_| ApiError::bad_request(format!("Invalid id: {}", raw)))
}

/// Collects per-field problems so a response can report all of them at once
#[derive(Debug, Default)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.chars().count();
        if len < min {
            self.0
                .insert(field.to_string(), format!("must be at least {} characters", min));
        } else if len > max {
            self.0
                .insert(field.to_string(), format!("must be at most {} characters", max));
        }
        self
    }

    pub fn optional_length(&mut self, field: &str, value: Option<&str>, min: usize, max: usize) -> &mut Self {
        if let Some(v) = value {
            self.length(field, v, min, max);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self, message: &str) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error(message, self.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_ids_only() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert!(matches!(parse_id("abc"), Err(ApiError::BadRequest(_))));
        assert!(parse_id("").is_err());
    }

    #[test]
    fn collects_length_errors() {
        let mut errors = FieldErrors::new();
        errors
            .length("username", "", 1, 25)
            .length("password", "abcdef", 5, 20)
            .optional_length("activity_name", Some("x".repeat(101).as_str()), 1, 100)
            .optional_length("activity_description", None, 1, 10);

        match errors.into_result("Invalid payload") {
            Err(ApiError::ValidationError { field_errors, .. }) => {
                assert_eq!(field_errors.len(), 2);
                assert!(field_errors.contains_key("username"));
                assert!(field_errors.contains_key("activity_name"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn no_errors_is_ok() {
        let mut errors = FieldErrors::new();
        errors.length("username", "u1", 1, 25);
        assert!(errors.is_empty());
        assert!(errors.into_result("Invalid payload").is_ok());
    }
}
