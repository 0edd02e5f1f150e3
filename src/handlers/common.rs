use crate::errors::ServiceError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use validator::Validate;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard created response: the newly assigned id plus a message.
pub fn created_response(id: i32, message: &str) -> Response {
    (
        StatusCode::CREATED,
        Json(json!({ "id": id, "message": message })),
    )
        .into_response()
}

/// Standard mutation acknowledgement.
pub fn message_response(message: &str) -> Response {
    (StatusCode::OK, Json(json!({ "message": message }))).into_response()
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ServiceError> {
    input
        .validate()
        .map_err(|e| ServiceError::ValidationError(format!("Validation failed: {}", e)))
}

/// Unwraps a required body field, turning its absence into a descriptive
/// 400 instead of a deserialization failure.
pub fn require<T>(value: Option<T>, field: &str) -> Result<T, ServiceError> {
    value.ok_or_else(|| ServiceError::ValidationError(format!("Field '{field}' is required")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_names_the_missing_field() {
        let err = require(None::<String>, "code").unwrap_err();
        assert_eq!(err.to_string(), "Field 'code' is required");

        assert_eq!(require(Some(7), "id").unwrap(), 7);
    }
}
