use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::AppError;

/// Failure detail in the single shape every slice stores, whatever its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedError {
    /// Human readable failure message.
    pub message: String,
    /// HTTP status code when the failure came from a backend response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl SerializedError {
    /// Creates a serialized error without a status code.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }
}

impl From<&AppError> for SerializedError {
    fn from(value: &AppError) -> Self {
        Self {
            message: value.to_string(),
            status: value.status_code(),
        }
    }
}

impl From<AppError> for SerializedError {
    fn from(value: AppError) -> Self {
        Self::from(&value)
    }
}

impl From<SerializedError> for AppError {
    fn from(value: SerializedError) -> Self {
        let SerializedError { message, status } = value;
        match status {
            Some(400) => Self::Validation(message),
            Some(401) => Self::Unauthorized(message),
            Some(403) => Self::Forbidden(message),
            Some(404) => Self::NotFound(message),
            Some(409) => Self::Conflict(message),
            Some(status) => Self::Server { status, message },
            None => Self::Internal(message),
        }
    }
}

impl Display for SerializedError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(formatter, "{} (status {status})", self.message),
            None => write!(formatter, "{}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::SerializedError;
    use crate::AppError;

    #[test]
    fn not_found_keeps_status_code() {
        let error = SerializedError::from(AppError::NotFound("task '999'".to_owned()));
        assert_eq!(error.status, Some(404));
        assert_eq!(error.message, "not found: task '999'");
    }

    #[test]
    fn missing_status_is_omitted_on_the_wire() {
        let error = SerializedError::new("connection refused");
        let value = serde_json::to_value(&error).unwrap_or_default();
        assert_eq!(value, json!({ "message": "connection refused" }));
    }

    #[test]
    fn status_selects_error_category_when_converted_back() {
        let error = AppError::from(SerializedError {
            message: "gone".to_owned(),
            status: Some(404),
        });
        assert_eq!(error, AppError::NotFound("gone".to_owned()));

        let error = AppError::from(SerializedError::new("refused"));
        assert_eq!(error.status_code(), None);
    }
}
