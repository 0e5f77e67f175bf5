//! Envelope types shared by every endpoint.

use serde::{Deserialize, Serialize};

/// A plain acknowledgement, e.g. after logout or delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One field-scoped validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrorResponse {
    pub field: String,
    pub message: String,
}

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A human-readable summary of the failure.
    pub error: String,

    /// The HTTP status code.
    pub status: u16,

    /// Per-field validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldErrorResponse>>,

    /// Request ID for debugging purposes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status,
            fields: None,
            request_id: None,
        }
    }

    pub fn with_fields(mut self, fields: Vec<FieldErrorResponse>) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    // Common error constructors
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(400, error)
    }

    pub fn unauthorized(error: impl Into<String>) -> Self {
        Self::new(401, error)
    }

    pub fn forbidden() -> Self {
        Self::new(403, "You do not have permission to perform this action.")
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self::new(404, error)
    }

    pub fn conflict(error: impl Into<String>) -> Self {
        Self::new(409, error)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal server error")
    }
}
