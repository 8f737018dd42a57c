use crate::types::SlotKey;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failures reported by an appointment backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("an appointment already exists for {0}")]
    Conflict(SlotKey),
    #[error("appointment store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("slot {0} is already booked")]
    SlotAlreadyBooked(SlotKey),
    #[error("appointment store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for SchedulingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(key) => SchedulingError::SlotAlreadyBooked(key),
            StoreError::Unavailable(reason) => SchedulingError::StoreUnavailable(reason),
        }
    }
}

impl SchedulingError {
    /// Text that may be handed to a client. Store faults are logged and
    /// replaced by a generic message.
    pub fn client_message(&self) -> String {
        match self {
            SchedulingError::StoreUnavailable(reason) => {
                error!(%reason, "Appointment store failed while serving request");
                "Internal Server Error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for SchedulingError {
    fn into_response(self) -> Response {
        let status = match self {
            SchedulingError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SchedulingError::SlotAlreadyBooked(_) => StatusCode::CONFLICT,
            SchedulingError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.client_message() }))).into_response()
    }
}
