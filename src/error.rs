use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use chrono::NaiveDate;
use derive_more::Display;
use serde_json::json;

use crate::model::vacation::VacationStatus;

/// Every way a vacation operation can fail.
///
/// All variants except `Persistence` are raised before anything is written;
/// `Persistence` means the enclosing transaction was rolled back.
#[derive(Debug, Display)]
pub enum VacationError {
    #[display(fmt = "start date {} is after end date {}", start, end)]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[display(fmt = "the period {} .. {} contains no working day", start, end)]
    EmptyRange { start: NaiveDate, end: NaiveDate },

    #[display(
        fmt = "insufficient balance: requested {} days, available {}",
        requested,
        available
    )]
    InsufficientBalance { requested: i64, available: i64 },

    #[display(
        fmt = "the period overlaps active vacation request {}",
        conflicting_id
    )]
    OverlapConflict { conflicting_id: i64 },

    #[display(fmt = "{} {} not found", entity, id)]
    NotFound { entity: &'static str, id: i64 },

    #[display(fmt = "vacation request {} belongs to another employee", request_id)]
    Forbidden { request_id: i64 },

    #[display(
        fmt = "vacation request {} is {:?} and can no longer be changed",
        request_id,
        status
    )]
    InvalidState {
        request_id: i64,
        status: VacationStatus,
    },

    #[display(fmt = "employee name cannot be empty")]
    EmptyName,

    #[display(fmt = "balance cannot be negative: {}", _0)]
    InvalidBalance(i64),

    #[display(fmt = "unknown decision {:?}, expected Approve or Reject", _0)]
    InvalidDecision(String),

    #[display(fmt = "transaction failed: {}", _0)]
    Persistence(sqlx::Error),
}

impl VacationError {
    pub fn request_not_found(id: i64) -> Self {
        VacationError::NotFound {
            entity: "vacation request",
            id,
        }
    }

    pub fn employee_not_found(id: i64) -> Self {
        VacationError::NotFound {
            entity: "employee",
            id,
        }
    }

    /// True when the caller's input was rejected, false when the system failed to commit.
    pub fn is_validation(&self) -> bool {
        !matches!(self, VacationError::Persistence(_))
    }
}

impl std::error::Error for VacationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VacationError::Persistence(err) => Some(err),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for VacationError {
    fn from(value: sqlx::Error) -> Self {
        VacationError::Persistence(value)
    }
}

impl ResponseError for VacationError {
    fn status_code(&self) -> StatusCode {
        match self {
            VacationError::InvalidRange { .. }
            | VacationError::EmptyRange { .. }
            | VacationError::InsufficientBalance { .. }
            | VacationError::EmptyName
            | VacationError::InvalidBalance(_)
            | VacationError::InvalidDecision(_) => StatusCode::BAD_REQUEST,
            VacationError::OverlapConflict { .. } | VacationError::InvalidState { .. } => {
                StatusCode::CONFLICT
            }
            VacationError::NotFound { .. } => StatusCode::NOT_FOUND,
            VacationError::Forbidden { .. } => StatusCode::FORBIDDEN,
            VacationError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_validation() {
            tracing::debug!(error = %self, "Vacation operation rejected");
            self.to_string()
        } else {
            tracing::error!(error = %self, "Vacation transaction failed");
            "Internal Server Error".to_string()
        };

        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}
