use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};
use utoipa::ToSchema;

use crate::utils::calendar;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, AsRefStr, ToSchema,
)]
pub enum VacationStatus {
    Pending,
    Approved,
    Rejected,
}

impl VacationStatus {
    /// Pending and Approved requests hold days and block overlapping periods.
    pub fn is_active(self) -> bool {
        matches!(self, VacationStatus::Pending | VacationStatus::Approved)
    }
}

/// Reviewer verdict on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, EnumString, ToSchema)]
#[strum(ascii_case_insensitive)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn target_status(self) -> VacationStatus {
        match self {
            Decision::Approve => VacationStatus::Approved,
            Decision::Reject => VacationStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "employee_id": 7,
    "start_date": "2024-03-11",
    "end_date": "2024-03-15",
    "total_days": 5,
    "status": "Pending",
    "submitted_at": "2024-03-01T08:00:00Z"
}))]
pub struct VacationRequest {
    pub id: i64,
    pub employee_id: i64,
    #[schema(example = "2024-03-11", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-03-15", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    /// working days between start and end, fixed when the dates were last set
    pub total_days: i64,
    pub status: VacationStatus,
    #[schema(example = "2024-03-01T08:00:00Z", format = "date-time", value_type = String)]
    pub submitted_at: DateTime<Utc>,
}

impl VacationRequest {
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        calendar::intervals_overlap(self.start_date, self.end_date, start, end)
    }
}

/// Row inserted by the store; the id is assigned by the database.
#[derive(Debug, Clone)]
pub struct NewVacation {
    pub employee_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: i64,
    pub status: VacationStatus,
    pub submitted_at: DateTime<Utc>,
}

/// Approved vacation joined with the employee's name, for the reviewer dashboard.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct UpcomingVacation {
    pub id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    #[schema(example = "2024-03-11", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-03-15", format = "date", value_type = String)]
    pub end_date: NaiveDate,
}
