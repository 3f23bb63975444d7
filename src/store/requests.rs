//! Vacation request rows.

use chrono::NaiveDate;
use sqlx::SqliteConnection;

use crate::error::VacationError;
use crate::model::vacation::{NewVacation, UpcomingVacation, VacationRequest, VacationStatus};

const COLUMNS: &str = "id, employee_id, start_date, end_date, total_days, status, submitted_at";

pub async fn create(
    conn: &mut SqliteConnection,
    new: &NewVacation,
) -> Result<VacationRequest, VacationError> {
    let sql = format!(
        r#"
        INSERT INTO vacations
            (employee_id, start_date, end_date, total_days, status, submitted_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING {COLUMNS}
        "#
    );

    let created = sqlx::query_as::<_, VacationRequest>(&sql)
        .bind(new.employee_id)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.total_days)
        .bind(new.status)
        .bind(new.submitted_at)
        .fetch_one(conn)
        .await?;

    Ok(created)
}

pub async fn get_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<VacationRequest, VacationError> {
    let sql = format!("SELECT {COLUMNS} FROM vacations WHERE id = ?");

    sqlx::query_as::<_, VacationRequest>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| VacationError::request_not_found(id))
}

/// Pending and Approved requests of one employee, unordered.
pub async fn list_active_for_employee(
    conn: &mut SqliteConnection,
    employee_id: i64,
) -> Result<Vec<VacationRequest>, VacationError> {
    let sql = format!(
        r#"
        SELECT {COLUMNS}
        FROM vacations
        WHERE employee_id = ?
        AND status IN ('Pending', 'Approved')
        "#
    );

    let rows = sqlx::query_as::<_, VacationRequest>(&sql)
        .bind(employee_id)
        .fetch_all(conn)
        .await?;

    Ok(rows)
}

/// Every Pending request, oldest submission first.
pub async fn list_pending_all(
    conn: &mut SqliteConnection,
) -> Result<Vec<VacationRequest>, VacationError> {
    let sql = format!(
        r#"
        SELECT {COLUMNS}
        FROM vacations
        WHERE status = 'Pending'
        ORDER BY submitted_at ASC, id ASC
        "#
    );

    let rows = sqlx::query_as::<_, VacationRequest>(&sql)
        .fetch_all(conn)
        .await?;

    Ok(rows)
}

/// Full history of one employee, newest submission first.
pub async fn list_for_employee(
    conn: &mut SqliteConnection,
    employee_id: i64,
) -> Result<Vec<VacationRequest>, VacationError> {
    let sql = format!(
        r#"
        SELECT {COLUMNS}
        FROM vacations
        WHERE employee_id = ?
        ORDER BY submitted_at DESC, id DESC
        "#
    );

    let rows = sqlx::query_as::<_, VacationRequest>(&sql)
        .bind(employee_id)
        .fetch_all(conn)
        .await?;

    Ok(rows)
}

pub async fn list_upcoming_approved(
    conn: &mut SqliteConnection,
    from: NaiveDate,
    limit: i64,
) -> Result<Vec<UpcomingVacation>, VacationError> {
    let rows = sqlx::query_as::<_, UpcomingVacation>(
        r#"
        SELECT v.id, v.employee_id, e.name AS employee_name, v.start_date, v.end_date
        FROM vacations v
        JOIN employees e ON e.id = v.employee_id
        WHERE v.status = 'Approved'
        AND v.start_date >= ?
        ORDER BY v.start_date ASC, v.id ASC
        LIMIT ?
        "#,
    )
    .bind(from)
    .bind(limit)
    .fetch_all(conn)
    .await?;

    Ok(rows)
}

/// Moves a Pending request to `new_status`.
///
/// Returns false when the row is missing or was already decided, so a request
/// leaves Pending exactly once even under concurrent reviewers.
pub async fn update_status(
    conn: &mut SqliteConnection,
    id: i64,
    new_status: VacationStatus,
) -> Result<bool, VacationError> {
    let result = sqlx::query(
        r#"
        UPDATE vacations
        SET status = ?
        WHERE id = ?
        AND status = 'Pending'
        "#,
    )
    .bind(new_status)
    .bind(id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Rewrites the period of a request that is still Pending at write time.
///
/// The status condition is re-checked here; a read taken earlier in the
/// operation is not enough to allow the edit.
pub async fn update_dates(
    conn: &mut SqliteConnection,
    id: i64,
    start: NaiveDate,
    end: NaiveDate,
    total_days: i64,
) -> Result<bool, VacationError> {
    let result = sqlx::query(
        r#"
        UPDATE vacations
        SET start_date = ?, end_date = ?, total_days = ?
        WHERE id = ?
        AND status = 'Pending'
        "#,
    )
    .bind(start)
    .bind(end)
    .bind(total_days)
    .bind(id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() == 1)
}
