//! Employee day balances.
//!
//! Functions take a connection rather than the pool so callers can run them
//! inside the transaction that also touches the request store.

use sqlx::SqliteConnection;

use crate::error::VacationError;
use crate::model::employee::EmployeeBalance;

pub async fn open_account(
    conn: &mut SqliteConnection,
    name: &str,
    initial_days: i64,
) -> Result<EmployeeBalance, VacationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(VacationError::EmptyName);
    }
    if initial_days < 0 {
        return Err(VacationError::InvalidBalance(initial_days));
    }

    let account = sqlx::query_as::<_, EmployeeBalance>(
        r#"
        INSERT INTO employees (name, remaining_days)
        VALUES (?, ?)
        RETURNING id, name, remaining_days
        "#,
    )
    .bind(name)
    .bind(initial_days)
    .fetch_one(conn)
    .await?;

    Ok(account)
}

pub async fn find_account(
    conn: &mut SqliteConnection,
    employee_id: i64,
) -> Result<Option<EmployeeBalance>, VacationError> {
    let account = sqlx::query_as::<_, EmployeeBalance>(
        "SELECT id, name, remaining_days FROM employees WHERE id = ?",
    )
    .bind(employee_id)
    .fetch_optional(conn)
    .await?;

    Ok(account)
}

pub async fn get_balance(
    conn: &mut SqliteConnection,
    employee_id: i64,
) -> Result<i64, VacationError> {
    find_account(conn, employee_id)
        .await?
        .map(|account| account.remaining_days)
        .ok_or_else(|| VacationError::employee_not_found(employee_id))
}

/// Adds `delta` to the balance unless the result would be negative.
///
/// Returns false, writing nothing, for an unknown employee or a balance that
/// would drop below zero. Check and write are one statement.
pub async fn apply_delta(
    conn: &mut SqliteConnection,
    employee_id: i64,
    delta: i64,
) -> Result<bool, VacationError> {
    let result = sqlx::query(
        r#"
        UPDATE employees
        SET remaining_days = remaining_days + ?
        WHERE id = ?
        AND remaining_days + ? >= 0
        "#,
    )
    .bind(delta)
    .bind(employee_id)
    .bind(delta)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// [`apply_delta`] that explains a refusal: unknown employee or short balance.
pub async fn apply_delta_or_explain(
    conn: &mut SqliteConnection,
    employee_id: i64,
    delta: i64,
) -> Result<(), VacationError> {
    if apply_delta(&mut *conn, employee_id, delta).await? {
        return Ok(());
    }

    let available = get_balance(conn, employee_id).await?;
    Err(VacationError::InsufficientBalance {
        requested: -delta,
        available,
    })
}
