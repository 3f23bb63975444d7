use crate::auth::auth::AuthUser;
use crate::model::employee::EmployeeBalance;
use crate::service::vacation::VacationService;
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct OpenAccount {
    #[schema(example = "Jana Novak")]
    pub name: String,
    /// Omit to grant the configured annual allotment
    #[schema(example = 20, nullable = true)]
    pub remaining_days: Option<i64>,
}

#[derive(Serialize, ToSchema)]
pub struct BalanceResponse {
    #[schema(example = 7)]
    pub employee_id: i64,
    #[schema(example = 15)]
    pub remaining_days: i64,
}

#[utoipa::path(
    post,
    path = "/api/employee",
    request_body = OpenAccount,
    responses(
        (status = 201, description = "Employee balance opened", body = EmployeeBalance),
        (status = 400, description = "Empty name or negative balance"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn open_account(
    auth: AuthUser,
    service: web::Data<VacationService>,
    payload: web::Json<OpenAccount>,
) -> actix_web::Result<impl Responder> {
    auth.require_reviewer()?;

    let account = service
        .open_account(&payload.name, payload.remaining_days)
        .await?;
    Ok(HttpResponse::Created().json(account))
}

/// Caller's own remaining days.
#[utoipa::path(
    get,
    path = "/api/balance",
    responses(
        (status = 200, description = "Remaining days", body = BalanceResponse),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn my_balance(
    auth: AuthUser,
    service: web::Data<VacationService>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee()?;
    let remaining_days = service.get_balance(employee_id).await?;

    Ok(HttpResponse::Ok().json(BalanceResponse {
        employee_id,
        remaining_days,
    }))
}

#[utoipa::path(
    get,
    path = "/api/employee/{employee_id}/balance",
    params(("employee_id" = i64, Path, description = "Employee to look up")),
    responses(
        (status = 200, description = "Remaining days", body = BalanceResponse),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn employee_balance(
    auth: AuthUser,
    service: web::Data<VacationService>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    auth.require_reviewer()?;

    let employee_id = path.into_inner();
    let remaining_days = service.get_balance(employee_id).await?;

    Ok(HttpResponse::Ok().json(BalanceResponse {
        employee_id,
        remaining_days,
    }))
}

/// Restores the configured annual allotment (super admin).
#[utoipa::path(
    post,
    path = "/api/employee/{employee_id}/balance/reset",
    params(("employee_id" = i64, Path, description = "Employee to reset")),
    responses(
        (status = 200, description = "Balance reset", body = BalanceResponse),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn reset_balance(
    auth: AuthUser,
    service: web::Data<VacationService>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    auth.require_super_admin()?;

    let employee_id = path.into_inner();
    let remaining_days = service.reset_annual_allotment(employee_id).await?;

    tracing::info!(employee_id, by = %auth.username, "Annual allotment reset");
    Ok(HttpResponse::Ok().json(BalanceResponse {
        employee_id,
        remaining_days,
    }))
}
