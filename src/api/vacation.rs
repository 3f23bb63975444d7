use std::str::FromStr;

use crate::auth::auth::AuthUser;
use crate::error::VacationError;
use crate::model::vacation::{Decision, UpcomingVacation, VacationRequest};
use crate::service::vacation::VacationService;
use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct VacationPeriod {
    #[schema(example = "2024-03-11", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-03-15", format = "date", value_type = String)]
    pub end_date: NaiveDate,
}

#[derive(Deserialize, IntoParams)]
pub struct UpcomingFilter {
    /// First start date to include, defaults to today
    #[param(value_type = Option<String>, example = "2024-03-01")]
    pub from: Option<NaiveDate>,
    /// Maximum rows returned (1..=100)
    #[param(example = 10)]
    pub limit: Option<i64>,
}

/* =========================
Submit vacation (Employee)
========================= */
#[utoipa::path(
    post,
    path = "/api/vacation",
    request_body = VacationPeriod,
    responses(
        (status = 201, description = "Vacation request submitted", body = VacationRequest),
        (status = 400, description = "Invalid or empty range, or insufficient balance"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Overlaps an active request")
    ),
    security(("bearer_auth" = [])),
    tag = "Vacation"
)]
pub async fn submit_vacation(
    auth: AuthUser,
    service: web::Data<VacationService>,
    payload: web::Json<VacationPeriod>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee()?;

    let balance = service.get_balance(employee_id).await?;
    let created = service
        .submit(employee_id, payload.start_date, payload.end_date, balance)
        .await?;

    Ok(HttpResponse::Created().json(created))
}

/* =========================
Edit pending vacation (Employee)
========================= */
#[utoipa::path(
    put,
    path = "/api/vacation/{request_id}",
    params(("request_id" = i64, Path, description = "Vacation request to edit")),
    request_body = VacationPeriod,
    responses(
        (status = 200, description = "Vacation request updated", body = VacationRequest),
        (status = 400, description = "Invalid or empty range, or insufficient balance"),
        (status = 403, description = "Request belongs to another employee"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request already decided or overlaps another")
    ),
    security(("bearer_auth" = [])),
    tag = "Vacation"
)]
pub async fn edit_vacation(
    auth: AuthUser,
    service: web::Data<VacationService>,
    path: web::Path<i64>,
    payload: web::Json<VacationPeriod>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee()?;
    let request_id = path.into_inner();

    let balance = service.get_balance(employee_id).await?;
    let updated = service
        .edit(
            request_id,
            employee_id,
            payload.start_date,
            payload.end_date,
            balance,
        )
        .await?;

    Ok(HttpResponse::Ok().json(updated))
}

/* =========================
Approve / reject (Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/vacation/{request_id}/{decision}",
    params(
        ("request_id" = i64, Path, description = "Vacation request to decide"),
        ("decision" = String, Path, description = "approve or reject")
    ),
    responses(
        (status = 200, description = "Decision recorded", body = Object, example = json!({
            "message": "Vacation request Approved"
        })),
        (status = 400, description = "Unknown decision"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request already decided")
    ),
    security(("bearer_auth" = [])),
    tag = "Vacation"
)]
pub async fn decide_vacation(
    auth: AuthUser,
    service: web::Data<VacationService>,
    path: web::Path<(i64, String)>,
) -> actix_web::Result<impl Responder> {
    auth.require_reviewer()?;

    let (request_id, raw) = path.into_inner();
    let decision = Decision::from_str(&raw).map_err(|_| VacationError::InvalidDecision(raw))?;

    service.decide(request_id, decision).await?;

    let status = decision.target_status();
    tracing::info!(request_id, reviewer = %auth.username, status = status.as_ref(), "Decision recorded");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Vacation request {}", status.as_ref())
    })))
}

/// Caller's own requests, newest first.
#[utoipa::path(
    get,
    path = "/api/vacation/mine",
    responses(
        (status = 200, description = "Vacation history", body = [VacationRequest]),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Vacation"
)]
pub async fn my_vacations(
    auth: AuthUser,
    service: web::Data<VacationService>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee()?;
    let history = service.history(employee_id).await?;
    Ok(HttpResponse::Ok().json(history))
}

/// Review queue, oldest submission first.
#[utoipa::path(
    get,
    path = "/api/vacation/pending",
    responses(
        (status = 200, description = "Pending requests", body = [VacationRequest]),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Vacation"
)]
pub async fn pending_vacations(
    auth: AuthUser,
    service: web::Data<VacationService>,
) -> actix_web::Result<impl Responder> {
    auth.require_reviewer()?;
    let pending = service.pending_requests().await?;
    Ok(HttpResponse::Ok().json(pending))
}

#[utoipa::path(
    get,
    path = "/api/vacation/upcoming",
    params(UpcomingFilter),
    responses(
        (status = 200, description = "Approved vacations starting soon", body = [UpcomingVacation]),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Vacation"
)]
pub async fn upcoming_vacations(
    auth: AuthUser,
    service: web::Data<VacationService>,
    query: web::Query<UpcomingFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_reviewer()?;

    let from = query.from.unwrap_or_else(|| Utc::now().date_naive());
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let upcoming = service.upcoming(from, limit).await?;
    Ok(HttpResponse::Ok().json(upcoming))
}
