//! Vacation lifecycle: submit, edit and decide.
//!
//! Each public mutation runs in exactly one transaction. Validation happens
//! before the first write; any error after that drops the transaction, which
//! rolls back the ledger and the request row together.

use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{debug, info, instrument, warn};

use crate::db;
use crate::error::VacationError;
use crate::model::employee::EmployeeBalance;
use crate::model::vacation::{
    Decision, NewVacation, UpcomingVacation, VacationRequest, VacationStatus,
};
use crate::service::clock::Clock;
use crate::store::{ledger, requests};
use crate::utils::calendar;

pub struct VacationService {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
    default_vacation_days: i64,
}

/// Working days of a candidate period, rejecting reversed or weekend-only ranges.
fn working_days(start: NaiveDate, end: NaiveDate) -> Result<i64, VacationError> {
    if start > end {
        return Err(VacationError::InvalidRange { start, end });
    }

    match calendar::count_working_days(start, end) {
        0 => Err(VacationError::EmptyRange { start, end }),
        days => Ok(days),
    }
}

/// First active request in `active` that collides with `[start, end]`.
fn find_overlap<'a>(
    active: &'a [VacationRequest],
    start: NaiveDate,
    end: NaiveDate,
    ignore_id: Option<i64>,
) -> Option<&'a VacationRequest> {
    active
        .iter()
        .filter(|r| Some(r.id) != ignore_id && r.status.is_active())
        .find(|r| r.overlaps(start, end))
}

impl VacationService {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>, default_vacation_days: i64) -> Self {
        Self {
            pool,
            clock,
            default_vacation_days,
        }
    }

    /// Files a new Pending request and debits its working days.
    #[instrument(skip(self))]
    pub async fn submit(
        &self,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        current_balance: i64,
    ) -> Result<VacationRequest, VacationError> {
        let days = working_days(start, end)?;

        if days > current_balance {
            debug!(days, current_balance, "Submission exceeds balance");
            return Err(VacationError::InsufficientBalance {
                requested: days,
                available: current_balance,
            });
        }

        let mut tx = db::begin_write(&self.pool).await?;

        let active = requests::list_active_for_employee(&mut tx, employee_id).await?;
        if let Some(conflict) = find_overlap(&active, start, end, None) {
            warn!(conflicting_id = conflict.id, "Submission overlaps active request");
            return Err(VacationError::OverlapConflict {
                conflicting_id: conflict.id,
            });
        }

        ledger::apply_delta_or_explain(&mut tx, employee_id, -days).await?;

        let created = requests::create(
            &mut tx,
            &NewVacation {
                employee_id,
                start_date: start,
                end_date: end,
                total_days: days,
                status: VacationStatus::Pending,
                submitted_at: self.clock.now(),
            },
        )
        .await?;

        tx.commit().await?;

        info!(request_id = created.id, employee_id, days, "Vacation request submitted");
        Ok(created)
    }

    /// Moves the period of a Pending request and settles the day difference.
    #[instrument(skip(self))]
    pub async fn edit(
        &self,
        request_id: i64,
        employee_id: i64,
        new_start: NaiveDate,
        new_end: NaiveDate,
        current_balance: i64,
    ) -> Result<VacationRequest, VacationError> {
        let mut tx = db::begin_write(&self.pool).await?;

        let current = requests::get_by_id(&mut tx, request_id).await?;
        if current.employee_id != employee_id {
            warn!(owner = current.employee_id, "Edit of another employee's request");
            return Err(VacationError::Forbidden { request_id });
        }
        if current.status != VacationStatus::Pending {
            return Err(VacationError::InvalidState {
                request_id,
                status: current.status,
            });
        }

        let new_days = working_days(new_start, new_end)?;
        let delta = new_days - current.total_days;

        if delta > 0 && delta > current_balance {
            debug!(delta, current_balance, "Edit exceeds balance");
            return Err(VacationError::InsufficientBalance {
                requested: delta,
                available: current_balance,
            });
        }

        let active = requests::list_active_for_employee(&mut tx, employee_id).await?;
        if let Some(conflict) = find_overlap(&active, new_start, new_end, Some(request_id)) {
            warn!(conflicting_id = conflict.id, "Edit overlaps active request");
            return Err(VacationError::OverlapConflict {
                conflicting_id: conflict.id,
            });
        }

        if !requests::update_dates(&mut tx, request_id, new_start, new_end, new_days).await? {
            // decided between our read and the write
            let latest = requests::get_by_id(&mut tx, request_id).await?;
            return Err(VacationError::InvalidState {
                request_id,
                status: latest.status,
            });
        }

        if delta != 0 {
            ledger::apply_delta_or_explain(&mut tx, employee_id, -delta).await?;
        }

        let updated = requests::get_by_id(&mut tx, request_id).await?;
        tx.commit().await?;

        info!(request_id, employee_id, delta, "Vacation request edited");
        Ok(updated)
    }

    /// Approves or rejects a Pending request; a rejection refunds its days.
    #[instrument(skip(self))]
    pub async fn decide(&self, request_id: i64, decision: Decision) -> Result<bool, VacationError> {
        let mut tx = db::begin_write(&self.pool).await?;

        let current = requests::get_by_id(&mut tx, request_id).await?;
        if current.status != VacationStatus::Pending {
            return Err(VacationError::InvalidState {
                request_id,
                status: current.status,
            });
        }

        if decision == Decision::Reject {
            ledger::apply_delta_or_explain(&mut tx, current.employee_id, current.total_days)
                .await?;
        }

        let target = decision.target_status();
        if !requests::update_status(&mut tx, request_id, target).await? {
            let latest = requests::get_by_id(&mut tx, request_id).await?;
            return Err(VacationError::InvalidState {
                request_id,
                status: latest.status,
            });
        }

        tx.commit().await?;

        info!(
            request_id,
            employee_id = current.employee_id,
            status = target.as_ref(),
            "Vacation request decided"
        );
        Ok(true)
    }

    pub async fn get_balance(&self, employee_id: i64) -> Result<i64, VacationError> {
        let mut conn = self.pool.acquire().await?;
        ledger::get_balance(&mut conn, employee_id).await
    }

    /// Registers an employee balance; `None` grants the configured allotment.
    #[instrument(skip(self))]
    pub async fn open_account(
        &self,
        name: &str,
        initial_days: Option<i64>,
    ) -> Result<EmployeeBalance, VacationError> {
        let initial = initial_days.unwrap_or(self.default_vacation_days);
        let mut conn = self.pool.acquire().await?;
        let account = ledger::open_account(&mut conn, name, initial).await?;

        info!(employee_id = account.id, initial, "Employee balance opened");
        Ok(account)
    }

    /// Restores the configured annual allotment, returning the new balance.
    #[instrument(skip(self))]
    pub async fn reset_annual_allotment(&self, employee_id: i64) -> Result<i64, VacationError> {
        let mut tx = db::begin_write(&self.pool).await?;

        let current = ledger::get_balance(&mut tx, employee_id).await?;
        let delta = self.default_vacation_days - current;
        if delta != 0 {
            ledger::apply_delta_or_explain(&mut tx, employee_id, delta).await?;
        }

        tx.commit().await?;

        info!(employee_id, delta, "Annual allotment restored");
        Ok(self.default_vacation_days)
    }

    pub async fn pending_requests(&self) -> Result<Vec<VacationRequest>, VacationError> {
        let mut conn = self.pool.acquire().await?;
        requests::list_pending_all(&mut conn).await
    }

    pub async fn history(&self, employee_id: i64) -> Result<Vec<VacationRequest>, VacationError> {
        let mut conn = self.pool.acquire().await?;
        requests::list_for_employee(&mut conn, employee_id).await
    }

    pub async fn upcoming(
        &self,
        from: NaiveDate,
        limit: i64,
    ) -> Result<Vec<UpcomingVacation>, VacationError> {
        let mut conn = self.pool.acquire().await?;
        requests::list_upcoming_approved(&mut conn, from, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{file_test_pool, test_pool};
    use crate::service::clock::testing::SteppingClock;
    use chrono::{TimeZone, Utc};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    async fn service() -> (VacationService, SqlitePool) {
        let pool = test_pool().await;
        let clock = SteppingClock::starting_at(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap());
        (VacationService::new(pool.clone(), Arc::new(clock), 20), pool)
    }

    /// Service over a WAL file with a pool of several connections.
    async fn file_service() -> (VacationService, tempfile::TempDir) {
        let (pool, dir) = file_test_pool().await;
        let clock = SteppingClock::starting_at(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap());
        (VacationService::new(pool, Arc::new(clock), 20), dir)
    }

    async fn employee(svc: &VacationService, days: i64) -> i64 {
        svc.open_account("Jana", Some(days)).await.unwrap().id
    }

    /// Submits with the balance the ledger currently holds, as the web layer does.
    async fn submit(
        svc: &VacationService,
        emp: i64,
        start: &str,
        end: &str,
    ) -> Result<VacationRequest, VacationError> {
        let balance = svc.get_balance(emp).await.unwrap();
        svc.submit(emp, date(start), date(end), balance).await
    }

    async fn edit(
        svc: &VacationService,
        id: i64,
        emp: i64,
        start: &str,
        end: &str,
    ) -> Result<VacationRequest, VacationError> {
        let balance = svc.get_balance(emp).await.unwrap();
        svc.edit(id, emp, date(start), date(end), balance).await
    }

    async fn request_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM vacations")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[actix_web::test]
    async fn submit_week_debits_five_days() {
        let (svc, _) = service().await;
        let emp = employee(&svc, 20).await;

        let req = submit(&svc, emp, "2024-03-11", "2024-03-15").await.unwrap();

        assert_eq!(req.total_days, 5);
        assert_eq!(req.status, VacationStatus::Pending);
        assert_eq!(req.employee_id, emp);
        assert_eq!(svc.get_balance(emp).await.unwrap(), 15);
    }

    #[actix_web::test]
    async fn submit_weekend_only_is_empty_range() {
        let (svc, pool) = service().await;
        let emp = employee(&svc, 20).await;

        let err = submit(&svc, emp, "2024-03-16", "2024-03-17").await.unwrap_err();

        assert!(matches!(err, VacationError::EmptyRange { .. }));
        assert_eq!(svc.get_balance(emp).await.unwrap(), 20);
        assert_eq!(request_count(&pool).await, 0);
    }

    #[actix_web::test]
    async fn submit_reversed_range_is_invalid() {
        let (svc, _) = service().await;
        let emp = employee(&svc, 20).await;

        let err = submit(&svc, emp, "2024-03-15", "2024-03-11").await.unwrap_err();
        assert!(matches!(err, VacationError::InvalidRange { .. }));
    }

    #[actix_web::test]
    async fn submit_beyond_balance_changes_nothing() {
        let (svc, pool) = service().await;
        let emp = employee(&svc, 5).await;

        // two full weeks, 10 working days
        let err = submit(&svc, emp, "2024-03-11", "2024-03-22").await.unwrap_err();

        assert!(matches!(
            err,
            VacationError::InsufficientBalance {
                requested: 10,
                available: 5
            }
        ));
        assert_eq!(svc.get_balance(emp).await.unwrap(), 5);
        assert_eq!(request_count(&pool).await, 0);
    }

    #[actix_web::test]
    async fn stale_caller_balance_is_caught_by_ledger() {
        let (svc, pool) = service().await;
        let emp = employee(&svc, 3).await;

        let err = svc
            .submit(emp, date("2024-03-11"), date("2024-03-15"), 50)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            VacationError::InsufficientBalance {
                requested: 5,
                available: 3
            }
        ));
        assert_eq!(request_count(&pool).await, 0);
    }

    #[actix_web::test]
    async fn submit_for_unknown_employee_is_not_found() {
        let (svc, pool) = service().await;

        let err = svc
            .submit(77, date("2024-03-11"), date("2024-03-15"), 20)
            .await
            .unwrap_err();

        assert!(matches!(err, VacationError::NotFound { id: 77, .. }));
        assert_eq!(request_count(&pool).await, 0);
    }

    #[actix_web::test]
    async fn overlapping_submission_is_rejected() {
        let (svc, pool) = service().await;
        let emp = employee(&svc, 20).await;
        let first = submit(&svc, emp, "2024-03-11", "2024-03-15").await.unwrap();

        // shares Friday the 15th
        let err = submit(&svc, emp, "2024-03-15", "2024-03-19").await.unwrap_err();

        match err {
            VacationError::OverlapConflict { conflicting_id } => {
                assert_eq!(conflicting_id, first.id)
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(svc.get_balance(emp).await.unwrap(), 15);
        assert_eq!(request_count(&pool).await, 1);
    }

    #[actix_web::test]
    async fn overlap_with_approved_request_is_rejected() {
        let (svc, _) = service().await;
        let emp = employee(&svc, 20).await;
        let first = submit(&svc, emp, "2024-03-11", "2024-03-15").await.unwrap();
        svc.decide(first.id, Decision::Approve).await.unwrap();

        let err = submit(&svc, emp, "2024-03-13", "2024-03-13").await.unwrap_err();
        assert!(matches!(err, VacationError::OverlapConflict { .. }));
    }

    #[actix_web::test]
    async fn rejected_request_frees_its_period() {
        let (svc, _) = service().await;
        let emp = employee(&svc, 20).await;
        let first = submit(&svc, emp, "2024-03-11", "2024-03-15").await.unwrap();
        svc.decide(first.id, Decision::Reject).await.unwrap();

        let again = submit(&svc, emp, "2024-03-11", "2024-03-15").await.unwrap();
        assert_eq!(again.total_days, 5);
        assert_eq!(svc.get_balance(emp).await.unwrap(), 15);
    }

    #[actix_web::test]
    async fn other_employees_do_not_conflict() {
        let (svc, _) = service().await;
        let a = employee(&svc, 20).await;
        let b = employee(&svc, 20).await;

        submit(&svc, a, "2024-03-11", "2024-03-15").await.unwrap();
        submit(&svc, b, "2024-03-11", "2024-03-15").await.unwrap();
    }

    #[actix_web::test]
    async fn failed_insert_rolls_back_the_debit() {
        let (svc, pool) = service().await;
        let emp = employee(&svc, 20).await;
        sqlx::query(
            "CREATE TRIGGER no_insert BEFORE INSERT ON vacations \
             BEGIN SELECT RAISE(ABORT, 'insert refused'); END",
        )
        .execute(&pool)
        .await
        .unwrap();

        let err = submit(&svc, emp, "2024-03-11", "2024-03-15").await.unwrap_err();

        assert!(matches!(err, VacationError::Persistence(_)));
        assert!(!err.is_validation());
        assert_eq!(svc.get_balance(emp).await.unwrap(), 20);
        assert_eq!(request_count(&pool).await, 0);
    }

    #[actix_web::test]
    async fn edit_shrinking_refunds_difference() {
        let (svc, _) = service().await;
        let emp = employee(&svc, 20).await;
        let req = submit(&svc, emp, "2024-03-11", "2024-03-15").await.unwrap();

        let updated = edit(&svc, req.id, emp, "2024-03-11", "2024-03-13").await.unwrap();

        assert_eq!(updated.total_days, 3);
        assert_eq!(updated.end_date, date("2024-03-13"));
        assert_eq!(updated.submitted_at, req.submitted_at);
        assert_eq!(svc.get_balance(emp).await.unwrap(), 17);
    }

    #[actix_web::test]
    async fn edit_growing_debits_difference() {
        let (svc, _) = service().await;
        let emp = employee(&svc, 20).await;
        let req = submit(&svc, emp, "2024-03-11", "2024-03-13").await.unwrap();

        let updated = edit(&svc, req.id, emp, "2024-03-11", "2024-03-19").await.unwrap();

        assert_eq!(updated.total_days, 7);
        assert_eq!(svc.get_balance(emp).await.unwrap(), 13);
    }

    #[actix_web::test]
    async fn edit_reports_incremental_shortfall() {
        let (svc, _) = service().await;
        let emp = employee(&svc, 6).await;
        let req = submit(&svc, emp, "2024-03-11", "2024-03-15").await.unwrap();

        // 10 days wanted, 5 already held, only 1 left
        let err = edit(&svc, req.id, emp, "2024-03-11", "2024-03-22").await.unwrap_err();

        assert!(matches!(
            err,
            VacationError::InsufficientBalance {
                requested: 5,
                available: 1
            }
        ));
        assert_eq!(svc.get_balance(emp).await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn edit_ignores_its_own_period_but_not_others() {
        let (svc, _) = service().await;
        let emp = employee(&svc, 20).await;
        let first = submit(&svc, emp, "2024-03-11", "2024-03-15").await.unwrap();
        let second = submit(&svc, emp, "2024-03-25", "2024-03-29").await.unwrap();

        edit(&svc, first.id, emp, "2024-03-12", "2024-03-15").await.unwrap();

        let err = edit(&svc, first.id, emp, "2024-03-12", "2024-03-25").await.unwrap_err();
        match err {
            VacationError::OverlapConflict { conflicting_id } => {
                assert_eq!(conflicting_id, second.id)
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[actix_web::test]
    async fn edit_of_foreign_request_is_forbidden() {
        let (svc, _) = service().await;
        let owner = employee(&svc, 20).await;
        let intruder = employee(&svc, 20).await;
        let req = submit(&svc, owner, "2024-03-11", "2024-03-15").await.unwrap();

        let err = edit(&svc, req.id, intruder, "2024-03-11", "2024-03-12").await.unwrap_err();
        assert!(matches!(err, VacationError::Forbidden { .. }));
    }

    #[actix_web::test]
    async fn edit_of_decided_request_is_invalid_state() {
        let (svc, _) = service().await;
        let emp = employee(&svc, 20).await;
        let req = submit(&svc, emp, "2024-03-11", "2024-03-15").await.unwrap();
        svc.decide(req.id, Decision::Approve).await.unwrap();

        let err = edit(&svc, req.id, emp, "2024-03-11", "2024-03-12").await.unwrap_err();
        assert!(matches!(
            err,
            VacationError::InvalidState {
                status: VacationStatus::Approved,
                ..
            }
        ));
        assert_eq!(svc.get_balance(emp).await.unwrap(), 15);
    }

    #[actix_web::test]
    async fn edit_of_missing_request_is_not_found() {
        let (svc, _) = service().await;
        let emp = employee(&svc, 20).await;

        let err = edit(&svc, 5, emp, "2024-03-11", "2024-03-12").await.unwrap_err();
        assert!(matches!(err, VacationError::NotFound { id: 5, .. }));
    }

    #[actix_web::test]
    async fn edit_reversed_range_is_invalid() {
        let (svc, _) = service().await;
        let emp = employee(&svc, 20).await;
        let req = submit(&svc, emp, "2024-03-11", "2024-03-15").await.unwrap();

        let err = edit(&svc, req.id, emp, "2024-03-15", "2024-03-11").await.unwrap_err();

        assert!(matches!(err, VacationError::InvalidRange { .. }));
        assert_eq!(svc.get_balance(emp).await.unwrap(), 15);
        let stored = &svc.history(emp).await.unwrap()[0];
        assert_eq!(stored.start_date, date("2024-03-11"));
        assert_eq!(stored.end_date, date("2024-03-15"));
        assert_eq!(stored.total_days, 5);
    }

    #[actix_web::test]
    async fn edit_to_weekend_is_empty_range() {
        let (svc, _) = service().await;
        let emp = employee(&svc, 20).await;
        let req = submit(&svc, emp, "2024-03-11", "2024-03-15").await.unwrap();

        let err = edit(&svc, req.id, emp, "2024-03-16", "2024-03-17").await.unwrap_err();
        assert!(matches!(err, VacationError::EmptyRange { .. }));
        assert_eq!(svc.get_balance(emp).await.unwrap(), 15);
    }

    #[actix_web::test]
    async fn failed_ledger_step_rolls_back_date_edit() {
        let (svc, pool) = service().await;
        let emp = employee(&svc, 20).await;
        let req = submit(&svc, emp, "2024-03-11", "2024-03-13").await.unwrap();
        sqlx::query(
            "CREATE TRIGGER no_balance BEFORE UPDATE ON employees \
             BEGIN SELECT RAISE(ABORT, 'ledger offline'); END",
        )
        .execute(&pool)
        .await
        .unwrap();

        let err = edit(&svc, req.id, emp, "2024-03-11", "2024-03-15").await.unwrap_err();

        assert!(matches!(err, VacationError::Persistence(_)));
        let mut conn = pool.acquire().await.unwrap();
        let stored = requests::get_by_id(&mut conn, req.id).await.unwrap();
        assert_eq!(stored.total_days, 3);
        assert_eq!(stored.end_date, date("2024-03-13"));
    }

    #[actix_web::test]
    async fn reject_refunds_and_closes() {
        let (svc, pool) = service().await;
        let emp = employee(&svc, 20).await;
        let req = submit(&svc, emp, "2024-03-11", "2024-03-15").await.unwrap();

        assert!(svc.decide(req.id, Decision::Reject).await.unwrap());

        assert_eq!(svc.get_balance(emp).await.unwrap(), 20);
        let mut conn = pool.acquire().await.unwrap();
        let stored = requests::get_by_id(&mut conn, req.id).await.unwrap();
        assert_eq!(stored.status, VacationStatus::Rejected);
    }

    #[actix_web::test]
    async fn approve_keeps_days_debited() {
        let (svc, _) = service().await;
        let emp = employee(&svc, 20).await;
        let req = submit(&svc, emp, "2024-03-11", "2024-03-15").await.unwrap();

        assert!(svc.decide(req.id, Decision::Approve).await.unwrap());
        assert_eq!(svc.get_balance(emp).await.unwrap(), 15);
    }

    #[actix_web::test]
    async fn deciding_twice_is_invalid_state() {
        let (svc, pool) = service().await;
        let emp = employee(&svc, 20).await;
        let req = submit(&svc, emp, "2024-03-11", "2024-03-15").await.unwrap();
        svc.decide(req.id, Decision::Approve).await.unwrap();

        let err = svc.decide(req.id, Decision::Reject).await.unwrap_err();

        assert!(matches!(err, VacationError::InvalidState { .. }));
        assert_eq!(svc.get_balance(emp).await.unwrap(), 15);
        let mut conn = pool.acquire().await.unwrap();
        let stored = requests::get_by_id(&mut conn, req.id).await.unwrap();
        assert_eq!(stored.status, VacationStatus::Approved);
    }

    #[actix_web::test]
    async fn deciding_missing_request_is_not_found() {
        let (svc, _) = service().await;
        let err = svc.decide(1, Decision::Approve).await.unwrap_err();
        assert!(matches!(err, VacationError::NotFound { id: 1, .. }));
    }

    #[actix_web::test]
    async fn failed_status_write_rolls_back_refund() {
        let (svc, pool) = service().await;
        let emp = employee(&svc, 20).await;
        let req = submit(&svc, emp, "2024-03-11", "2024-03-15").await.unwrap();
        sqlx::query(
            "CREATE TRIGGER no_status BEFORE UPDATE OF status ON vacations \
             BEGIN SELECT RAISE(ABORT, 'status locked'); END",
        )
        .execute(&pool)
        .await
        .unwrap();

        let err = svc.decide(req.id, Decision::Reject).await.unwrap_err();

        assert!(matches!(err, VacationError::Persistence(_)));
        assert_eq!(svc.get_balance(emp).await.unwrap(), 15);
    }

    #[actix_web::test]
    async fn concurrent_overlapping_submissions_debit_once() {
        let (svc, _dir) = file_service().await;
        let emp = employee(&svc, 20).await;

        let (a, b) = futures::join!(
            svc.submit(emp, date("2024-03-11"), date("2024-03-15"), 20),
            svc.submit(emp, date("2024-03-13"), date("2024-03-19"), 20),
        );

        let (won, lost) = match (a, b) {
            (Ok(won), Err(lost)) | (Err(lost), Ok(won)) => (won, lost),
            other => panic!("expected exactly one success, got {other:?}"),
        };
        assert!(matches!(
            lost,
            VacationError::OverlapConflict { conflicting_id } if conflicting_id == won.id
        ));
        assert_eq!(svc.get_balance(emp).await.unwrap(), 20 - won.total_days);
        assert_eq!(svc.history(emp).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn concurrent_submissions_of_different_employees_all_commit() {
        let (svc, _dir) = file_service().await;
        let mut staff = Vec::new();
        for _ in 0..8 {
            staff.push(employee(&svc, 20).await);
        }

        let results = futures::future::join_all(
            staff
                .iter()
                .map(|emp| svc.submit(*emp, date("2024-03-11"), date("2024-03-15"), 20)),
        )
        .await;

        for result in &results {
            assert!(result.is_ok(), "submission failed: {result:?}");
        }
        for emp in staff {
            assert_eq!(svc.get_balance(emp).await.unwrap(), 15);
        }
    }

    #[actix_web::test]
    async fn balance_matches_active_requests_after_mixed_operations() {
        let (svc, _) = service().await;
        let emp = employee(&svc, 20).await;

        let a = submit(&svc, emp, "2024-03-11", "2024-03-15").await.unwrap();
        let b = submit(&svc, emp, "2024-04-01", "2024-04-05").await.unwrap();
        let c = submit(&svc, emp, "2024-05-06", "2024-05-08").await.unwrap();
        edit(&svc, b.id, emp, "2024-04-01", "2024-04-10").await.unwrap();
        svc.decide(a.id, Decision::Approve).await.unwrap();
        svc.decide(c.id, Decision::Reject).await.unwrap();
        let _ = submit(&svc, emp, "2024-06-03", "2024-06-28").await;
        let _ = edit(&svc, a.id, emp, "2024-03-11", "2024-03-11").await;
        let d = submit(&svc, emp, "2024-07-01", "2024-07-01").await.unwrap();
        edit(&svc, d.id, emp, "2024-07-01", "2024-07-02").await.unwrap();

        let held: i64 = svc
            .history(emp)
            .await
            .unwrap()
            .iter()
            .filter(|r| r.status.is_active())
            .map(|r| r.total_days)
            .sum();
        let balance = svc.get_balance(emp).await.unwrap();
        assert!(balance >= 0);
        assert_eq!(balance, 20 - held);
    }

    #[actix_web::test]
    async fn pending_queue_is_oldest_first_and_history_newest_first() {
        let (svc, _) = service().await;
        let emp = employee(&svc, 20).await;
        let first = submit(&svc, emp, "2024-03-11", "2024-03-12").await.unwrap();
        let second = submit(&svc, emp, "2024-04-01", "2024-04-02").await.unwrap();

        let queue: Vec<i64> = svc.pending_requests().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(queue, vec![first.id, second.id]);

        let history: Vec<i64> = svc.history(emp).await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(history, vec![second.id, first.id]);
    }

    #[actix_web::test]
    async fn upcoming_shows_only_approved_from_date() {
        let (svc, _) = service().await;
        let emp = employee(&svc, 20).await;
        let approved = submit(&svc, emp, "2024-04-01", "2024-04-02").await.unwrap();
        submit(&svc, emp, "2024-05-01", "2024-05-02").await.unwrap();
        svc.decide(approved.id, Decision::Approve).await.unwrap();

        let upcoming = svc.upcoming(date("2024-03-01"), 10).await.unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].id, approved.id);
    }

    #[actix_web::test]
    async fn open_account_defaults_and_annual_reset() {
        let (svc, _) = service().await;
        let emp = svc.open_account("Petr", None).await.unwrap();
        assert_eq!(emp.remaining_days, 20);

        submit(&svc, emp.id, "2024-03-11", "2024-03-15").await.unwrap();
        assert_eq!(svc.reset_annual_allotment(emp.id).await.unwrap(), 20);
        assert_eq!(svc.get_balance(emp.id).await.unwrap(), 20);

        let err = svc.reset_annual_allotment(999).await.unwrap_err();
        assert!(matches!(err, VacationError::NotFound { id: 999, .. }));
    }
}
