use crate::api::employee::{BalanceResponse, OpenAccount};
use crate::api::vacation::VacationPeriod;
use crate::model::employee::EmployeeBalance;
use crate::model::vacation::{Decision, UpcomingVacation, VacationRequest, VacationStatus};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vacation API",
        version = "0.1.0",
        description = r#"
## Employee vacation management

Employees submit and edit vacation requests against a remaining-day balance;
admins approve or reject them. A request holds its working days from the
moment it is submitted, a rejection gives them back.

- Working days are Monday to Friday, public holidays are not excluded.
- Periods are closed: a request ending on a day overlaps one starting that day.
- All endpoints require a **JWT Bearer** token issued by the identity service.
"#,
    ),
    paths(
        crate::api::vacation::submit_vacation,
        crate::api::vacation::edit_vacation,
        crate::api::vacation::decide_vacation,
        crate::api::vacation::my_vacations,
        crate::api::vacation::pending_vacations,
        crate::api::vacation::upcoming_vacations,

        crate::api::employee::open_account,
        crate::api::employee::my_balance,
        crate::api::employee::employee_balance,
        crate::api::employee::reset_balance
    ),
    components(
        schemas(
            VacationPeriod,
            VacationRequest,
            VacationStatus,
            Decision,
            UpcomingVacation,
            OpenAccount,
            BalanceResponse,
            EmployeeBalance
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Vacation", description = "Vacation request lifecycle"),
        (name = "Employee", description = "Vacation balances"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
