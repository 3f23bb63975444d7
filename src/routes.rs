use crate::{
    api::{employee, vacation},
    config::Config,
};
use actix_governor::{Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor};
use actix_governor::governor::middleware::NoOpMiddleware;
use actix_web::web;

/// Per-IP limiter; `requests_per_min` of zero is treated as one.
fn build_limiter(requests_per_min: u32) -> Option<GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>> {
    let burst = requests_per_min.max(1);
    let per_ms = (60_000 / burst as u64).max(1);

    GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(burst)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let scope = web::scope(&config.api_prefix)
        .service(
            web::scope("/vacation")
                // /vacation
                .service(web::resource("").route(web::post().to(vacation::submit_vacation)))
                .service(web::resource("/mine").route(web::get().to(vacation::my_vacations)))
                .service(
                    web::resource("/pending").route(web::get().to(vacation::pending_vacations)),
                )
                .service(
                    web::resource("/upcoming").route(web::get().to(vacation::upcoming_vacations)),
                )
                // /vacation/{id}
                .service(web::resource("/{id}").route(web::put().to(vacation::edit_vacation)))
                // /vacation/{id}/approve, /vacation/{id}/reject
                .service(
                    web::resource("/{id}/{decision}")
                        .route(web::put().to(vacation::decide_vacation)),
                ),
        )
        .service(web::resource("/balance").route(web::get().to(employee::my_balance)))
        .service(
            web::scope("/employee")
                .service(web::resource("").route(web::post().to(employee::open_account)))
                .service(
                    web::resource("/{id}/balance").route(web::get().to(employee::employee_balance)),
                )
                .service(
                    web::resource("/{id}/balance/reset")
                        .route(web::post().to(employee::reset_balance)),
                ),
        );

    match build_limiter(config.rate_protected_per_min) {
        Some(limiter) => {
            cfg.service(scope.wrap(Governor::new(&limiter)));
        }
        None => {
            tracing::warn!("Rate limiter misconfigured, serving without it");
            cfg.service(scope);
        }
    }
}
