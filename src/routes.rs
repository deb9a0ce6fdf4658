use crate::{
    api::{attendance, employee, statistics},
    config::Config,
};
use actix_governor::{
    governor::middleware::NoOpMiddleware, Governor, GovernorConfigBuilder, PeerIpKeyExtractor,
};
use actix_web::web;

fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        60_000 / requests_per_min as u64
    };
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap();
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let api = web::scope(&config.api_prefix)
        .service(
            web::scope("/employees")
                .service(
                    web::resource("")
                        .route(web::post().to(employee::create_employee))
                        .route(web::get().to(employee::list_employees)),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::put().to(employee::update_employee))
                        .route(web::delete().to(employee::delete_employee)),
                ),
        )
        .service(
            web::scope("/attendance")
                // Literal segments before the {employee_id} catch-all.
                .service(
                    web::resource("/statistics").route(web::get().to(statistics::get_statistics)),
                )
                .service(
                    web::resource("/summary").route(web::get().to(attendance::attendance_summary)),
                )
                .service(
                    web::resource("")
                        .route(web::post().to(attendance::mark_attendance))
                        .route(web::get().to(attendance::list_attendance_by_date)),
                )
                .service(
                    web::resource("/{employee_id}")
                        .route(web::get().to(attendance::attendance_by_employee)),
                ),
        );

    // Rate limit of 0 disables the limiter (used by the test harness, which
    // has no peer address to key on).
    if config.rate_api_per_min > 0 {
        cfg.service(api.wrap(build_limiter(config.rate_api_per_min)));
    } else {
        cfg.service(api);
    }
}
