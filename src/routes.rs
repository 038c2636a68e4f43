use crate::{
    api::{attendance, dashboard, employee, shift},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

fn build_limiter(requests_per_min: u32) -> Option<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        60_000 / requests_per_min as u64
    };
    GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms.max(1))
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .map(|cfg| Governor::new(&cfg))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let Some(limiter) = build_limiter(config.rate_api_per_min) else {
        tracing::error!(
            rate = config.rate_api_per_min,
            "Invalid rate limit, API routes not mounted"
        );
        return;
    };

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(limiter)
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(web::resource("").route(web::get().to(attendance::list_records)))
                    // /attendance/batch
                    .service(web::resource("/batch").route(web::post().to(attendance::batch_save)))
                    // /attendance/export
                    .service(
                        web::resource("/export").route(web::get().to(attendance::export_records)),
                    )
                    // /attendance/{log_id}
                    .service(
                        web::resource("/{log_id}")
                            .route(web::put().to(attendance::update_record))
                            .route(web::delete().to(attendance::delete_record)),
                    ),
            )
            .service(
                web::scope("/dashboard")
                    .service(web::resource("/stats").route(web::get().to(dashboard::dashboard_stats)))
                    .service(
                        web::resource("/monthly").route(web::get().to(dashboard::monthly_attendance)),
                    )
                    .service(
                        web::resource("/employee-summary")
                            .route(web::get().to(dashboard::employee_summary)),
                    )
                    .service(
                        web::resource("/break-abuse").route(web::get().to(dashboard::break_abuse)),
                    ),
            )
            .service(web::resource("/employees").route(web::get().to(employee::list_employees)))
            .service(
                web::resource("/shifts")
                    .route(web::get().to(shift::list_shifts))
                    .route(web::post().to(shift::save_shift)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test as actix_test};

    fn test_config() -> Config {
        Config {
            database_url: "mysql://unused".to_string(),
            server_addr: "127.0.0.1:0".to_string(),
            api_prefix: "/api".to_string(),
            log_dir: "logs".to_string(),
            rate_api_per_min: 600,
            json_limit_bytes: 1024,
            employee_cache_capacity: 16,
        }
    }

    #[test]
    fn test_build_limiter_accepts_zero_and_high_rates() {
        assert!(build_limiter(0).is_some());
        assert!(build_limiter(120_000).is_some());
    }

    #[actix_web::test]
    async fn test_delete_is_disabled() {
        let config = test_config();
        let app = actix_test::init_service(App::new().configure(|cfg| configure(cfg, &config))).await;

        let req = actix_test::TestRequest::delete()
            .uri("/api/attendance/12")
            .peer_addr("127.0.0.1:4000".parse().unwrap())
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Record deletion is currently disabled.");
    }

    #[actix_web::test]
    async fn test_unknown_route_is_not_found() {
        let config = test_config();
        let app = actix_test::init_service(App::new().configure(|cfg| configure(cfg, &config))).await;

        let req = actix_test::TestRequest::get()
            .uri("/api/payroll")
            .peer_addr("127.0.0.1:4000".parse().unwrap())
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
