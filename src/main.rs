use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use gradebook_server::{
    app_state::AppState,
    auth::{AuthMiddleware, JwtService},
    config::Config,
    handlers,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        config.validate_for_production();
    }

    let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);
    let host = config.web_server_host.clone();
    let port = config.web_server_port;
    let allowed_origin = config.cors_allowed_origin.clone();

    let state = AppState::new(config)
        .await
        .expect("failed to initialize application state");

    log::info!("starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&allowed_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(jwt_service.clone()))
            .wrap(Logger::default())
            .wrap(cors)
            .service(handlers::health_check)
            .service(handlers::health_check_ready)
            .service(handlers::health_check_live)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .service(handlers::create_test)
                    .service(handlers::list_tests)
                    .service(handlers::get_test)
                    .service(handlers::update_test)
                    .service(handlers::publish_test)
                    .service(handlers::delete_test)
                    .service(handlers::class_wise_report)
                    .service(handlers::class_subject_report)
                    .service(handlers::student_report)
                    .service(handlers::date_range_report)
                    .service(handlers::performance_report)
                    .service(handlers::get_grading_scale)
                    .service(handlers::update_grading_scale),
            )
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
