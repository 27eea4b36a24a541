use std::time::Duration;

use actix_cors::Cors;
use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use contact_intake::{
    background_task::{start_limiter_sweep_task, start_pattern_reload_task},
    db::postgres::create_pool,
    graceful_shutdown::shutdown_signal,
    routes::configure_routes,
    settings::AppConfig,
    AppState,
};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match AppConfig::new() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        }
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let pool = create_pool(&config.database_url)
        .await
        .expect("Failed to create database connection pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let app_state = web::Data::new(AppState::new(&config, pool));

    let server_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        "Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let app_state_clone = app_state.clone();
    let cors_origins = config.cors_origins();

    let server = HttpServer::new(move || {
        let cors = if cors_origins.iter().any(|o| o == "*") {
            Cors::default().allow_any_origin()
        } else {
            cors_origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        }
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

        App::new()
            .app_data(app_state.clone())
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .wrap(cors)
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .bind(server_addr)?
    .run();

    tokio::spawn(start_limiter_sweep_task(app_state_clone.limiter.clone()));

    if let Some(path) = config.spam_patterns_path.clone() {
        tokio::spawn(start_pattern_reload_task(
            app_state_clone.classifier.clone(),
            path,
            Duration::from_secs(config.spam_patterns_reload_secs),
        ));
    }

    tokio::select! {
        res = server => res,
        _ = shutdown_signal() => Ok(()),
    }
}
