use std::time::Duration;

use actix_web::{get, web, HttpResponse, Responder};
use humantime::format_duration;
use serde::Serialize;

use crate::{constants::START_TIME, repositories::submission::SubmissionStore, AppState};

#[derive(Serialize)]
struct HealthCheckResponse {
    status: String,
    uptime: String,
    timestamp: String,
    start_at: String,
    database: String,
    spam_patterns: usize,
    version: String,
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now_utc = chrono::Utc::now();
    let uptime_duration = now_utc.signed_duration_since(*START_TIME);
    let human_uptime =
        format_duration(Duration::from_secs(uptime_duration.num_seconds().max(0) as u64));

    let db_status = match state.intake_handler.submission_store.check_connection().await {
        Ok(_) => "OK",
        Err(_) => "Unavailable",
    };

    HttpResponse::Ok().json(HealthCheckResponse {
        status: "healthy".to_string(),
        uptime: human_uptime.to_string(),
        timestamp: now_utc.to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        database: db_status.to_string(),
        spam_patterns: state.classifier.pattern_count(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
