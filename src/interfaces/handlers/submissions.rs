use actix_web::{web, HttpRequest, HttpResponse};

use crate::{
    entities::submission::{SubmissionRequest, SubmissionResponse},
    errors::AppError,
    utils::get_client_ip::get_client_ip,
    AppState,
};

/// Public contact-form intake. Keyed on the caller's IP so one visitor
/// cannot exhaust the quota for everyone.
pub async fn create_submission(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Json<SubmissionRequest>,
) -> Result<HttpResponse, AppError> {
    let identity = get_client_ip(&req, state.trust_x_forwarded_for);

    let receipt = state.intake_handler.submit(&identity, form.into_inner()).await?;

    Ok(HttpResponse::Ok()
        .insert_header(("X-RateLimit-Limit", receipt.quota.limit.to_string()))
        .insert_header(("X-RateLimit-Remaining", receipt.quota.remaining.to_string()))
        .insert_header(("X-RateLimit-Reset", receipt.quota.reset_at.timestamp_millis().to_string()))
        .json(SubmissionResponse {
            message: "Message sent successfully".to_string(),
            submission_id: receipt.submission_id,
        }))
}

pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(serde_json::json!({
        "message": "Method not allowed"
    }))
}

pub async fn list_submissions(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = state.intake_handler.list_submissions(&path).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn get_submission(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let submission = state.intake_handler.get_submission(&path).await?;
    Ok(HttpResponse::Ok().json(submission))
}

pub async fn mark_submission_read(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.intake_handler.mark_submission_read(&path).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Submission marked as read"
    })))
}

pub async fn delete_submission(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.intake_handler.delete_submission(&path).await?;
    Ok(HttpResponse::NoContent().finish())
}
