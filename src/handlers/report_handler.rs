use actix_web::{get, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedOwner,
    errors::AppError,
    models::dto::request::DateRangeQuery,
    models::dto::response::ApiResponse,
};

#[get("/reports/class/{class_id}")]
async fn class_wise_report(
    state: web::Data<AppState>,
    class_id: web::Path<String>,
    auth: AuthenticatedOwner,
) -> Result<HttpResponse, AppError> {
    let report = state
        .report_service
        .class_wise(auth.owner_id(), &class_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Class-wise report generated", report)))
}

#[get("/reports/class/{class_id}/subject/{subject_name}")]
async fn class_subject_report(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    auth: AuthenticatedOwner,
) -> Result<HttpResponse, AppError> {
    let (class_id, subject_name) = path.into_inner();
    let report = state
        .report_service
        .class_subject(auth.owner_id(), &class_id, &subject_name)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Class subject report generated", report)))
}

#[get("/reports/student/{student_id}")]
async fn student_report(
    state: web::Data<AppState>,
    student_id: web::Path<String>,
    auth: AuthenticatedOwner,
) -> Result<HttpResponse, AppError> {
    let report = state
        .report_service
        .student_subject(auth.owner_id(), &student_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Student report generated", report)))
}

#[get("/reports/date-range")]
async fn date_range_report(
    state: web::Data<AppState>,
    query: web::Query<DateRangeQuery>,
    auth: AuthenticatedOwner,
) -> Result<HttpResponse, AppError> {
    let report = state
        .report_service
        .date_range(auth.owner_id(), query.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Date range report generated", report)))
}

#[get("/reports/performance/{class_id}")]
async fn performance_report(
    state: web::Data<AppState>,
    class_id: web::Path<String>,
    auth: AuthenticatedOwner,
) -> Result<HttpResponse, AppError> {
    let report = state
        .report_service
        .performance(auth.owner_id(), &class_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Performance report generated", report)))
}
