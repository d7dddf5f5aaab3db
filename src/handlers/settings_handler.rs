use actix_web::{get, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedOwner,
    errors::AppError,
    grading::GradingScale,
    models::dto::response::ApiResponse,
};

#[get("/settings/grading-scale")]
async fn get_grading_scale(
    state: web::Data<AppState>,
    auth: AuthenticatedOwner,
) -> Result<HttpResponse, AppError> {
    let scale = state
        .settings_service
        .get_grading_scale(auth.owner_id())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Grading scale fetched", scale)))
}

#[put("/settings/grading-scale")]
async fn update_grading_scale(
    state: web::Data<AppState>,
    request: web::Json<GradingScale>,
    auth: AuthenticatedOwner,
) -> Result<HttpResponse, AppError> {
    let scale = state
        .settings_service
        .update_grading_scale(auth.owner_id(), request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Grading scale updated", scale)))
}
