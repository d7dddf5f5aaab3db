use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedOwner,
    errors::AppError,
    models::dto::request::{CreateTestRequest, ListTestsQuery, UpdateTestRequest},
    models::dto::response::{ApiResponse, ClassTestDto, DeleteTestResponse, PagedData},
};

#[post("/tests")]
async fn create_test(
    state: web::Data<AppState>,
    request: web::Json<CreateTestRequest>,
    auth: AuthenticatedOwner,
) -> Result<HttpResponse, AppError> {
    let test = state
        .class_test_service
        .create_test(auth.owner_id(), request.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(
        "Test created successfully",
        ClassTestDto::from(test),
    )))
}

#[get("/tests")]
async fn list_tests(
    state: web::Data<AppState>,
    query: web::Query<ListTestsQuery>,
    auth: AuthenticatedOwner,
) -> Result<HttpResponse, AppError> {
    let (tests, total) = state
        .class_test_service
        .list_tests(auth.owner_id(), query.into_inner())
        .await?;

    let data = PagedData {
        items: tests.into_iter().map(ClassTestDto::from).collect(),
        total,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Tests fetched", data)))
}

#[get("/tests/{id}")]
async fn get_test(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedOwner,
) -> Result<HttpResponse, AppError> {
    let test = state
        .class_test_service
        .get_test(auth.owner_id(), &id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Test fetched", ClassTestDto::from(test))))
}

#[put("/tests/{id}")]
async fn update_test(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateTestRequest>,
    auth: AuthenticatedOwner,
) -> Result<HttpResponse, AppError> {
    let test = state
        .class_test_service
        .update_test(auth.owner_id(), &id, request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Test updated successfully",
        ClassTestDto::from(test),
    )))
}

#[post("/tests/{id}/publish")]
async fn publish_test(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedOwner,
) -> Result<HttpResponse, AppError> {
    let test = state
        .class_test_service
        .publish_test(auth.owner_id(), &id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Test published",
        ClassTestDto::from(test),
    )))
}

#[delete("/tests/{id}")]
async fn delete_test(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedOwner,
) -> Result<HttpResponse, AppError> {
    state
        .class_test_service
        .delete_test(auth.owner_id(), &id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Test deleted",
        DeleteTestResponse {
            message: format!("Test '{}' deleted", id),
        },
    )))
}
