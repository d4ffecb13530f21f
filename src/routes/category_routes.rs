use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::category_controller::CategoryController;
use crate::dto::api_response::ApiResponse;
use crate::dto::category_dto::{CategoryListResponse, CreateCategoryRequest, UpdateCategoryRequest};
use crate::models::category::Category;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_category_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoryListResponse>, AppError> {
    let controller = CategoryController::new(&state);
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Category>>, AppError> {
    let controller = CategoryController::new(&state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<Json<ApiResponse<Category>>, AppError> {
    let controller = CategoryController::new(&state);
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<ApiResponse<Category>>, AppError> {
    let controller = CategoryController::new(&state);
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Category>>, AppError> {
    let controller = CategoryController::new(&state);
    let response = controller.delete(id).await?;
    Ok(Json(response))
}
