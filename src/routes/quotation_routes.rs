use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::quotation_controller::QuotationController;
use crate::dto::api_response::{ApiResponse, PaginatedResponse};
use crate::dto::quotation_dto::{
    CreateQuotationRequest, MessageResponse, QuotationListParams, QuotationResponse,
    StatsResponse, UpdateStatusRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_quotation_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_quotations).post(create_quotation))
        .route("/stats", get(quotation_stats))
        .route("/:id", get(get_quotation).delete(delete_quotation))
        .route("/:id/status", put(update_status))
        .route("/:id/message", get(quotation_message))
}

async fn create_quotation(
    State(state): State<AppState>,
    Json(request): Json<CreateQuotationRequest>,
) -> Result<Json<ApiResponse<QuotationResponse>>, AppError> {
    let controller = QuotationController::new(&state);
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_quotations(
    State(state): State<AppState>,
    Query(params): Query<QuotationListParams>,
) -> Result<Json<PaginatedResponse<QuotationResponse>>, AppError> {
    let controller = QuotationController::new(&state);
    let response = controller.list(params).await?;
    Ok(Json(response))
}

async fn get_quotation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<QuotationResponse>>, AppError> {
    let controller = QuotationController::new(&state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<QuotationResponse>>, AppError> {
    let controller = QuotationController::new(&state);
    let response = controller.update_status(id, request).await?;
    Ok(Json(response))
}

async fn quotation_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    let controller = QuotationController::new(&state);
    let response = controller.message(id).await?;
    Ok(Json(response))
}

async fn delete_quotation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Uuid>>, AppError> {
    let controller = QuotationController::new(&state);
    let response = controller.delete(id).await?;
    Ok(Json(response))
}

async fn quotation_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<StatsResponse>>, AppError> {
    let controller = QuotationController::new(&state);
    let response = controller.stats().await?;
    Ok(Json(response))
}
