use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::product_controller::ProductController;
use crate::dto::api_response::{ApiResponse, PaginatedResponse};
use crate::dto::product_dto::{
    CreateProductRequest, ProductListParams, ProductResponse, QuoteResponse, UpdateProductRequest,
};
use crate::models::pricing::PricingOverrides;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_product_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/quote", get(quote_product))
}

async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> Result<Json<PaginatedResponse<ProductResponse>>, AppError> {
    let controller = ProductController::new(&state);
    let response = controller.list_products(params).await?;
    Ok(Json(response))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProductResponse>>, AppError> {
    let controller = ProductController::new(&state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<Json<ApiResponse<ProductResponse>>, AppError> {
    let controller = ProductController::new(&state);
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse<ProductResponse>>, AppError> {
    let controller = ProductController::new(&state);
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProductResponse>>, AppError> {
    let controller = ProductController::new(&state);
    let response = controller.delete(id).await?;
    Ok(Json(response))
}

async fn quote_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(overrides): Query<PricingOverrides>,
) -> Result<Json<ApiResponse<QuoteResponse>>, AppError> {
    let controller = ProductController::new(&state);
    let response = controller.quote(id, overrides).await?;
    Ok(Json(response))
}
