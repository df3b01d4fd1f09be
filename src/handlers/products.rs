// src/handlers/products.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::product::{Product, UpdateProduct},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Plano Anual")]
    pub name: String,

    #[schema(example = "99.90")]
    pub price: Decimal,

    pub description: Option<String>,

    #[schema(example = json!(["Suporte 24h", "Relatórios"]))]
    pub features: Option<Vec<String>>,
}

// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Produtos",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = Product),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state.product_service.create(
        &payload.name,
        payload.price,
        payload.description,
        payload.features,
    )?;

    Ok((StatusCode::CREATED, Json(product)))
}

// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Produtos",
    responses(
        (status = 200, description = "Catálogo de produtos", body = Vec<Product>)
    )
)]
pub async fn list_products(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state.product_service.list()?;

    Ok((StatusCode::OK, Json(products)))
}

// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Produtos",
    responses(
        (status = 200, description = "Produto encontrado", body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do produto")
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.product_service.get(id)?;

    Ok((StatusCode::OK, Json(product)))
}

// PUT /api/products/{id}
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Produtos",
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Produto atualizado (leads existentes não mudam)", body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do produto")
    )
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProduct>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.product_service.update(id, payload)?;

    Ok((StatusCode::OK, Json(product)))
}

// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Produtos",
    responses(
        (status = 204, description = "Produto removido (idempotente)")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do produto")
    )
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.product_service.delete(id)?;

    Ok(StatusCode::NO_CONTENT)
}
