// src/handlers/funnels.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{common::error::AppError, config::AppState, models::funnel::Funnel};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFunnelPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Vendas")]
    pub name: String,

    // A ordem do pipeline é a ordem desta lista.
    #[validate(length(min = 1, message = "min_stages"))]
    #[schema(example = json!(["Novo", "Proposta", "Fechado"]))]
    pub stages: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddStagePayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Pós-venda")]
    pub name: String,
}

// POST /api/funnels
#[utoipa::path(
    post,
    path = "/api/funnels",
    tag = "Funis",
    request_body = CreateFunnelPayload,
    responses(
        (status = 201, description = "Funil criado", body = Funnel),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_funnel(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateFunnelPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let funnel = app_state.funnel_service.create(&payload.name, &payload.stages)?;

    Ok((StatusCode::CREATED, Json(funnel)))
}

// GET /api/funnels
#[utoipa::path(
    get,
    path = "/api/funnels",
    tag = "Funis",
    responses(
        (status = 200, description = "Lista de funis", body = Vec<Funnel>)
    )
)]
pub async fn list_funnels(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let funnels = app_state.funnel_service.list()?;

    Ok((StatusCode::OK, Json(funnels)))
}

// GET /api/funnels/{id}
#[utoipa::path(
    get,
    path = "/api/funnels/{id}",
    tag = "Funis",
    responses(
        (status = 200, description = "Funil encontrado", body = Funnel),
        (status = 404, description = "Funil não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do funil")
    )
)]
pub async fn get_funnel(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let funnel = app_state.funnel_service.get(id)?;

    Ok((StatusCode::OK, Json(funnel)))
}

// DELETE /api/funnels/{id}
#[utoipa::path(
    delete,
    path = "/api/funnels/{id}",
    tag = "Funis",
    responses(
        (status = 204, description = "Funil removido"),
        (status = 409, description = "O funil ainda possui leads")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do funil")
    )
)]
pub async fn delete_funnel(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.funnel_service.delete(id)?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/funnels/{id}/stages
#[utoipa::path(
    post,
    path = "/api/funnels/{id}/stages",
    tag = "Funis",
    request_body = AddStagePayload,
    responses(
        (status = 201, description = "Estágio acrescentado ao fim do pipeline", body = Funnel),
        (status = 404, description = "Funil não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do funil")
    )
)]
pub async fn add_stage(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddStagePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let funnel = app_state.funnel_service.add_stage(id, &payload.name)?;

    Ok((StatusCode::CREATED, Json(funnel)))
}

// DELETE /api/funnels/{id}/stages/{stage_id}
#[utoipa::path(
    delete,
    path = "/api/funnels/{id}/stages/{stage_id}",
    tag = "Funis",
    responses(
        (status = 200, description = "Estágio removido", body = Funnel),
        (status = 409, description = "Último estágio ou estágio com leads")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do funil"),
        ("stage_id" = Uuid, Path, description = "ID do estágio")
    )
)]
pub async fn remove_stage(
    State(app_state): State<AppState>,
    Path((id, stage_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let funnel = app_state.funnel_service.remove_stage(id, stage_id)?;

    Ok((StatusCode::OK, Json(funnel)))
}
