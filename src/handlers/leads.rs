// src/handlers/leads.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::lead::{Lead, UpdateLead},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Ana Souza")]
    pub name: String,

    #[schema(example = "+55 11 91234-5678")]
    pub phone: Option<String>,

    pub product_id: Uuid,
    pub funnel_id: Uuid,

    /// Omitido, o lead entra no estágio inicial do funil.
    pub stage_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadListQuery {
    pub funnel_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStagePayload {
    pub to_stage_id: Uuid,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Contrato assinado")]
    pub reason: String,
}

// POST /api/leads
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    request_body = CreateLeadPayload,
    responses(
        (status = 201, description = "Lead criado no funil", body = Lead),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Funil ou produto inexistente")
    )
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let lead = app_state.lead_service.create(
        &payload.name,
        payload.phone.as_deref(),
        payload.product_id,
        payload.funnel_id,
        payload.stage_id,
    )?;

    Ok((StatusCode::CREATED, Json(lead)))
}

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    responses(
        (status = 200, description = "Lista de leads", body = Vec<Lead>)
    ),
    params(
        ("funnelId" = Option<Uuid>, Query, description = "Filtra pelos leads de um funil")
    )
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    Query(query): Query<LeadListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let leads = app_state.lead_service.list(query.funnel_id)?;

    Ok((StatusCode::OK, Json(leads)))
}

// GET /api/leads/{id}
#[utoipa::path(
    get,
    path = "/api/leads/{id}",
    tag = "Leads",
    responses(
        (status = 200, description = "Lead encontrado", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do lead")
    )
)]
pub async fn get_lead(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let lead = app_state.lead_service.get(id)?;

    Ok((StatusCode::OK, Json(lead)))
}

// PUT /api/leads/{id}
#[utoipa::path(
    put,
    path = "/api/leads/{id}",
    tag = "Leads",
    request_body = UpdateLead,
    responses(
        (status = 200, description = "Campos atualizados (histórico intocado)", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do lead")
    )
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLead>,
) -> Result<impl IntoResponse, AppError> {
    let lead = app_state.lead_service.update_fields(id, payload)?;

    Ok((StatusCode::OK, Json(lead)))
}

// PUT /api/leads/{id}/stage
#[utoipa::path(
    put,
    path = "/api/leads/{id}/stage",
    tag = "Leads",
    request_body = ChangeStagePayload,
    responses(
        (status = 200, description = "Transição aplicada com registro no histórico", body = Lead),
        (status = 400, description = "Motivo em branco ou estágio fora do funil")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do lead")
    )
)]
pub async fn change_stage(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChangeStagePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let lead = app_state
        .lead_service
        .change_stage(id, payload.to_stage_id, &payload.reason)?;

    Ok((StatusCode::OK, Json(lead)))
}

// DELETE /api/leads/{id}
#[utoipa::path(
    delete,
    path = "/api/leads/{id}",
    tag = "Leads",
    responses(
        (status = 204, description = "Lead removido (idempotente)")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do lead")
    )
)]
pub async fn delete_lead(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.lead_service.delete(id)?;

    Ok(StatusCode::NO_CONTENT)
}
