// src/handlers/activities.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::activity::{
        Activity, ActivityFilters, ActivityStatus, ActivityType, LogEntry, LogFilters,
        RelatedRecord, UpdateActivity,
    },
};

fn default_status() -> ActivityStatus {
    ActivityStatus::Pending
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityPayload {
    #[serde(rename = "type")]
    #[schema(example = "call")]
    pub kind: ActivityType,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Ligar para a Ana")]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_status")]
    pub status: ActivityStatus,

    pub due_date: Option<DateTime<Utc>>,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Carlos")]
    pub created_by: String,

    pub related_to: Option<RelatedRecord>,
}

// POST /api/activities
#[utoipa::path(
    post,
    path = "/api/activities",
    tag = "Atividades",
    request_body = CreateActivityPayload,
    responses(
        (status = 201, description = "Atividade criada e anotada no log", body = Activity),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_activity(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateActivityPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let activity = app_state.activity_service.create_activity(
        payload.kind,
        &payload.title,
        &payload.description,
        payload.status,
        payload.due_date,
        &payload.created_by,
        payload.related_to,
    )?;

    Ok((StatusCode::CREATED, Json(activity)))
}

// GET /api/activities
#[utoipa::path(
    get,
    path = "/api/activities",
    tag = "Atividades",
    responses(
        (status = 200, description = "Atividades filtradas, mais recentes primeiro", body = Vec<Activity>)
    ),
    params(
        ("type" = Option<String>, Query, description = "call | meeting | email | task | note"),
        ("status" = Option<String>, Query, description = "pending | completed | cancelled"),
        ("startDate" = Option<String>, Query, description = "Início da janela (RFC3339)"),
        ("endDate" = Option<String>, Query, description = "Fim da janela (RFC3339)")
    )
)]
pub async fn list_activities(
    State(app_state): State<AppState>,
    Query(filters): Query<ActivityFilters>,
) -> Result<impl IntoResponse, AppError> {
    let activities = app_state.activity_service.list_activities(&filters)?;

    Ok((StatusCode::OK, Json(activities)))
}

// PUT /api/activities/{id}
#[utoipa::path(
    put,
    path = "/api/activities/{id}",
    tag = "Atividades",
    request_body = UpdateActivity,
    responses(
        (status = 200, description = "Atividade atualizada", body = Activity),
        (status = 404, description = "Atividade não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da atividade")
    )
)]
pub async fn update_activity(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateActivity>,
) -> Result<impl IntoResponse, AppError> {
    let activity = app_state.activity_service.update_activity(id, payload)?;

    Ok((StatusCode::OK, Json(activity)))
}

// DELETE /api/activities/{id}
#[utoipa::path(
    delete,
    path = "/api/activities/{id}",
    tag = "Atividades",
    responses(
        (status = 204, description = "Atividade removida"),
        (status = 404, description = "Atividade não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da atividade")
    )
)]
pub async fn delete_activity(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.activity_service.delete_activity(id)?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/logs
#[utoipa::path(
    get,
    path = "/api/logs",
    tag = "Logs",
    responses(
        (status = 200, description = "Log de auditoria, mais recentes primeiro", body = Vec<LogEntry>)
    ),
    params(
        ("module" = Option<String>, Query, description = "Filtra por módulo"),
        ("user" = Option<String>, Query, description = "Filtra por usuário"),
        ("startDate" = Option<String>, Query, description = "Início da janela (RFC3339)"),
        ("endDate" = Option<String>, Query, description = "Fim da janela (RFC3339)")
    )
)]
pub async fn list_logs(
    State(app_state): State<AppState>,
    Query(filters): Query<LogFilters>,
) -> Result<impl IntoResponse, AppError> {
    let logs = app_state.activity_service.list_logs(&filters)?;

    Ok((StatusCode::OK, Json(logs)))
}
