// src/handlers/dashboard.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::dashboard::{DashboardSummary, GrowthReport, StageTotalEntry},
};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Indicadores gerais calculados sob demanda", body = DashboardSummary)
    )
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.dashboard_service.summary()?;

    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/dashboard/funnels/{id}/stage-totals
#[utoipa::path(
    get,
    path = "/api/dashboard/funnels/{id}/stage-totals",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Contagem e soma de preços por estágio", body = Vec<StageTotalEntry>),
        (status = 404, description = "Funil não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do funil")
    )
)]
pub async fn get_stage_totals(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let totals = app_state.dashboard_service.stage_totals(id)?;

    Ok((StatusCode::OK, Json(totals)))
}

// GET /api/dashboard/growth
#[utoipa::path(
    get,
    path = "/api/dashboard/growth",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Crescimento mês a mês de novos leads e fechamentos", body = GrowthReport)
    )
)]
pub async fn get_growth(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.dashboard_service.growth(Utc::now())?;

    Ok((StatusCode::OK, Json(report)))
}
