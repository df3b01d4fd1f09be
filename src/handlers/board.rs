// src/handlers/board.rs

use axum::{
    Json,
    extract::{Path, State},
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
    models::board::{BoardMoveOutcome, PendingMove},
    models::lead::Lead,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReorderPayload {
    pub lead_id: Uuid,
    /// Posição de destino dentro do próprio estágio.
    #[schema(example = 0)]
    pub to_index: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestMovePayload {
    pub lead_id: Uuid,
    pub to_stage_id: Uuid,
    /// Posição de soltura no estágio destino; omitida, o lead vai
    /// para o fim da lista.
    pub to_index: Option<usize>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmMovePayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Contrato assinado")]
    pub reason: String,
}

// POST /api/board/reorder
#[utoipa::path(
    post,
    path = "/api/board/reorder",
    tag = "Quadro",
    request_body = ReorderPayload,
    responses(
        (status = 200, description = "Lead reposicionado na própria etapa, sem histórico", body = Lead),
        (status = 404, description = "Lead não encontrado")
    )
)]
pub async fn reorder(
    State(app_state): State<AppState>,
    Json(payload): Json<ReorderPayload>,
) -> Result<impl IntoResponse, AppError> {
    let lead = app_state.board_service.reorder(payload.lead_id, payload.to_index)?;

    Ok((StatusCode::OK, Json(lead)))
}

// POST /api/board/moves
#[utoipa::path(
    post,
    path = "/api/board/moves",
    tag = "Quadro",
    request_body = RequestMovePayload,
    responses(
        (status = 202, description = "Movimentação suspensa aguardando o motivo", body = PendingMove),
        (status = 400, description = "Soltura na mesma etapa (use a reordenação)")
    )
)]
pub async fn request_move(
    State(app_state): State<AppState>,
    Json(payload): Json<RequestMovePayload>,
) -> Result<impl IntoResponse, AppError> {
    let pending = app_state.board_service.request_move(
        payload.lead_id,
        payload.to_stage_id,
        payload.to_index,
    )?;

    Ok((StatusCode::ACCEPTED, Json(pending)))
}

// GET /api/board/moves
#[utoipa::path(
    get,
    path = "/api/board/moves",
    tag = "Quadro",
    responses(
        (status = 200, description = "Movimentações aguardando motivo", body = Vec<PendingMove>)
    )
)]
pub async fn list_moves(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let moves = app_state.board_service.pending_moves()?;

    Ok((StatusCode::OK, Json(moves)))
}

// POST /api/board/moves/{id}/confirm
#[utoipa::path(
    post,
    path = "/api/board/moves/{id}/confirm",
    tag = "Quadro",
    request_body = ConfirmMovePayload,
    responses(
        (status = 200, description = "Transição confirmada e persistida", body = BoardMoveOutcome),
        (status = 400, description = "Motivo em branco; a movimentação segue pendente"),
        (status = 404, description = "Movimentação pendente não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da movimentação pendente")
    )
)]
pub async fn confirm_move(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConfirmMovePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let outcome = app_state.board_service.confirm_move(id, &payload.reason)?;

    Ok((StatusCode::OK, Json(outcome)))
}

// POST /api/board/moves/{id}/cancel
#[utoipa::path(
    post,
    path = "/api/board/moves/{id}/cancel",
    tag = "Quadro",
    responses(
        (status = 204, description = "Movimentação descartada sem rastro (sempre seguro)")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da movimentação pendente")
    )
)]
pub async fn cancel_move(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.board_service.cancel_move(id)?;

    Ok(StatusCode::NO_CONTENT)
}
