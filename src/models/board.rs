// src/models/board.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::lead::Lead;

/// Uma movimentação entre estágios aguardando o motivo do usuário.
///
/// Vive só em memória: enquanto pendente, o lead continua no estágio de
/// origem e nada foi gravado. Cancelar descarta sem deixar rastro.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingMove {
    pub id: Uuid,
    pub lead_id: Uuid,
    #[schema(example = "Ana Souza")]
    pub lead_name: String,
    pub funnel_id: Uuid,
    pub from_stage_id: Uuid,
    #[schema(example = "Novo")]
    pub from_stage: String,
    pub to_stage_id: Uuid,
    #[schema(example = "Fechado")]
    pub to_stage: String,
    /// Posição de soltura dentro do estágio destino, quando o arrasto
    /// indicou uma; sem ela o lead vai para o fim da lista.
    pub to_index: Option<usize>,
    pub requested_at: DateTime<Utc>,
}

/// Resultado de uma movimentação confirmada: o lead atualizado e a
/// mensagem de confirmação exibida ao usuário.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardMoveOutcome {
    pub lead: Lead,
    #[schema(example = "Ana Souza movido para Fechado")]
    pub message: String,
}
