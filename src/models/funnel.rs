// src/models/funnel.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::storage::StoredEntity;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440001")]
    pub id: Uuid,
    #[schema(example = "Em Negociação")]
    pub name: String,
    // A posição no pipeline é este campo numérico; a posição no array
    // nunca carrega significado.
    #[schema(example = 1)]
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Funnel {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Funil de Vendas")]
    pub name: String,
    pub stages: Vec<Stage>,
}

impl Funnel {
    pub fn stage(&self, stage_id: Uuid) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == stage_id)
    }

    /// Estágio inicial: o de menor `order`.
    pub fn first_stage(&self) -> Option<&Stage> {
        self.stages.iter().min_by_key(|s| s.order)
    }

    /// Estágio terminal ("fechado"): o de maior `order`.
    pub fn terminal_stage(&self) -> Option<&Stage> {
        self.stages.iter().max_by_key(|s| s.order)
    }
}

impl StoredEntity for Funnel {
    const KEY: &'static str = "crm_funnels";

    fn id(&self) -> Uuid {
        self.id
    }

    fn not_found() -> AppError {
        AppError::FunnelNotFound
    }
}
