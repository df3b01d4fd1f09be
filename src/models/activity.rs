// src/models/activity.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::storage::StoredEntity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Call,
    Meeting,
    Email,
    Task,
    Note,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Pending,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RelatedKind {
    Lead,
    Client,
    Deal,
}

/// Vínculo opcional da atividade com um registro do CRM.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelatedRecord {
    #[serde(rename = "type")]
    pub kind: RelatedKind,
    pub id: Uuid,
    #[schema(example = "Ana Souza")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    #[schema(example = "Ligar para a Ana")]
    pub title: String,
    pub description: String,
    pub status: ActivityStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[schema(example = "Carlos")]
    pub created_by: String,
    pub related_to: Option<RelatedRecord>,
}

/// Campos mutáveis de uma atividade. Campos desconhecidos são rejeitados.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateActivity {
    #[serde(rename = "type")]
    pub kind: Option<ActivityType>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ActivityStatus>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Entrada do log de auditoria do sistema.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: Uuid,
    #[schema(example = "Atividade criada")]
    pub action: String,
    #[schema(example = "Nova atividade: Ligar para a Ana")]
    pub details: String,
    pub timestamp: DateTime<Utc>,
    pub user: String,
    #[schema(example = "sistema")]
    pub module: String,
    pub ip_address: Option<String>,
}

/// Filtros de listagem de atividades (janela sobre `createdAt`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFilters {
    #[serde(rename = "type")]
    pub kind: Option<ActivityType>,
    pub status: Option<ActivityStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Filtros de listagem do log de auditoria.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilters {
    pub module: Option<String>,
    pub user: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl StoredEntity for Activity {
    const KEY: &'static str = "crm_activities";

    fn id(&self) -> Uuid {
        self.id
    }

    fn not_found() -> AppError {
        AppError::ActivityNotFound
    }
}

impl StoredEntity for LogEntry {
    const KEY: &'static str = "crm_logs";

    fn id(&self) -> Uuid {
        self.id
    }

    fn not_found() -> AppError {
        AppError::LogNotFound
    }
}
