// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::storage::StoredEntity;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(example = "Plano Anual")]
    pub name: String,
    #[schema(example = "99.90")]
    pub price: Decimal,
    pub description: Option<String>,
    #[schema(example = json!(["Suporte 24h", "Relatórios"]))]
    pub features: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

/// Campos mutáveis de um produto. Campos desconhecidos são rejeitados.
/// Edições aqui não se propagam para leads existentes: o lead carrega a
/// fotografia de nome/preço tirada na criação.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
}

impl StoredEntity for Product {
    const KEY: &'static str = "crm_products";

    fn id(&self) -> Uuid {
        self.id
    }

    fn not_found() -> AppError {
        AppError::ProductNotFound
    }
}
