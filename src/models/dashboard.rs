// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

// 1. Resumo geral (Os Cards do Topo)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_leads: i64,
    // Leads no estágio terminal do seu funil
    pub closed_leads: i64,
    pub revenue: Decimal,
    /// Fração 0..1; `0` quando não há leads (nunca NaN).
    pub conversion_rate: Decimal,
    /// Receita média por lead fechado; `0` sem fechamentos.
    pub average_ticket: Decimal,
}

// 2. Totais por estágio de um funil
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StageTotalEntry {
    pub stage_id: Uuid,
    #[schema(example = "Proposta")]
    pub stage_name: String,
    pub lead_count: i64,
    #[schema(example = "350.00")]
    pub total: Decimal,
}

// 3. Crescimento mês a mês
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrowthEntry {
    pub current: Decimal,
    pub previous: Decimal,
    /// Percentual: +100 quando só o período atual tem volume, 0 quando
    /// ambos os períodos são zero.
    pub growth: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrowthReport {
    pub new_leads: GrowthEntry,
    pub sales: GrowthEntry,
}
