// src/models/lead.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::{AppError, validation_error};
use crate::models::funnel::Funnel;
use crate::storage::StoredEntity;

/// Registro imutável de uma passagem do lead entre estágios. Os nomes são
/// congelados no momento da mudança: renomear um estágio depois não
/// reescreve o histórico.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StageChange {
    #[schema(example = "Novo")]
    pub from_stage: String,
    #[schema(example = "Fechado")]
    pub to_stage: String,
    #[schema(example = "Contrato assinado")]
    pub reason: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    #[schema(example = "Ana Souza")]
    pub name: String,
    #[schema(example = "+55 11 91234-5678")]
    pub phone: Option<String>,
    pub product_id: Uuid,
    // Nome e preço são fotografados na criação; editar o produto depois
    // não altera leads já registrados.
    #[schema(example = "Plano Anual")]
    pub product_name: String,
    #[schema(example = "100.00")]
    pub product_price: Decimal,
    pub funnel_id: Uuid,
    pub stage_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub observation: Option<String>,
    pub stage_history: Vec<StageChange>,
}

impl Lead {
    /// Aplica uma transição de estágio: motivo obrigatório, o destino
    /// precisa pertencer ao funil do lead, e mover para o próprio estágio
    /// é um no-op silencioso (sem entrada vazia no histórico).
    ///
    /// Devolve `true` quando a transição de fato aconteceu. O histórico só
    /// cresce: nenhuma entrada existente é editada ou descartada.
    pub fn apply_stage_change(
        &mut self,
        funnel: &Funnel,
        to_stage_id: Uuid,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        if reason.trim().is_empty() {
            return Err(validation_error(
                "reason",
                "required",
                "O motivo da mudança de estágio é obrigatório.",
            ));
        }

        let to_stage = funnel.stage(to_stage_id).ok_or(AppError::StageNotFound)?;

        if to_stage_id == self.stage_id {
            return Ok(false);
        }

        let from_stage = funnel
            .stage(self.stage_id)
            .map(|s| s.name.clone())
            .unwrap_or_default();

        self.stage_history.push(StageChange {
            from_stage,
            to_stage: to_stage.name.clone(),
            reason: reason.to_string(),
            date: now,
        });
        self.stage_id = to_stage_id;

        Ok(true)
    }

    /// Momento em que o lead "fechou": a última mudança de estágio, ou a
    /// criação quando ele nasceu direto no estágio terminal.
    pub fn closed_at(&self) -> DateTime<Utc> {
        self.stage_history
            .last()
            .map(|change| change.date)
            .unwrap_or(self.created_at)
    }
}

/// Campos mutáveis de um lead fora do fluxo de estágio. Campos
/// desconhecidos são rejeitados na desserialização.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateLead {
    #[schema(example = "Ana Souza")]
    pub name: Option<String>,
    pub phone: Option<String>,
    pub observation: Option<String>,
    pub product_id: Option<Uuid>,
}

impl StoredEntity for Lead {
    const KEY: &'static str = "crm_leads";

    fn id(&self) -> Uuid {
        self.id
    }

    fn not_found() -> AppError {
        AppError::LeadNotFound
    }
}

#[cfg(test)]
mod tests {
    use crate::models::funnel::Stage;

    use super::*;

    fn funil() -> Funnel {
        Funnel {
            id: Uuid::new_v4(),
            name: "Vendas".to_string(),
            stages: vec![
                Stage { id: Uuid::new_v4(), name: "Novo".to_string(), order: 1 },
                Stage { id: Uuid::new_v4(), name: "Fechado".to_string(), order: 2 },
            ],
        }
    }

    fn lead_em(funnel: &Funnel, stage_id: Uuid) -> Lead {
        Lead {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            phone: None,
            product_id: Uuid::new_v4(),
            product_name: "Plano Anual".to_string(),
            product_price: Decimal::from(100),
            funnel_id: funnel.id,
            stage_id,
            created_at: Utc::now(),
            observation: None,
            stage_history: Vec::new(),
        }
    }

    #[test]
    fn transicao_anexa_exatamente_uma_entrada() {
        let funnel = funil();
        let mut lead = lead_em(&funnel, funnel.stages[0].id);

        let changed = lead
            .apply_stage_change(&funnel, funnel.stages[1].id, "Contrato assinado", Utc::now())
            .unwrap();

        assert!(changed);
        assert_eq!(lead.stage_id, funnel.stages[1].id);
        assert_eq!(lead.stage_history.len(), 1);
        assert_eq!(lead.stage_history[0].from_stage, "Novo");
        assert_eq!(lead.stage_history[0].to_stage, "Fechado");
        assert_eq!(lead.stage_history[0].reason, "Contrato assinado");
    }

    #[test]
    fn mover_para_o_mesmo_estagio_e_no_op() {
        let funnel = funil();
        let mut lead = lead_em(&funnel, funnel.stages[0].id);

        let changed = lead
            .apply_stage_change(&funnel, funnel.stages[0].id, "tanto faz", Utc::now())
            .unwrap();

        assert!(!changed);
        assert!(lead.stage_history.is_empty());
        assert_eq!(lead.stage_id, funnel.stages[0].id);
    }

    #[test]
    fn motivo_em_branco_e_rejeitado() {
        let funnel = funil();
        let mut lead = lead_em(&funnel, funnel.stages[0].id);

        for reason in ["", "   ", "\t\n"] {
            let result = lead.apply_stage_change(&funnel, funnel.stages[1].id, reason, Utc::now());
            assert!(matches!(result, Err(AppError::ValidationError(_))));
        }

        assert_eq!(lead.stage_id, funnel.stages[0].id);
        assert!(lead.stage_history.is_empty());
    }

    #[test]
    fn destino_fora_do_funil_e_rejeitado() {
        let funnel = funil();
        let mut lead = lead_em(&funnel, funnel.stages[0].id);

        let result = lead.apply_stage_change(&funnel, Uuid::new_v4(), "motivo", Utc::now());

        assert!(matches!(result, Err(AppError::StageNotFound)));
        assert!(lead.stage_history.is_empty());
    }

    #[test]
    fn renomear_estagio_nao_reescreve_historico() {
        let mut funnel = funil();
        let mut lead = lead_em(&funnel, funnel.stages[0].id);
        lead.apply_stage_change(&funnel, funnel.stages[1].id, "Proposta aceita", Utc::now())
            .unwrap();

        funnel.stages[1].name = "Ganho".to_string();
        lead.apply_stage_change(&funnel, funnel.stages[0].id, "Retrabalho", Utc::now())
            .unwrap();

        // A primeira entrada mantém o nome da época; a nova vê o atual.
        assert_eq!(lead.stage_history[0].to_stage, "Fechado");
        assert_eq!(lead.stage_history[1].from_stage, "Ganho");
    }

    #[test]
    fn payload_de_atualizacao_rejeita_campo_desconhecido() {
        let result = serde_json::from_str::<UpdateLead>(r#"{"name":"Ana","stageId":"abc"}"#);
        assert!(result.is_err());
    }
}
