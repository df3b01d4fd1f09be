// src/services/funnel_service.rs

use uuid::Uuid;

use crate::{
    common::error::{AppError, validation_error},
    models::funnel::{Funnel, Stage},
    models::lead::Lead,
    storage::Collection,
};

#[derive(Clone)]
pub struct FunnelService {
    funnels: Collection<Funnel>,
    // Necessária para as regras de conflito: estágio/funil com leads não sai.
    leads: Collection<Lead>,
}

impl FunnelService {
    pub fn new(funnels: Collection<Funnel>, leads: Collection<Lead>) -> Self {
        Self { funnels, leads }
    }

    /// Semeia o funil padrão na primeira execução (chave ausente no
    /// armazém). Uma coleção esvaziada pelo usuário não é re-semeada.
    pub fn seed_default(&self) -> Result<(), AppError> {
        let stages = ["Leads", "Primeiro Contato", "Proposta", "Negociação", "Fechado"];
        let default = Funnel {
            id: Uuid::new_v4(),
            name: "Funil Padrão".to_string(),
            stages: stages
                .iter()
                .enumerate()
                .map(|(i, name)| Stage {
                    id: Uuid::new_v4(),
                    name: (*name).to_string(),
                    order: i as i32 + 1,
                })
                .collect(),
        };

        if self.funnels.seed_if_absent(&[default])? {
            tracing::info!("Funil padrão semeado no armazém");
        }
        Ok(())
    }

    pub fn create(&self, name: &str, stage_names: &[String]) -> Result<Funnel, AppError> {
        if name.trim().is_empty() {
            return Err(validation_error("name", "required", "O nome do funil é obrigatório."));
        }
        if stage_names.is_empty() {
            return Err(validation_error(
                "stages",
                "min_stages",
                "O funil precisa de pelo menos um estágio.",
            ));
        }
        if stage_names.iter().any(|s| s.trim().is_empty()) {
            return Err(validation_error(
                "stages",
                "required",
                "Nomes de estágio não podem ser vazios.",
            ));
        }

        let funnel = Funnel {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            stages: stage_names
                .iter()
                .enumerate()
                .map(|(i, stage_name)| Stage {
                    id: Uuid::new_v4(),
                    name: stage_name.trim().to_string(),
                    order: i as i32 + 1,
                })
                .collect(),
        };

        self.funnels.create(funnel)
    }

    pub fn list(&self) -> Result<Vec<Funnel>, AppError> {
        self.funnels.get_all()
    }

    pub fn get(&self, funnel_id: Uuid) -> Result<Funnel, AppError> {
        self.funnels.get_by_id(funnel_id)
    }

    /// Acrescenta um estágio ao fim do pipeline (`order` = maior + 1).
    pub fn add_stage(&self, funnel_id: Uuid, name: &str) -> Result<Funnel, AppError> {
        if name.trim().is_empty() {
            return Err(validation_error("name", "required", "O nome do estágio é obrigatório."));
        }

        self.funnels.update_with(funnel_id, |funnel| {
            let next_order = funnel.stages.iter().map(|s| s.order).max().unwrap_or(0) + 1;
            funnel.stages.push(Stage {
                id: Uuid::new_v4(),
                name: name.trim().to_string(),
                order: next_order,
            });
        })
    }

    /// Remove um estágio. Bloqueado quando é o último do funil ou quando
    /// ainda existem leads nele; nesse caso nada é gravado.
    pub fn remove_stage(&self, funnel_id: Uuid, stage_id: Uuid) -> Result<Funnel, AppError> {
        let mut funnels = self.funnels.get_all()?;
        let funnel = funnels
            .iter_mut()
            .find(|f| f.id == funnel_id)
            .ok_or(AppError::FunnelNotFound)?;

        if funnel.stage(stage_id).is_none() {
            return Err(AppError::StageNotFound);
        }
        if funnel.stages.len() == 1 {
            return Err(AppError::LastStage);
        }
        if self.leads.get_all()?.iter().any(|lead| lead.stage_id == stage_id) {
            return Err(AppError::StageInUse);
        }

        funnel.stages.retain(|s| s.id != stage_id);
        let updated = funnel.clone();
        self.funnels.save_all(&funnels)?;
        Ok(updated)
    }

    /// Exclusão é ação de gestão, nunca disparada pelo quadro. Idempotente;
    /// bloqueada enquanto houver leads no funil.
    pub fn delete(&self, funnel_id: Uuid) -> Result<(), AppError> {
        if self.leads.get_all()?.iter().any(|lead| lead.funnel_id == funnel_id) {
            return Err(AppError::FunnelInUse);
        }
        self.funnels.delete(funnel_id)
    }
}
