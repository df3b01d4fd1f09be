// src/services/lead_service.rs

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::{AppError, validation_error},
    models::funnel::Funnel,
    models::lead::{Lead, UpdateLead},
    models::product::Product,
    storage::Collection,
};

#[derive(Clone)]
pub struct LeadService {
    leads: Collection<Lead>,
    funnels: Collection<Funnel>,
    products: Collection<Product>,
}

impl LeadService {
    pub fn new(
        leads: Collection<Lead>,
        funnels: Collection<Funnel>,
        products: Collection<Product>,
    ) -> Self {
        Self { leads, funnels, products }
    }

    /// Cria um lead no estágio informado (ou no inicial do funil), com a
    /// fotografia de nome/preço do produto tirada agora.
    pub fn create(
        &self,
        name: &str,
        phone: Option<&str>,
        product_id: Uuid,
        funnel_id: Uuid,
        stage_id: Option<Uuid>,
    ) -> Result<Lead, AppError> {
        if name.trim().is_empty() {
            return Err(validation_error("name", "required", "O nome do lead é obrigatório."));
        }

        let product = self.products.get_by_id(product_id)?;
        let funnel = self.funnels.get_by_id(funnel_id)?;

        let stage_id = match stage_id {
            Some(stage_id) => {
                if funnel.stage(stage_id).is_none() {
                    return Err(validation_error(
                        "stageId",
                        "not_in_funnel",
                        "O estágio informado não pertence ao funil.",
                    ));
                }
                stage_id
            }
            None => funnel
                .first_stage()
                .map(|s| s.id)
                .ok_or(AppError::StageNotFound)?,
        };

        let lead = Lead {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            phone: phone.map(|p| p.to_string()),
            product_id: product.id,
            product_name: product.name.clone(),
            product_price: product.price,
            funnel_id,
            stage_id,
            created_at: Utc::now(),
            observation: None,
            stage_history: Vec::new(),
        };

        self.leads.create(lead)
    }

    pub fn list(&self, funnel_id: Option<Uuid>) -> Result<Vec<Lead>, AppError> {
        let leads = self.leads.get_all()?;
        Ok(match funnel_id {
            Some(funnel_id) => leads.into_iter().filter(|l| l.funnel_id == funnel_id).collect(),
            None => leads,
        })
    }

    pub fn get(&self, lead_id: Uuid) -> Result<Lead, AppError> {
        self.leads.get_by_id(lead_id)
    }

    /// Edita campos fora do fluxo de estágio; o histórico nunca é tocado.
    /// Trocar o produto refaz a fotografia de nome/preço.
    pub fn update_fields(&self, lead_id: Uuid, update: UpdateLead) -> Result<Lead, AppError> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(validation_error("name", "required", "O nome do lead é obrigatório."));
            }
        }

        let product = match update.product_id {
            Some(product_id) => Some(self.products.get_by_id(product_id)?),
            None => None,
        };

        self.leads.update_with(lead_id, |lead| {
            if let Some(name) = update.name {
                lead.name = name.trim().to_string();
            }
            if let Some(phone) = update.phone {
                lead.phone = Some(phone);
            }
            if let Some(observation) = update.observation {
                lead.observation = Some(observation);
            }
            if let Some(product) = product {
                lead.product_id = product.id;
                lead.product_name = product.name;
                lead.product_price = product.price;
            }
        })
    }

    /// Transição direta de estágio (o quadro passa por aqui também, via
    /// `Lead::apply_stage_change`). Mesmo estágio é no-op sem escrita.
    pub fn change_stage(
        &self,
        lead_id: Uuid,
        to_stage_id: Uuid,
        reason: &str,
    ) -> Result<Lead, AppError> {
        let mut leads = self.leads.get_all()?;
        let lead = leads
            .iter_mut()
            .find(|l| l.id == lead_id)
            .ok_or(AppError::LeadNotFound)?;
        let funnel = self.funnels.get_by_id(lead.funnel_id)?;

        let changed = lead.apply_stage_change(&funnel, to_stage_id, reason, Utc::now())?;
        let updated = lead.clone();
        if changed {
            self.leads.save_all(&leads)?;
        }
        Ok(updated)
    }

    pub fn delete(&self, lead_id: Uuid) -> Result<(), AppError> {
        self.leads.delete(lead_id)
    }
}
