// src/services/dashboard_service.rs

use chrono::{DateTime, Datelike, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::dashboard::{DashboardSummary, GrowthEntry, GrowthReport, StageTotalEntry},
    models::funnel::Funnel,
    models::lead::Lead,
    storage::Collection,
};
use uuid::Uuid;

/// Agregações de leitura sobre o conjunto atual de leads. Nada aqui é
/// persistido ou cacheado: cada chamada recalcula do armazém.
#[derive(Clone)]
pub struct DashboardService {
    leads: Collection<Lead>,
    funnels: Collection<Funnel>,
}

impl DashboardService {
    pub fn new(leads: Collection<Lead>, funnels: Collection<Funnel>) -> Self {
        Self { leads, funnels }
    }

    /// Contagem e soma de preços por estágio de um funil, na ordem do
    /// pipeline. Estágio vazio soma zero.
    pub fn stage_totals(&self, funnel_id: Uuid) -> Result<Vec<StageTotalEntry>, AppError> {
        let funnel = self.funnels.get_by_id(funnel_id)?;
        let leads = self.leads.get_all()?;

        let mut stages: Vec<_> = funnel.stages.iter().collect();
        stages.sort_by_key(|s| s.order);

        Ok(stages
            .into_iter()
            .map(|stage| {
                let in_stage: Vec<&Lead> =
                    leads.iter().filter(|l| l.stage_id == stage.id).collect();
                StageTotalEntry {
                    stage_id: stage.id,
                    stage_name: stage.name.clone(),
                    lead_count: in_stage.len() as i64,
                    total: in_stage.iter().map(|l| l.product_price).sum(),
                }
            })
            .collect())
    }

    pub fn summary(&self) -> Result<DashboardSummary, AppError> {
        let leads = self.leads.get_all()?;
        let funnels = self.funnels.get_all()?;

        let total = leads.len() as i64;
        let closed: Vec<&Lead> = leads.iter().filter(|l| is_closed(l, &funnels)).collect();
        let revenue: Decimal = closed.iter().map(|l| l.product_price).sum();

        // Sem leads as taxas são zero, nunca NaN.
        let conversion_rate = if total == 0 {
            Decimal::ZERO
        } else {
            Decimal::from(closed.len() as i64) / Decimal::from(total)
        };
        let average_ticket = if closed.is_empty() {
            Decimal::ZERO
        } else {
            revenue / Decimal::from(closed.len() as i64)
        };

        Ok(DashboardSummary {
            total_leads: total,
            closed_leads: closed.len() as i64,
            revenue,
            conversion_rate,
            average_ticket,
        })
    }

    /// Crescimento mês a mês: `[início deste mês, agora)` contra
    /// `[início do mês passado, início deste mês)`.
    pub fn growth(&self, now: DateTime<Utc>) -> Result<GrowthReport, AppError> {
        let leads = self.leads.get_all()?;
        let funnels = self.funnels.get_all()?;

        let this_month = start_of_month(now);
        let last_month = start_of_previous_month(this_month);

        let created_in = |from: DateTime<Utc>, to: DateTime<Utc>| {
            leads.iter().filter(|l| l.created_at >= from && l.created_at < to).count() as i64
        };

        let closed: Vec<&Lead> = leads.iter().filter(|l| is_closed(l, &funnels)).collect();
        let closed_in = |from: DateTime<Utc>, to: DateTime<Utc>| {
            closed
                .iter()
                .filter(|l| l.closed_at() >= from && l.closed_at() < to)
                .count() as i64
        };

        Ok(GrowthReport {
            new_leads: growth_entry(
                Decimal::from(created_in(this_month, now)),
                Decimal::from(created_in(last_month, this_month)),
            ),
            sales: growth_entry(
                Decimal::from(closed_in(this_month, now)),
                Decimal::from(closed_in(last_month, this_month)),
            ),
        })
    }
}

// Um lead conta como fechado quando ocupa o estágio terminal do seu funil.
fn is_closed(lead: &Lead, funnels: &[Funnel]) -> bool {
    funnels
        .iter()
        .find(|f| f.id == lead.funnel_id)
        .and_then(|f| f.terminal_stage())
        .is_some_and(|terminal| terminal.id == lead.stage_id)
}

// Convenção normativa dos limites: +100% quando só o período atual tem
// volume, 0% quando ambos são zero.
fn growth_entry(current: Decimal, previous: Decimal) -> GrowthEntry {
    let growth = if previous.is_zero() {
        if current.is_zero() { Decimal::ZERO } else { Decimal::ONE_HUNDRED }
    } else {
        (current - previous) / previous * Decimal::ONE_HUNDRED
    };

    GrowthEntry { current, previous, growth }
}

fn start_of_month(at: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(at.year(), at.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(at)
}

fn start_of_previous_month(this_month: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = if this_month.month() == 1 {
        (this_month.year() - 1, 12)
    } else {
        (this_month.year(), this_month.month() - 1)
    };
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .unwrap_or(this_month)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::services::{FunnelService, LeadService, ProductService};
    use crate::storage::MemoryStore;

    struct Ctx {
        funnels: FunnelService,
        products: ProductService,
        leads: LeadService,
        dashboard: DashboardService,
    }

    fn ctx() -> Ctx {
        let store = Arc::new(MemoryStore::new());
        let funnels = FunnelService::new(Collection::new(store.clone()), Collection::new(store.clone()));
        let products = ProductService::new(Collection::new(store.clone()));
        let leads = LeadService::new(
            Collection::new(store.clone()),
            Collection::new(store.clone()),
            Collection::new(store.clone()),
        );
        let dashboard = DashboardService::new(Collection::new(store.clone()), Collection::new(store));
        Ctx { funnels, products, leads, dashboard }
    }

    #[test]
    fn totais_por_estagio_seguem_os_leads() {
        let ctx = ctx();
        let funnel = ctx
            .funnels
            .create("Vendas", &["Novo".to_string(), "Fechado".to_string()])
            .unwrap();
        let product = ctx
            .products
            .create("Plano Anual", Decimal::from(100), None, None)
            .unwrap();
        let ana = ctx
            .leads
            .create("Ana", None, product.id, funnel.id, Some(funnel.stages[0].id))
            .unwrap();

        let totals = ctx.dashboard.stage_totals(funnel.id).unwrap();
        assert_eq!(totals[0].total, Decimal::from(100));
        assert_eq!(totals[0].lead_count, 1);
        assert_eq!(totals[1].total, Decimal::ZERO);
        assert_eq!(totals[1].lead_count, 0);

        // Depois do fechamento os totais migram junto.
        ctx.leads
            .change_stage(ana.id, funnel.stages[1].id, "Contrato assinado")
            .unwrap();

        let totals = ctx.dashboard.stage_totals(funnel.id).unwrap();
        assert_eq!(totals[0].total, Decimal::ZERO);
        assert_eq!(totals[1].total, Decimal::from(100));

        let summary = ctx.dashboard.summary().unwrap();
        assert_eq!(summary.revenue, Decimal::from(100));
        assert_eq!(summary.closed_leads, 1);
        assert_eq!(summary.conversion_rate, Decimal::ONE);
    }

    #[test]
    fn soma_cobre_qualquer_particao_dos_leads() {
        let ctx = ctx();
        let funnel = ctx
            .funnels
            .create("Vendas", &["A".to_string(), "B".to_string(), "C".to_string()])
            .unwrap();
        let barato = ctx.products.create("Básico", Decimal::from(30), None, None).unwrap();
        let caro = ctx.products.create("Completo", Decimal::from(70), None, None).unwrap();

        for (nome, produto, estagio) in [
            ("Ana", &barato, 0usize),
            ("Bia", &caro, 0),
            ("Caio", &caro, 1),
        ] {
            ctx.leads
                .create(nome, None, produto.id, funnel.id, Some(funnel.stages[estagio].id))
                .unwrap();
        }

        let totals = ctx.dashboard.stage_totals(funnel.id).unwrap();
        assert_eq!(totals[0].total, Decimal::from(100));
        assert_eq!(totals[1].total, Decimal::from(70));
        assert_eq!(totals[2].total, Decimal::ZERO);

        // A soma dos estágios é a soma de todos os leads.
        let soma: Decimal = totals.iter().map(|t| t.total).sum();
        assert_eq!(soma, Decimal::from(170));
    }

    #[test]
    fn sem_leads_tudo_zera() {
        let ctx = ctx();
        ctx.funnels.create("Vendas", &["Novo".to_string()]).unwrap();

        let summary = ctx.dashboard.summary().unwrap();
        assert_eq!(summary.total_leads, 0);
        assert_eq!(summary.conversion_rate, Decimal::ZERO);
        assert_eq!(summary.revenue, Decimal::ZERO);
        assert_eq!(summary.average_ticket, Decimal::ZERO);
    }

    #[test]
    fn taxa_de_conversao_e_ticket_medio() {
        let ctx = ctx();
        let funnel = ctx
            .funnels
            .create("Vendas", &["Novo".to_string(), "Fechado".to_string()])
            .unwrap();
        let product = ctx.products.create("Plano", Decimal::from(100), None, None).unwrap();

        for nome in ["Ana", "Bia", "Caio", "Davi"] {
            ctx.leads
                .create(nome, None, product.id, funnel.id, None)
                .unwrap();
        }
        let fechada = ctx.leads.list(None).unwrap()[0].clone();
        ctx.leads
            .change_stage(fechada.id, funnel.stages[1].id, "Fechou")
            .unwrap();

        let summary = ctx.dashboard.summary().unwrap();
        assert_eq!(summary.total_leads, 4);
        assert_eq!(summary.closed_leads, 1);
        assert_eq!(summary.conversion_rate, Decimal::from(25) / Decimal::ONE_HUNDRED);
        assert_eq!(summary.average_ticket, Decimal::from(100));
    }

    #[test]
    fn crescimento_com_ambos_os_periodos_zerados() {
        let ctx = ctx();
        ctx.funnels.create("Vendas", &["Novo".to_string()]).unwrap();

        let now = Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).single().unwrap();
        let report = ctx.dashboard.growth(now).unwrap();

        assert_eq!(report.new_leads.growth, Decimal::ZERO);
        assert_eq!(report.sales.growth, Decimal::ZERO);
    }

    #[test]
    fn crescimento_sem_periodo_anterior_e_cem_por_cento() {
        let ctx = ctx();
        let funnel = ctx.funnels.create("Vendas", &["Novo".to_string()]).unwrap();
        let product = ctx.products.create("Plano", Decimal::from(50), None, None).unwrap();
        ctx.leads.create("Ana", None, product.id, funnel.id, None).unwrap();

        // O lead acabou de ser criado; o mês anterior não tem nada.
        let report = ctx.dashboard.growth(Utc::now()).unwrap();

        assert_eq!(report.new_leads.current, Decimal::ONE);
        assert_eq!(report.new_leads.previous, Decimal::ZERO);
        assert_eq!(report.new_leads.growth, Decimal::ONE_HUNDRED);
    }

    #[test]
    fn crescimento_compara_as_janelas_mensais() {
        let ctx = ctx();
        let funnel = ctx.funnels.create("Vendas", &["Novo".to_string()]).unwrap();
        let product = ctx.products.create("Plano", Decimal::from(50), None, None).unwrap();

        for nome in ["Ana", "Bia", "Caio"] {
            ctx.leads.create(nome, None, product.id, funnel.id, None).unwrap();
        }

        // Daqui a um mês, os três caem na janela anterior e a atual zera:
        // queda de 100%.
        let num_mes = start_of_month(Utc::now())
            .checked_add_months(chrono::Months::new(1))
            .unwrap_or_else(Utc::now);
        let report = ctx.dashboard.growth(num_mes + chrono::Duration::days(3)).unwrap();

        assert_eq!(report.new_leads.current, Decimal::ZERO);
        assert_eq!(report.new_leads.previous, Decimal::from(3));
        assert_eq!(report.new_leads.growth, Decimal::from(-100));
    }
}
