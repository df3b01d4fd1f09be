// src/services/board_service.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::{AppError, validation_error},
    models::board::{BoardMoveOutcome, PendingMove},
    models::funnel::Funnel,
    models::lead::Lead,
    storage::Collection,
};

/// Controlador do quadro: reordenação dentro da etapa e o ciclo
/// Idle -> PendingReason -> Idle das movimentações entre etapas.
///
/// Movimentos pendentes vivem só em memória. Enquanto o motivo não é
/// confirmado, o modelo de dados não muda e o lead segue visível no
/// estágio de origem; cancelar descarta tudo sem deixar rastro.
#[derive(Clone)]
pub struct BoardService {
    leads: Collection<Lead>,
    funnels: Collection<Funnel>,
    pending: Arc<Mutex<HashMap<Uuid, PendingMove>>>,
}

impl BoardService {
    pub fn new(leads: Collection<Lead>, funnels: Collection<Funnel>) -> Self {
        Self {
            leads,
            funnels,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn pending_lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, PendingMove>>, AppError> {
        self.pending
            .lock()
            .map_err(|_| AppError::InternalServerError(anyhow::anyhow!("mutex do quadro envenenado")))
    }

    /// Soltura na mesma etapa: só reposiciona, sem motivo e sem histórico.
    pub fn reorder(&self, lead_id: Uuid, to_index: usize) -> Result<Lead, AppError> {
        let mut leads = self.leads.get_all()?;
        let from_pos = leads
            .iter()
            .position(|l| l.id == lead_id)
            .ok_or(AppError::LeadNotFound)?;

        let lead = leads.remove(from_pos);
        let insert_at = Self::position_in_stage(&leads, lead.funnel_id, lead.stage_id, to_index);
        leads.insert(insert_at, lead.clone());
        self.leads.save_all(&leads)?;

        Ok(lead)
    }

    // Converte um índice dentro da etapa na posição correspondente do
    // array global de leads. Índice além do fim cai depois do último da
    // etapa (ou no fim do array, se a etapa está vazia).
    fn position_in_stage(leads: &[Lead], funnel_id: Uuid, stage_id: Uuid, to_index: usize) -> usize {
        let slots: Vec<usize> = leads
            .iter()
            .enumerate()
            .filter(|(_, l)| l.funnel_id == funnel_id && l.stage_id == stage_id)
            .map(|(i, _)| i)
            .collect();

        match slots.get(to_index) {
            Some(&pos) => pos,
            None => slots.last().map(|&pos| pos + 1).unwrap_or(leads.len()),
        }
    }

    /// Soltura em etapa diferente: captura o movimento e suspende
    /// aguardando o motivo do usuário. Nada muda no modelo de dados.
    pub fn request_move(
        &self,
        lead_id: Uuid,
        to_stage_id: Uuid,
        to_index: Option<usize>,
    ) -> Result<PendingMove, AppError> {
        let lead = self.leads.get_by_id(lead_id)?;
        let funnel = self.funnels.get_by_id(lead.funnel_id)?;
        let to_stage = funnel.stage(to_stage_id).ok_or(AppError::StageNotFound)?;

        if to_stage_id == lead.stage_id {
            return Err(validation_error(
                "toStageId",
                "same_stage",
                "O lead já está neste estágio; use a reordenação.",
            ));
        }

        let from_stage = funnel
            .stage(lead.stage_id)
            .map(|s| s.name.clone())
            .unwrap_or_default();

        let pending = PendingMove {
            id: Uuid::new_v4(),
            lead_id,
            lead_name: lead.name.clone(),
            funnel_id: funnel.id,
            from_stage_id: lead.stage_id,
            from_stage,
            to_stage_id,
            to_stage: to_stage.name.clone(),
            to_index,
            requested_at: Utc::now(),
        };

        self.pending_lock()?.insert(pending.id, pending.clone());
        Ok(pending)
    }

    /// Confirmação com motivo: aplica a transição e persiste a coleção em
    /// uma única escrita.
    ///
    /// Motivo em branco rejeita e MANTÉM o movimento pendente (rejeição
    /// não é cancelamento). Falha de escrita também mantém, e o armazém
    /// fica exatamente como estava: a mutação acontece numa cópia de
    /// trabalho que só vira estado durável se a gravação passar.
    pub fn confirm_move(&self, move_id: Uuid, reason: &str) -> Result<BoardMoveOutcome, AppError> {
        let pending = self
            .pending_lock()?
            .get(&move_id)
            .cloned()
            .ok_or(AppError::PendingMoveNotFound)?;

        let mut leads = self.leads.get_all()?;
        let from_pos = leads
            .iter()
            .position(|l| l.id == pending.lead_id)
            .ok_or(AppError::LeadNotFound)?;
        let funnel = self.funnels.get_by_id(pending.funnel_id)?;

        let changed =
            leads[from_pos].apply_stage_change(&funnel, pending.to_stage_id, reason, Utc::now())?;

        // Os nomes do prompt podem ter envelhecido; a mensagem usa o atual.
        let to_stage_name = funnel
            .stage(pending.to_stage_id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| pending.to_stage.clone());

        let lead = match pending.to_index {
            Some(to_index) if changed => {
                let lead = leads.remove(from_pos);
                let insert_at =
                    Self::position_in_stage(&leads, lead.funnel_id, lead.stage_id, to_index);
                leads.insert(insert_at, lead.clone());
                lead
            }
            _ => leads[from_pos].clone(),
        };

        self.leads.save_all(&leads)?;
        self.pending_lock()?.remove(&move_id);

        Ok(BoardMoveOutcome {
            message: format!("{} movido para {}", lead.name, to_stage_name),
            lead,
        })
    }

    /// Cancelamento: descarta o movimento pendente. Cancelar um movimento
    /// desconhecido (ou já resolvido) é seguro e silencioso, e tentativas
    /// canceladas não entram em nenhuma trilha de auditoria.
    pub fn cancel_move(&self, move_id: Uuid) -> Result<(), AppError> {
        self.pending_lock()?.remove(&move_id);
        Ok(())
    }

    pub fn pending_moves(&self) -> Result<Vec<PendingMove>, AppError> {
        Ok(self.pending_lock()?.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use rust_decimal::Decimal;

    use super::*;
    use crate::services::{FunnelService, LeadService, ProductService};
    use crate::storage::{KeyValueStore, MemoryStore};

    // Armazém que passa a recusar escritas sob demanda, simulando cota
    // estourada no meio de uma confirmação.
    struct FlakyStore {
        inner: MemoryStore,
        failing: AtomicBool,
    }

    impl FlakyStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                failing: AtomicBool::new(false),
            }
        }

        fn fail_writes(&self, fail: bool) {
            self.failing.store(fail, Ordering::SeqCst);
        }
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, AppError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(AppError::StorageError("cota de armazenamento excedida".to_string()));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), AppError> {
            self.inner.remove(key)
        }
    }

    struct Ctx {
        board: BoardService,
        leads: LeadService,
        funnels: FunnelService,
        products: ProductService,
    }

    fn ctx_with(store: Arc<dyn KeyValueStore>) -> Ctx {
        let funnels = FunnelService::new(Collection::new(store.clone()), Collection::new(store.clone()));
        let products = ProductService::new(Collection::new(store.clone()));
        let leads = LeadService::new(
            Collection::new(store.clone()),
            Collection::new(store.clone()),
            Collection::new(store.clone()),
        );
        let board = BoardService::new(Collection::new(store.clone()), Collection::new(store));
        Ctx { board, leads, funnels, products }
    }

    fn ctx() -> Ctx {
        ctx_with(Arc::new(MemoryStore::new()))
    }

    fn monta_quadro(ctx: &Ctx) -> (Funnel, Vec<Lead>) {
        let funnel = ctx
            .funnels
            .create("Vendas", &["Novo".to_string(), "Fechado".to_string()])
            .unwrap();
        let product = ctx
            .products
            .create("Plano Anual", Decimal::from(100), None, None)
            .unwrap();
        let leads = ["Ana", "Bia", "Caio"]
            .iter()
            .map(|name| {
                ctx.leads
                    .create(name, None, product.id, funnel.id, Some(funnel.stages[0].id))
                    .unwrap()
            })
            .collect();
        (funnel, leads)
    }

    fn nomes_no_estagio(ctx: &Ctx, funnel: &Funnel, stage_id: Uuid) -> Vec<String> {
        ctx.leads
            .list(Some(funnel.id))
            .unwrap()
            .into_iter()
            .filter(|l| l.stage_id == stage_id)
            .map(|l| l.name)
            .collect()
    }

    #[test]
    fn reordenacao_muda_posicao_sem_historico() {
        let ctx = ctx();
        let (funnel, leads) = monta_quadro(&ctx);

        // Caio sai do fim e entra na frente.
        ctx.board.reorder(leads[2].id, 0).unwrap();

        assert_eq!(nomes_no_estagio(&ctx, &funnel, funnel.stages[0].id), ["Caio", "Ana", "Bia"]);
        for lead in ctx.leads.list(None).unwrap() {
            assert!(lead.stage_history.is_empty());
        }
    }

    #[test]
    fn reordenacao_com_indice_alem_do_fim_vai_para_o_fim() {
        let ctx = ctx();
        let (funnel, leads) = monta_quadro(&ctx);

        ctx.board.reorder(leads[0].id, 99).unwrap();

        assert_eq!(nomes_no_estagio(&ctx, &funnel, funnel.stages[0].id), ["Bia", "Caio", "Ana"]);
    }

    #[test]
    fn movimento_pendente_nao_muda_o_modelo() {
        let ctx = ctx();
        let (funnel, leads) = monta_quadro(&ctx);

        let pending = ctx
            .board
            .request_move(leads[0].id, funnel.stages[1].id, None)
            .unwrap();

        assert_eq!(pending.from_stage, "Novo");
        assert_eq!(pending.to_stage, "Fechado");

        // O lead segue no estágio de origem até a confirmação.
        let lead = ctx.leads.get(leads[0].id).unwrap();
        assert_eq!(lead.stage_id, funnel.stages[0].id);
        assert!(lead.stage_history.is_empty());
    }

    #[test]
    fn mesma_etapa_nao_e_movimento() {
        let ctx = ctx();
        let (funnel, leads) = monta_quadro(&ctx);

        let result = ctx.board.request_move(leads[0].id, funnel.stages[0].id, None);
        assert!(matches!(result, Err(AppError::ValidationError(_))));
        assert!(ctx.board.pending_moves().unwrap().is_empty());
    }

    #[test]
    fn confirmacao_aplica_persiste_e_avisa() {
        let ctx = ctx();
        let (funnel, leads) = monta_quadro(&ctx);

        let pending = ctx
            .board
            .request_move(leads[0].id, funnel.stages[1].id, None)
            .unwrap();
        let outcome = ctx.board.confirm_move(pending.id, "Contrato assinado").unwrap();

        assert_eq!(outcome.message, "Ana movido para Fechado");
        assert_eq!(outcome.lead.stage_id, funnel.stages[1].id);
        assert_eq!(outcome.lead.stage_history.len(), 1);
        assert_eq!(outcome.lead.stage_history[0].reason, "Contrato assinado");

        assert_eq!(nomes_no_estagio(&ctx, &funnel, funnel.stages[1].id), ["Ana"]);
        assert!(ctx.board.pending_moves().unwrap().is_empty());
    }

    #[test]
    fn confirmacao_honra_a_posicao_de_soltura() {
        let ctx = ctx();
        let (funnel, leads) = monta_quadro(&ctx);

        // Bia e Caio já fechados; Ana é solta entre os dois.
        for lead in [&leads[1], &leads[2]] {
            let pending = ctx
                .board
                .request_move(lead.id, funnel.stages[1].id, None)
                .unwrap();
            ctx.board.confirm_move(pending.id, "Fechou").unwrap();
        }
        let pending = ctx
            .board
            .request_move(leads[0].id, funnel.stages[1].id, Some(1))
            .unwrap();
        ctx.board.confirm_move(pending.id, "Fechou").unwrap();

        assert_eq!(nomes_no_estagio(&ctx, &funnel, funnel.stages[1].id), ["Bia", "Ana", "Caio"]);
    }

    #[test]
    fn motivo_em_branco_mantem_o_movimento_pendente() {
        let ctx = ctx();
        let (funnel, leads) = monta_quadro(&ctx);

        let pending = ctx
            .board
            .request_move(leads[0].id, funnel.stages[1].id, None)
            .unwrap();

        let result = ctx.board.confirm_move(pending.id, "  ");
        assert!(matches!(result, Err(AppError::ValidationError(_))));

        // Nada mudou, e o movimento continua aguardando motivo.
        let lead = ctx.leads.get(leads[0].id).unwrap();
        assert_eq!(lead.stage_id, funnel.stages[0].id);
        assert!(lead.stage_history.is_empty());
        assert_eq!(ctx.board.pending_moves().unwrap().len(), 1);

        // Com motivo válido a mesma pendência confirma normalmente.
        ctx.board.confirm_move(pending.id, "Contrato assinado").unwrap();
        assert!(ctx.board.pending_moves().unwrap().is_empty());
    }

    #[test]
    fn cancelamento_nao_deixa_rastro() {
        let ctx = ctx();
        let (funnel, leads) = monta_quadro(&ctx);

        let pending = ctx
            .board
            .request_move(leads[0].id, funnel.stages[1].id, None)
            .unwrap();
        ctx.board.cancel_move(pending.id).unwrap();

        let lead = ctx.leads.get(leads[0].id).unwrap();
        assert_eq!(lead.stage_id, funnel.stages[0].id);
        assert!(lead.stage_history.is_empty());
        assert!(ctx.board.pending_moves().unwrap().is_empty());

        // Confirmar depois de cancelar é NotFound; cancelar de novo, no-op.
        assert!(matches!(
            ctx.board.confirm_move(pending.id, "motivo"),
            Err(AppError::PendingMoveNotFound)
        ));
        ctx.board.cancel_move(pending.id).unwrap();
    }

    #[test]
    fn falha_de_escrita_desfaz_a_confirmacao() {
        let store = Arc::new(FlakyStore::new());
        let ctx = ctx_with(store.clone());
        let (funnel, leads) = monta_quadro(&ctx);

        let pending = ctx
            .board
            .request_move(leads[0].id, funnel.stages[1].id, None)
            .unwrap();

        store.fail_writes(true);
        let result = ctx.board.confirm_move(pending.id, "Contrato assinado");
        assert!(matches!(result, Err(AppError::StorageError(_))));

        // O armazém ficou como estava e a pendência sobreviveu para a
        // nova tentativa.
        store.fail_writes(false);
        let lead = ctx.leads.get(leads[0].id).unwrap();
        assert_eq!(lead.stage_id, funnel.stages[0].id);
        assert!(lead.stage_history.is_empty());
        assert_eq!(ctx.board.pending_moves().unwrap().len(), 1);

        let outcome = ctx.board.confirm_move(pending.id, "Contrato assinado").unwrap();
        assert_eq!(outcome.lead.stage_id, funnel.stages[1].id);
    }
}
