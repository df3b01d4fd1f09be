// src/config.rs

use std::{env, path::PathBuf, sync::Arc};

use crate::{
    services::{
        ActivityService, BoardService, DashboardService, FunnelService, LeadService,
        ProductService,
    },
    storage::{Collection, JsonFileStore, KeyValueStore},
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub funnel_service: FunnelService,
    pub lead_service: LeadService,
    pub board_service: BoardService,
    pub product_service: ProductService,
    pub activity_service: ActivityService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let data_dir = env::var("CRM_DATA_DIR").unwrap_or_else(|_| "data".to_string());
        let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(PathBuf::from(&data_dir))?);

        tracing::info!("✅ Armazém de dados aberto em '{}'", data_dir);

        Self::with_store(store)
    }

    // Monta o grafo de dependências sobre um armazém qualquer (os testes
    // injetam o armazém em memória por aqui).
    pub fn with_store(store: Arc<dyn KeyValueStore>) -> anyhow::Result<Self> {
        let funnels = Collection::new(store.clone());
        let leads = Collection::new(store.clone());
        let products = Collection::new(store.clone());
        let activities = Collection::new(store.clone());
        let logs = Collection::new(store);

        let funnel_service = FunnelService::new(funnels.clone(), leads.clone());
        // Primeira execução ganha o funil padrão para o quadro já funcionar.
        funnel_service.seed_default()?;

        let lead_service = LeadService::new(leads.clone(), funnels.clone(), products.clone());
        let board_service = BoardService::new(leads.clone(), funnels.clone());
        let product_service = ProductService::new(products);
        let activity_service = ActivityService::new(activities, logs);
        let dashboard_service = DashboardService::new(leads, funnels);

        Ok(Self {
            funnel_service,
            lead_service,
            board_service,
            product_service,
            activity_service,
            dashboard_service,
        })
    }
}
