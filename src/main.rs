//src/main.rs

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod docs;
mod handlers;
mod models;
mod services;
mod storage;

use crate::config::AppState;

#[tokio::main]
async fn main() {
    // Inicializa o logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new().expect("Falha ao inicializar o estado da aplicação.");

    let funnel_routes = Router::new()
        .route("/"
               ,post(handlers::funnels::create_funnel)
               .get(handlers::funnels::list_funnels)
        )
        .route("/{id}"
               ,get(handlers::funnels::get_funnel)
               .delete(handlers::funnels::delete_funnel)
        )
        .route("/{id}/stages", post(handlers::funnels::add_stage))
        .route("/{id}/stages/{stage_id}", delete(handlers::funnels::remove_stage));

    let lead_routes = Router::new()
        .route("/"
               ,post(handlers::leads::create_lead)
               .get(handlers::leads::list_leads)
        )
        .route("/{id}"
               ,get(handlers::leads::get_lead)
               .put(handlers::leads::update_lead)
               .delete(handlers::leads::delete_lead)
        )
        .route("/{id}/stage", put(handlers::leads::change_stage));

    // O quadro expõe comandos explícitos; as views não mutam nada por conta
    // própria.
    let board_routes = Router::new()
        .route("/reorder", post(handlers::board::reorder))
        .route("/moves"
               ,post(handlers::board::request_move)
               .get(handlers::board::list_moves)
        )
        .route("/moves/{id}/confirm", post(handlers::board::confirm_move))
        .route("/moves/{id}/cancel", post(handlers::board::cancel_move));

    let product_routes = Router::new()
        .route("/"
               ,post(handlers::products::create_product)
               .get(handlers::products::list_products)
        )
        .route("/{id}"
               ,get(handlers::products::get_product)
               .put(handlers::products::update_product)
               .delete(handlers::products::delete_product)
        );

    let activity_routes = Router::new()
        .route("/"
               ,post(handlers::activities::create_activity)
               .get(handlers::activities::list_activities)
        )
        .route("/{id}"
               ,put(handlers::activities::update_activity)
               .delete(handlers::activities::delete_activity)
        );

    let dashboard_routes = Router::new()
        .route("/summary", get(handlers::dashboard::get_summary))
        .route("/funnels/{id}/stage-totals", get(handlers::dashboard::get_stage_totals))
        .route("/growth", get(handlers::dashboard::get_growth));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/funnels", funnel_routes)
        .nest("/api/leads", lead_routes)
        .nest("/api/board", board_routes)
        .nest("/api/products", product_routes)
        .nest("/api/activities", activity_routes)
        .route("/api/logs", get(handlers::activities::list_logs))
        .nest("/api/dashboard", dashboard_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = std::env::var("CRM_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
