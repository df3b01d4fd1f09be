// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Funis ---
        handlers::funnels::create_funnel,
        handlers::funnels::list_funnels,
        handlers::funnels::get_funnel,
        handlers::funnels::delete_funnel,
        handlers::funnels::add_stage,
        handlers::funnels::remove_stage,

        // --- Leads ---
        handlers::leads::create_lead,
        handlers::leads::list_leads,
        handlers::leads::get_lead,
        handlers::leads::update_lead,
        handlers::leads::change_stage,
        handlers::leads::delete_lead,

        // --- Quadro ---
        handlers::board::reorder,
        handlers::board::request_move,
        handlers::board::list_moves,
        handlers::board::confirm_move,
        handlers::board::cancel_move,

        // --- Produtos ---
        handlers::products::create_product,
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::update_product,
        handlers::products::delete_product,

        // --- Atividades ---
        handlers::activities::create_activity,
        handlers::activities::list_activities,
        handlers::activities::update_activity,
        handlers::activities::delete_activity,
        handlers::activities::list_logs,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
        handlers::dashboard::get_stage_totals,
        handlers::dashboard::get_growth,
    ),
    components(
        schemas(
            // --- Funis ---
            models::funnel::Funnel,
            models::funnel::Stage,
            handlers::funnels::CreateFunnelPayload,
            handlers::funnels::AddStagePayload,

            // --- Leads ---
            models::lead::Lead,
            models::lead::StageChange,
            models::lead::UpdateLead,
            handlers::leads::CreateLeadPayload,
            handlers::leads::ChangeStagePayload,

            // --- Quadro ---
            models::board::PendingMove,
            models::board::BoardMoveOutcome,
            handlers::board::ReorderPayload,
            handlers::board::RequestMovePayload,
            handlers::board::ConfirmMovePayload,

            // --- Produtos ---
            models::product::Product,
            models::product::UpdateProduct,
            handlers::products::CreateProductPayload,

            // --- Atividades ---
            models::activity::Activity,
            models::activity::ActivityType,
            models::activity::ActivityStatus,
            models::activity::RelatedKind,
            models::activity::RelatedRecord,
            models::activity::UpdateActivity,
            models::activity::LogEntry,
            handlers::activities::CreateActivityPayload,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
            models::dashboard::StageTotalEntry,
            models::dashboard::GrowthEntry,
            models::dashboard::GrowthReport,
        )
    ),
    tags(
        (name = "Funis", description = "Pipelines de venda e seus estágios"),
        (name = "Leads", description = "Clientes em potencial e o histórico de estágios"),
        (name = "Quadro", description = "Arrastar-e-soltar: reordenação e movimentações com motivo"),
        (name = "Produtos", description = "Catálogo de produtos"),
        (name = "Atividades", description = "Tarefas, reuniões e ligações"),
        (name = "Logs", description = "Trilha de auditoria do sistema"),
        (name = "Dashboard", description = "Indicadores e métricas derivadas")
    )
)]
pub struct ApiDoc;
