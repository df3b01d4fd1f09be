pub mod funnel_service;
pub use funnel_service::FunnelService;
pub mod lead_service;
pub use lead_service::LeadService;
pub mod board_service;
pub use board_service::BoardService;
pub mod product_service;
pub use product_service::ProductService;
pub mod activity_service;
pub use activity_service::ActivityService;
pub mod dashboard_service;
pub use dashboard_service::DashboardService;
