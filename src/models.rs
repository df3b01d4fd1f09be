pub mod funnel;
pub mod lead;
pub mod product;
pub mod activity;
pub mod board;
pub mod dashboard;
