pub mod funnels;
pub mod leads;
pub mod board;
pub mod products;
pub mod activities;
pub mod dashboard;
