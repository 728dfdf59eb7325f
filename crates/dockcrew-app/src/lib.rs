//! Application service layer - config, store wiring, export

pub mod app;
pub mod config;
pub mod export;
pub mod repository;
