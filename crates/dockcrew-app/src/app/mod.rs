//! Application use cases

pub mod dock_service;

pub use dock_service::{DockService, ExportFormat, ShiftSummary};
