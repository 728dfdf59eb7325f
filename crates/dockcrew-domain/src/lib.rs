//! Domain models and services for dock labor assignment

pub mod model;
pub mod service;

pub use model::{AssignTask, BatchSelector, ExportRow, LaborRoster};
pub use service::{BatchRegistry, TaskLedger};
