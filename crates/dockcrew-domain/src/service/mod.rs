//! Domain services

pub mod batch_registry;
pub mod task_ledger;

pub use batch_registry::BatchRegistry;
pub use task_ledger::TaskLedger;
