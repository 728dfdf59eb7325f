//! Dock Service - application root for batch and task operations
//!
//! Builds the batch registry and task ledger over one shared store and adds
//! the shift-level operations that span both: import, summary, reset, export.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use dockcrew_domain::{BatchRegistry, TaskLedger};
use dockcrew_infra::task_log_csv::export_to_csv;
use dockcrew_store::{DockStore, DockStoreExt, TenantRecords};
use dockcrew_types::{Batch, DockRange, Error, Result, TenantId};

use crate::config::Config;
use crate::export::export_to_excel;
use crate::repository::{shared_memory_store, shared_store};

/// File format for the task log, chosen from the output path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(ExportFormat::Csv),
            Some("xlsx") => Ok(ExportFormat::Xlsx),
            _ => Err(Error::Validation(format!(
                "unsupported export file (use .csv or .xlsx): {}",
                path.display()
            ))),
        }
    }
}

/// Counts of a tenant's current shift
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShiftSummary {
    pub total_batches: usize,
    pub available_batches: usize,
    pub busy_batches: usize,
    pub active_tasks: usize,
    pub completed_tasks: usize,
}

impl ShiftSummary {
    fn from_records(records: &TenantRecords) -> Self {
        let available_batches = records.batches.iter().filter(|b| b.is_available()).count();
        let active_tasks = records.tasks.iter().filter(|t| t.is_active()).count();
        Self {
            total_batches: records.batches.len(),
            available_batches,
            busy_batches: records.batches.len() - available_batches,
            active_tasks,
            completed_tasks: records.tasks.len() - active_tasks,
        }
    }
}

/// Batch registry and task ledger sharing one store
#[derive(Clone)]
pub struct DockService {
    store: Arc<dyn DockStore>,
    registry: BatchRegistry,
    ledger: TaskLedger,
}

impl DockService {
    pub fn new(store: Arc<dyn DockStore>, dock_range: DockRange) -> Self {
        Self {
            registry: BatchRegistry::new(Arc::clone(&store)),
            ledger: TaskLedger::new(Arc::clone(&store), dock_range),
            store,
        }
    }

    /// Service over the configured file store
    pub fn open(config: &Config) -> Result<Self> {
        Ok(Self::new(shared_store(config)?, config.dock_range()?))
    }

    /// Service over a fresh in-memory store
    pub fn in_memory(dock_range: DockRange) -> Self {
        Self::new(shared_memory_store(), dock_range)
    }

    pub fn registry(&self) -> &BatchRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &TaskLedger {
        &self.ledger
    }

    /// Create one batch per member list
    pub fn import_rosters(&self, tenant: &TenantId, rosters: &[Vec<String>]) -> Result<Vec<Batch>> {
        rosters
            .iter()
            .map(|members| self.registry.create_batch(tenant, members))
            .collect()
    }

    pub fn summary(&self, tenant: &TenantId) -> Result<ShiftSummary> {
        Ok(ShiftSummary::from_records(&self.store.snapshot(tenant)?))
    }

    /// Drop every batch and task of a tenant. Returns what was cleared.
    pub fn reset_shift(&self, tenant: &TenantId) -> Result<ShiftSummary> {
        let cleared = self.store.update(tenant, |records| {
            let summary = ShiftSummary::from_records(records);
            *records = TenantRecords::default();
            Ok(summary)
        })?;

        tracing::info!(
            tenant = %tenant,
            batches = cleared.total_batches,
            tasks = cleared.active_tasks + cleared.completed_tasks,
            "shift reset"
        );
        Ok(cleared)
    }

    /// Write the task log to `output_path` (.csv or .xlsx). Returns the row count.
    pub fn export(&self, tenant: &TenantId, output_path: &Path) -> Result<usize> {
        let format = ExportFormat::from_path(output_path)?;
        let rows = self.ledger.export_all(tenant)?;

        match format {
            ExportFormat::Csv => export_to_csv(&rows, output_path)?,
            ExportFormat::Xlsx => {
                let summary = self.summary(tenant)?;
                export_to_excel(tenant, &summary, &rows, output_path)?
            }
        }
        Ok(rows.len())
    }
}
