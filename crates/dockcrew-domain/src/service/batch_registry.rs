//! Batch registry: labor batches and their availability

use std::sync::Arc;

use dockcrew_store::{DockStore, DockStoreExt, TenantRecords};
use dockcrew_types::{Batch, BatchId, BatchStatus, Error, Result, TenantId};

use crate::model::LaborRoster;

/// Authoritative store of labor batches for every tenant
#[derive(Clone)]
pub struct BatchRegistry {
    store: Arc<dyn DockStore>,
}

impl BatchRegistry {
    pub fn new(store: Arc<dyn DockStore>) -> Self {
        Self { store }
    }

    /// Register a new available batch
    pub fn create_batch<I, S>(&self, tenant: &TenantId, members: I) -> Result<Batch>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let batch = Batch::new(members)?;
        let created = batch.clone();
        self.store.update(tenant, move |records| {
            records.put_batch(batch);
            Ok(())
        })?;

        tracing::info!(
            tenant = %tenant,
            batch = %created.id,
            members = created.members.len(),
            "batch created"
        );
        Ok(created)
    }

    /// All batches in insertion order
    pub fn list_batches(&self, tenant: &TenantId) -> Result<Vec<Batch>> {
        Ok(self.store.snapshot(tenant)?.batches)
    }

    pub fn get_batch(&self, tenant: &TenantId, batch_id: &BatchId) -> Result<Batch> {
        self.store
            .snapshot(tenant)?
            .batch(batch_id)
            .cloned()
            .ok_or_else(|| batch_not_found(batch_id))
    }

    /// Reserve a batch. Fails with `Conflict` if it is already busy.
    pub fn mark_busy(&self, tenant: &TenantId, batch_id: &BatchId) -> Result<()> {
        self.store
            .update(tenant, |records| reserve(records, batch_id))?;
        tracing::info!(tenant = %tenant, batch = %batch_id, "batch marked busy");
        Ok(())
    }

    /// Release a batch. Already-available batches are left alone.
    ///
    /// A batch still held by an active task stays busy; complete the task instead.
    pub fn mark_available(&self, tenant: &TenantId, batch_id: &BatchId) -> Result<()> {
        let changed = self.store.update(tenant, |records| {
            if let Some(task) = records
                .tasks
                .iter()
                .find(|t| t.is_active() && &t.batch_id == batch_id)
            {
                return Err(Error::Conflict(format!(
                    "batch {} is held by active task {}",
                    batch_id, task.id
                )));
            }
            release(records, batch_id)
        })?;
        if changed {
            tracing::info!(tenant = %tenant, batch = %batch_id, "batch marked available");
        } else {
            tracing::debug!(tenant = %tenant, batch = %batch_id, "batch already available");
        }
        Ok(())
    }

    /// Permanently remove an available batch
    pub fn delete_batch(&self, tenant: &TenantId, batch_id: &BatchId) -> Result<()> {
        self.store.update(tenant, |records| {
            let batch = records
                .batch(batch_id)
                .ok_or_else(|| batch_not_found(batch_id))?;
            if batch.status == BatchStatus::Busy {
                return Err(Error::Conflict(format!(
                    "batch {} is assigned to an active task and cannot be deleted",
                    batch_id
                )));
            }
            records.remove_batch(batch_id);
            Ok(())
        })?;

        tracing::info!(tenant = %tenant, batch = %batch_id, "batch deleted");
        Ok(())
    }

    /// Free and busy labor names across all batches
    pub fn labor_roster(&self, tenant: &TenantId) -> Result<LaborRoster> {
        let records = self.store.snapshot(tenant)?;
        Ok(LaborRoster::from_batches(&records.batches))
    }
}

pub(crate) fn batch_not_found(batch_id: &BatchId) -> Error {
    Error::NotFound(format!("batch {}", batch_id))
}

/// Available -> Busy, inside an open transaction
pub(crate) fn reserve(records: &mut TenantRecords, batch_id: &BatchId) -> Result<()> {
    let batch = records
        .batch_mut(batch_id)
        .ok_or_else(|| batch_not_found(batch_id))?;
    if batch.status == BatchStatus::Busy {
        return Err(Error::Conflict(format!("batch {} is already busy", batch_id)));
    }
    batch.status = BatchStatus::Busy;
    Ok(())
}

/// Busy -> Available, inside an open transaction. Returns whether anything changed.
pub(crate) fn release(records: &mut TenantRecords, batch_id: &BatchId) -> Result<bool> {
    let batch = records
        .batch_mut(batch_id)
        .ok_or_else(|| batch_not_found(batch_id))?;
    if batch.status == BatchStatus::Available {
        return Ok(false);
    }
    batch.status = BatchStatus::Available;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockcrew_store::MemoryStore;
    use dockcrew_types::ErrorKind;
    use std::collections::HashSet;

    fn setup() -> (BatchRegistry, TenantId) {
        let store: Arc<dyn DockStore> = Arc::new(MemoryStore::new());
        (BatchRegistry::new(store), TenantId::new("dock").unwrap())
    }

    #[test]
    fn test_created_batches_are_available_and_unique() {
        let (registry, tenant) = setup();
        let mut ids = HashSet::new();
        for i in 0..20 {
            let batch = registry
                .create_batch(&tenant, [format!("Worker {}", i)])
                .unwrap();
            assert_eq!(batch.status, BatchStatus::Available);
            assert!(ids.insert(batch.id));
        }
        assert_eq!(registry.list_batches(&tenant).unwrap().len(), 20);
    }

    #[test]
    fn test_create_batch_rejects_blank_members() {
        let (registry, tenant) = setup();
        let err = registry.create_batch(&tenant, ["  ", ""]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(registry.list_batches(&tenant).unwrap().is_empty());
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let (registry, tenant) = setup();
        let b1 = registry.create_batch(&tenant, ["Alice", "Bob"]).unwrap();
        let b2 = registry.create_batch(&tenant, ["Carol", "Dan"]).unwrap();
        let b3 = registry.create_batch(&tenant, ["Eve"]).unwrap();

        let ids: Vec<_> = registry
            .list_batches(&tenant)
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![b1.id, b2.id, b3.id]);
    }

    #[test]
    fn test_mark_busy_twice_conflicts() {
        let (registry, tenant) = setup();
        let batch = registry.create_batch(&tenant, ["Alice"]).unwrap();

        registry.mark_busy(&tenant, &batch.id).unwrap();
        let err = registry.mark_busy(&tenant, &batch.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_mark_unknown_batch_not_found() {
        let (registry, tenant) = setup();
        let missing = BatchId::from("missing");
        assert_eq!(
            registry.mark_busy(&tenant, &missing).unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            registry.mark_available(&tenant, &missing).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_mark_available_is_idempotent() {
        let (registry, tenant) = setup();
        let batch = registry.create_batch(&tenant, ["Alice"]).unwrap();

        registry.mark_available(&tenant, &batch.id).unwrap();
        registry.mark_busy(&tenant, &batch.id).unwrap();
        registry.mark_available(&tenant, &batch.id).unwrap();
        registry.mark_available(&tenant, &batch.id).unwrap();

        let stored = registry.get_batch(&tenant, &batch.id).unwrap();
        assert!(stored.is_available());
    }

    #[test]
    fn test_delete_busy_batch_conflicts() {
        let (registry, tenant) = setup();
        let batch = registry.create_batch(&tenant, ["Alice"]).unwrap();
        registry.mark_busy(&tenant, &batch.id).unwrap();

        let err = registry.delete_batch(&tenant, &batch.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(registry.get_batch(&tenant, &batch.id).is_ok());

        registry.mark_available(&tenant, &batch.id).unwrap();
        registry.delete_batch(&tenant, &batch.id).unwrap();
        assert_eq!(
            registry.get_batch(&tenant, &batch.id).unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            registry.delete_batch(&tenant, &batch.id).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_tenants_do_not_see_each_other() {
        let (registry, tenant) = setup();
        let other = TenantId::new("other").unwrap();
        let batch = registry.create_batch(&tenant, ["Alice"]).unwrap();

        assert!(registry.list_batches(&other).unwrap().is_empty());
        assert_eq!(
            registry.mark_busy(&other, &batch.id).unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            registry.delete_batch(&other, &batch.id).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_labor_roster_splits_free_and_busy() {
        let (registry, tenant) = setup();
        let b1 = registry.create_batch(&tenant, ["Alice", "Bob"]).unwrap();
        registry.create_batch(&tenant, ["Carol"]).unwrap();
        registry.mark_busy(&tenant, &b1.id).unwrap();

        let roster = registry.labor_roster(&tenant).unwrap();
        assert_eq!(roster.busy, vec!["Alice", "Bob"]);
        assert_eq!(roster.free, vec!["Carol"]);
    }
}
