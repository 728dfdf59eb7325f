//! Task ledger: assignment of batches to dock tasks and their completion
//!
//! Reserving a batch and recording the task happen in one store update, as do
//! finishing a task and releasing its batch, so a batch is busy exactly while
//! one active task holds it.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;

use dockcrew_store::{DockStore, DockStoreExt, TenantRecords};
use dockcrew_types::{
    BatchId, DockRange, Error, Result, Task, TaskId, TaskStatus, TenantId,
};

use crate::model::{AssignTask, BatchSelector, ExportRow};
use crate::service::batch_registry::{release, reserve};

/// Tracks tasks from assignment to completion
#[derive(Clone)]
pub struct TaskLedger {
    store: Arc<dyn DockStore>,
    dock_range: DockRange,
}

impl TaskLedger {
    pub fn new(store: Arc<dyn DockStore>, dock_range: DockRange) -> Self {
        Self { store, dock_range }
    }

    pub fn dock_range(&self) -> DockRange {
        self.dock_range
    }

    /// Reserve a batch for a vehicle and open an active task on it
    pub fn assign_task(&self, tenant: &TenantId, request: AssignTask) -> Result<Task> {
        let vehicle_id = request.vehicle_id.trim().to_string();
        if vehicle_id.is_empty() {
            return Err(Error::Validation("vehicle id must not be empty".to_string()));
        }
        let docks = self.validate_docks(&request.docks)?;

        let draft = TaskDraft {
            vehicle_id,
            docks,
            request: &request,
        };

        let task = match &request.batch {
            BatchSelector::Explicit(batch_id) => self.open_task(tenant, batch_id, &draft)?,
            BatchSelector::FirstAvailable => self.open_task_first_fit(tenant, &draft)?,
        };

        tracing::info!(
            tenant = %tenant,
            task = %task.id,
            batch = %task.batch_id,
            vehicle = %task.vehicle_id,
            docks = %task.docks_display(),
            "task assigned"
        );
        Ok(task)
    }

    /// Finish an active task and hand its batch back
    pub fn complete_task(&self, tenant: &TenantId, task_id: &TaskId) -> Result<Task> {
        let task = self.store.update(tenant, |records| {
            let task = records
                .task_mut(task_id)
                .filter(|t| t.is_active())
                .ok_or_else(|| Error::NotFound(format!("active task {}", task_id)))?;
            task.status = TaskStatus::Completed;
            task.end_time = Some(Utc::now());
            let completed = task.clone();

            if records.batch(&completed.batch_id).is_some() {
                release(records, &completed.batch_id)?;
            } else {
                tracing::warn!(
                    task = %completed.id,
                    batch = %completed.batch_id,
                    "completed task references a missing batch"
                );
            }
            Ok(completed)
        })?;

        tracing::info!(
            tenant = %tenant,
            task = %task.id,
            batch = %task.batch_id,
            "task completed"
        );
        Ok(task)
    }

    pub fn get_task(&self, tenant: &TenantId, task_id: &TaskId) -> Result<Task> {
        self.store
            .snapshot(tenant)?
            .task(task_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("task {}", task_id)))
    }

    /// Active tasks in insertion order
    pub fn list_active_tasks(&self, tenant: &TenantId) -> Result<Vec<Task>> {
        self.list_tasks_with_status(tenant, TaskStatus::Active)
    }

    /// Completed tasks in insertion order
    pub fn list_completed_tasks(&self, tenant: &TenantId) -> Result<Vec<Task>> {
        self.list_tasks_with_status(tenant, TaskStatus::Completed)
    }

    /// Active and completed tasks together, in insertion order
    pub fn list_tasks(&self, tenant: &TenantId) -> Result<Vec<Task>> {
        Ok(self.store.snapshot(tenant)?.tasks)
    }

    /// Every task, flattened with its batch's member names
    pub fn export_all(&self, tenant: &TenantId) -> Result<Vec<ExportRow>> {
        let records = self.store.snapshot(tenant)?;
        Ok(records
            .tasks
            .iter()
            .map(|task| ExportRow::from_task(task, records.batch(&task.batch_id)))
            .collect())
    }

    fn list_tasks_with_status(&self, tenant: &TenantId, status: TaskStatus) -> Result<Vec<Task>> {
        Ok(self
            .store
            .snapshot(tenant)?
            .tasks
            .into_iter()
            .filter(|t| t.status == status)
            .collect())
    }

    fn validate_docks(&self, docks: &[u32]) -> Result<BTreeSet<u32>> {
        if docks.is_empty() {
            return Err(Error::Validation("at least one dock is required".to_string()));
        }
        if let Some(bad) = docks.iter().find(|d| !self.dock_range.contains(**d)) {
            return Err(Error::Validation(format!(
                "dock {} is outside the valid range {}",
                bad, self.dock_range
            )));
        }
        Ok(docks.iter().copied().collect())
    }

    /// Try available batches in insertion order until one can be reserved.
    ///
    /// Candidates come from a snapshot, so another session may take one
    /// before we reach it; that batch is skipped. Each candidate is tried at
    /// most once.
    fn open_task_first_fit(&self, tenant: &TenantId, draft: &TaskDraft<'_>) -> Result<Task> {
        let candidates: Vec<BatchId> = self
            .store
            .snapshot(tenant)?
            .batches
            .into_iter()
            .filter(|b| b.is_available())
            .map(|b| b.id)
            .collect();

        for batch_id in &candidates {
            match self.open_task(tenant, batch_id, draft) {
                Ok(task) => return Ok(task),
                Err(Error::Conflict(_)) | Err(Error::NotFound(_)) => {
                    tracing::debug!(
                        tenant = %tenant,
                        batch = %batch_id,
                        "batch taken before reservation, trying next"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::Conflict("no available batch".to_string()))
    }

    fn open_task(&self, tenant: &TenantId, batch_id: &BatchId, draft: &TaskDraft<'_>) -> Result<Task> {
        self.store.update(tenant, |records: &mut TenantRecords| {
            reserve(records, batch_id)?;
            let task = draft.build(batch_id.clone());
            records.put_task(task.clone());
            Ok(task)
        })
    }
}

/// Validated parts of an assignment request
struct TaskDraft<'a> {
    vehicle_id: String,
    docks: BTreeSet<u32>,
    request: &'a AssignTask,
}

impl TaskDraft<'_> {
    fn build(&self, batch_id: BatchId) -> Task {
        Task {
            id: TaskId::generate(),
            vehicle_id: self.vehicle_id.clone(),
            vehicle_type: self.request.vehicle_type,
            task_type: self.request.task_type,
            docks: self.docks.clone(),
            batch_id,
            status: TaskStatus::Active,
            start_time: Utc::now(),
            end_time: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::BatchRegistry;
    use dockcrew_store::MemoryStore;
    use dockcrew_types::{BatchStatus, ErrorKind, TaskType, VehicleType};

    struct Fixture {
        registry: BatchRegistry,
        ledger: TaskLedger,
        tenant: TenantId,
    }

    fn setup() -> Fixture {
        let store: Arc<dyn DockStore> = Arc::new(MemoryStore::new());
        Fixture {
            registry: BatchRegistry::new(Arc::clone(&store)),
            ledger: TaskLedger::new(store, DockRange::default()),
            tenant: TenantId::new("dock").unwrap(),
        }
    }

    fn loading(vehicle: &str, docks: &[u32]) -> AssignTask {
        AssignTask::new(vehicle, VehicleType::Small, TaskType::Loading, docks.iter().copied())
    }

    #[test]
    fn test_assign_reserves_first_available_batch() {
        let fx = setup();
        let b1 = fx.registry.create_batch(&fx.tenant, ["Alice", "Bob"]).unwrap();
        let b2 = fx.registry.create_batch(&fx.tenant, ["Carol", "Dan"]).unwrap();

        let task = fx.ledger.assign_task(&fx.tenant, loading("V1", &[3, 4])).unwrap();
        assert_eq!(task.batch_id, b1.id);
        assert_eq!(task.status, TaskStatus::Active);
        assert!(task.end_time.is_none());

        let batches = fx.registry.list_batches(&fx.tenant).unwrap();
        assert_eq!(batches[0].status, BatchStatus::Busy);
        assert_eq!(batches[1].status, BatchStatus::Available);
        assert_eq!(batches[1].id, b2.id);
    }

    #[test]
    fn test_assign_explicit_batch() {
        let fx = setup();
        fx.registry.create_batch(&fx.tenant, ["Alice"]).unwrap();
        let b2 = fx.registry.create_batch(&fx.tenant, ["Carol"]).unwrap();

        let task = fx
            .ledger
            .assign_task(&fx.tenant, loading("V1", &[5]).with_batch(b2.id.clone()))
            .unwrap();
        assert_eq!(task.batch_id, b2.id);

        let err = fx
            .ledger
            .assign_task(&fx.tenant, loading("V2", &[6]).with_batch(b2.id.clone()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let err = fx
            .ledger
            .assign_task(&fx.tenant, loading("V3", &[6]).with_batch(BatchId::from("nope")))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_assign_without_batches_conflicts() {
        let fx = setup();
        let err = fx.ledger.assign_task(&fx.tenant, loading("V1", &[3])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_assign_validates_input() {
        let fx = setup();
        fx.registry.create_batch(&fx.tenant, ["Alice"]).unwrap();

        for request in [
            loading("   ", &[3]),
            loading("V1", &[]),
            loading("V1", &[1]),
            loading("V1", &[3, 18]),
        ] {
            let err = fx.ledger.assign_task(&fx.tenant, request).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }

        // nothing was reserved by the rejected requests
        assert!(fx.registry.list_batches(&fx.tenant).unwrap()[0].is_available());
        assert!(fx.ledger.list_active_tasks(&fx.tenant).unwrap().is_empty());
    }

    #[test]
    fn test_dock_range_is_configurable() {
        let store: Arc<dyn DockStore> = Arc::new(MemoryStore::new());
        let registry = BatchRegistry::new(Arc::clone(&store));
        let ledger = TaskLedger::new(store, DockRange::new(1, 4).unwrap());
        let tenant = TenantId::new("small-yard").unwrap();
        registry.create_batch(&tenant, ["Alice", "Bob"]).unwrap();

        assert_eq!(
            ledger.assign_task(&tenant, loading("V1", &[5])).unwrap_err().kind(),
            ErrorKind::Validation
        );
        let task = ledger.assign_task(&tenant, loading("V1", &[1, 1, 4])).unwrap();
        assert_eq!(task.docks.into_iter().collect::<Vec<_>>(), vec![1, 4]);
    }

    #[test]
    fn test_complete_releases_batch_and_keeps_fields() {
        let fx = setup();
        let batch = fx.registry.create_batch(&fx.tenant, ["Alice"]).unwrap();
        let task = fx.ledger.assign_task(&fx.tenant, loading(" V1 ", &[4, 3])).unwrap();
        assert_eq!(task.vehicle_id, "V1");

        let done = fx.ledger.complete_task(&fx.tenant, &task.id).unwrap();
        assert_eq!(done.status, TaskStatus::Completed);
        assert!(done.end_time.is_some());
        assert!(done.end_time.unwrap() >= done.start_time);
        assert_eq!(done.id, task.id);
        assert_eq!(done.vehicle_id, task.vehicle_id);
        assert_eq!(done.docks, task.docks);
        assert_eq!(done.batch_id, batch.id);
        assert_eq!(done.start_time, task.start_time);

        assert!(fx.registry.get_batch(&fx.tenant, &batch.id).unwrap().is_available());
        assert!(fx.ledger.list_active_tasks(&fx.tenant).unwrap().is_empty());
        assert_eq!(fx.ledger.list_completed_tasks(&fx.tenant).unwrap(), vec![done]);
    }

    #[test]
    fn test_complete_twice_not_found_without_change() {
        let fx = setup();
        fx.registry.create_batch(&fx.tenant, ["Alice"]).unwrap();
        let task = fx.ledger.assign_task(&fx.tenant, loading("V1", &[3])).unwrap();
        let done = fx.ledger.complete_task(&fx.tenant, &task.id).unwrap();

        // another task now holds the batch again
        let next = fx.ledger.assign_task(&fx.tenant, loading("V2", &[3])).unwrap();
        let before = fx.ledger.export_all(&fx.tenant).unwrap();

        let err = fx.ledger.complete_task(&fx.tenant, &task.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        assert_eq!(fx.ledger.export_all(&fx.tenant).unwrap(), before);
        assert_eq!(fx.ledger.get_task(&fx.tenant, &task.id).unwrap(), done);
        assert!(fx.ledger.get_task(&fx.tenant, &next.id).unwrap().is_active());
        assert!(!fx.registry.list_batches(&fx.tenant).unwrap()[0].is_available());
    }

    #[test]
    fn test_complete_unknown_task_not_found() {
        let fx = setup();
        let err = fx
            .ledger
            .complete_task(&fx.tenant, &TaskId::from("missing"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_export_rows_denormalize_batch() {
        let fx = setup();
        fx.registry.create_batch(&fx.tenant, ["Alice", "Bob"]).unwrap();
        fx.registry.create_batch(&fx.tenant, ["Carol"]).unwrap();
        let t1 = fx.ledger.assign_task(&fx.tenant, loading("V1", &[4, 3])).unwrap();
        fx.ledger
            .assign_task(
                &fx.tenant,
                AssignTask::new("V2", VehicleType::Large, TaskType::Unloading, [9]),
            )
            .unwrap();
        fx.ledger.complete_task(&fx.tenant, &t1.id).unwrap();

        let rows = fx.ledger.export_all(&fx.tenant).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].vehicle_id, "V1");
        assert_eq!(rows[0].vehicle_type, "Small");
        assert_eq!(rows[0].task_type, "Loading");
        assert_eq!(rows[0].docks, "3, 4");
        assert_eq!(rows[0].batch_members, "Alice, Bob");
        assert_eq!(rows[0].status, "completed");
        assert!(!rows[0].end_time.is_empty());

        assert_eq!(rows[1].vehicle_type, "Large");
        assert_eq!(rows[1].task_type, "Unloading");
        assert_eq!(rows[1].batch_members, "Carol");
        assert_eq!(rows[1].status, "active");
        assert!(rows[1].end_time.is_empty());
    }

    #[test]
    fn test_list_tasks_keeps_insertion_order_across_statuses() {
        let fx = setup();
        fx.registry.create_batch(&fx.tenant, ["Alice"]).unwrap();
        fx.registry.create_batch(&fx.tenant, ["Bob"]).unwrap();

        let t1 = fx.ledger.assign_task(&fx.tenant, loading("V1", &[3])).unwrap();
        let t2 = fx.ledger.assign_task(&fx.tenant, loading("V2", &[4])).unwrap();
        fx.ledger.complete_task(&fx.tenant, &t1.id).unwrap();
        let t3 = fx.ledger.assign_task(&fx.tenant, loading("V3", &[5])).unwrap();

        let tasks = fx.ledger.list_tasks(&fx.tenant).unwrap();
        let ids: Vec<_> = tasks.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, vec![t1.id, t2.id, t3.id]);
        assert_eq!(tasks[0].status, TaskStatus::Completed);
        assert_eq!(tasks[1].status, TaskStatus::Active);
    }

    #[test]
    fn test_held_batch_cannot_be_released_by_hand() {
        let fx = setup();
        let batch = fx.registry.create_batch(&fx.tenant, ["Alice"]).unwrap();
        let task = fx.ledger.assign_task(&fx.tenant, loading("V1", &[3])).unwrap();

        let err = fx.registry.mark_available(&fx.tenant, &batch.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(
            fx.registry.get_batch(&fx.tenant, &batch.id).unwrap().status,
            BatchStatus::Busy
        );

        let err = fx.ledger.assign_task(&fx.tenant, loading("V2", &[4])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        let active = fx.ledger.list_active_tasks(&fx.tenant).unwrap();
        assert_eq!(active.len(), 1);

        fx.ledger.complete_task(&fx.tenant, &task.id).unwrap();
        fx.registry.mark_available(&fx.tenant, &batch.id).unwrap();
        let next = fx.ledger.assign_task(&fx.tenant, loading("V2", &[4])).unwrap();
        assert_eq!(next.batch_id, batch.id);
    }

    #[test]
    fn test_export_after_batch_deleted() {
        let fx = setup();
        let batch = fx.registry.create_batch(&fx.tenant, ["Alice"]).unwrap();
        let task = fx.ledger.assign_task(&fx.tenant, loading("V1", &[3])).unwrap();
        fx.ledger.complete_task(&fx.tenant, &task.id).unwrap();
        fx.registry.delete_batch(&fx.tenant, &batch.id).unwrap();

        let rows = fx.ledger.export_all(&fx.tenant).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].batch_members, "");
        assert_eq!(
            fx.ledger.list_completed_tasks(&fx.tenant).unwrap()[0].batch_id,
            batch.id
        );
    }
}
