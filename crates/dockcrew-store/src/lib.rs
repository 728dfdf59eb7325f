//! Persistent store for labor batches and dock tasks
//!
//! Records are grouped per tenant. A store hands out read-only snapshots and
//! applies updates atomically: the update closure works on the tenant's
//! records and either everything it did is committed or nothing is.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use dockcrew_types::{Batch, BatchId, Error, Result, StorageError, Task, TaskId, TenantId};
use serde::{Deserialize, Serialize};

/// All batches and tasks owned by one tenant, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenantRecords {
    #[serde(default)]
    pub batches: Vec<Batch>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl TenantRecords {
    pub fn batch(&self, id: &BatchId) -> Option<&Batch> {
        self.batches.iter().find(|b| &b.id == id)
    }

    pub fn batch_mut(&mut self, id: &BatchId) -> Option<&mut Batch> {
        self.batches.iter_mut().find(|b| &b.id == id)
    }

    /// Insert a batch, replacing the stored one with the same id in place
    pub fn put_batch(&mut self, batch: Batch) {
        match self.batch_mut(&batch.id) {
            Some(existing) => *existing = batch,
            None => self.batches.push(batch),
        }
    }

    pub fn remove_batch(&mut self, id: &BatchId) -> Option<Batch> {
        let pos = self.batches.iter().position(|b| &b.id == id)?;
        Some(self.batches.remove(pos))
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn task_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| &t.id == id)
    }

    /// Insert a task, replacing the stored one with the same id in place
    pub fn put_task(&mut self, task: Task) {
        match self.task_mut(&task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
    }

    pub fn remove_task(&mut self, id: &TaskId) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| &t.id == id)?;
        Some(self.tasks.remove(pos))
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty() && self.tasks.is_empty()
    }
}

/// Backing store for tenant records
pub trait DockStore: Send + Sync {
    /// Read-only copy of a tenant's records. Unknown tenants are empty.
    fn snapshot(&self, tenant: &TenantId) -> Result<TenantRecords>;

    /// Run `apply` against the tenant's records under the store's lock.
    ///
    /// Changes are committed only if `apply` returns `Ok`. No other update of
    /// the same tenant can interleave with it.
    fn transact(
        &self,
        tenant: &TenantId,
        apply: &mut dyn FnMut(&mut TenantRecords) -> Result<()>,
    ) -> Result<()>;
}

/// Typed convenience over [`DockStore::transact`]
pub trait DockStoreExt: DockStore {
    fn update<T, F>(&self, tenant: &TenantId, f: F) -> Result<T>
    where
        F: FnOnce(&mut TenantRecords) -> Result<T>,
    {
        let mut f = Some(f);
        let mut out = None;
        self.transact(tenant, &mut |records| {
            let f = f.take().ok_or_else(|| {
                Error::Storage(StorageError::Corrupted(
                    "transaction body invoked twice".to_string(),
                ))
            })?;
            out = Some(f(records)?);
            Ok(())
        })?;
        out.ok_or_else(|| {
            Error::Storage(StorageError::Corrupted(
                "transaction committed without running".to_string(),
            ))
        })
    }
}

impl<S: DockStore + ?Sized> DockStoreExt for S {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_batch_replaces_in_place() {
        let mut records = TenantRecords::default();
        let first = Batch::new(["Alice"]).unwrap();
        let second = Batch::new(["Bob"]).unwrap();
        records.put_batch(first.clone());
        records.put_batch(second.clone());

        let mut renamed = first.clone();
        renamed.members = vec!["Alicia".to_string()];
        records.put_batch(renamed);

        assert_eq!(records.batches.len(), 2);
        assert_eq!(records.batches[0].members, vec!["Alicia"]);
        assert_eq!(records.batches[1].id, second.id);
    }

    #[test]
    fn test_remove_batch_keeps_order() {
        let mut records = TenantRecords::default();
        let a = Batch::new(["A"]).unwrap();
        let b = Batch::new(["B"]).unwrap();
        let c = Batch::new(["C"]).unwrap();
        for batch in [&a, &b, &c] {
            records.put_batch(batch.clone());
        }

        assert!(records.remove_batch(&b.id).is_some());
        assert!(records.remove_batch(&b.id).is_none());
        let ids: Vec<_> = records.batches.iter().map(|x| x.id.clone()).collect();
        assert_eq!(ids, vec![a.id, c.id]);
    }
}
