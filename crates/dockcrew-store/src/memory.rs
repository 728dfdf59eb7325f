//! In-process store

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use dockcrew_types::{Result, StorageError, TenantId};

use crate::{DockStore, TenantRecords};

/// Store that keeps every tenant's records in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tenants: Mutex<HashMap<TenantId, TenantRecords>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<TenantId, TenantRecords>>> {
        self.tenants
            .lock()
            .map_err(|e| StorageError::Poisoned(e.to_string()).into())
    }

    /// Number of tenants holding any records
    pub fn tenant_count(&self) -> Result<usize> {
        Ok(self.lock()?.values().filter(|r| !r.is_empty()).count())
    }
}

impl DockStore for MemoryStore {
    fn snapshot(&self, tenant: &TenantId) -> Result<TenantRecords> {
        Ok(self.lock()?.get(tenant).cloned().unwrap_or_default())
    }

    fn transact(
        &self,
        tenant: &TenantId,
        apply: &mut dyn FnMut(&mut TenantRecords) -> Result<()>,
    ) -> Result<()> {
        let mut tenants = self.lock()?;
        let mut working = tenants.get(tenant).cloned().unwrap_or_default();
        apply(&mut working)?;
        tenants.insert(tenant.clone(), working);
        Ok(())
    }
}
