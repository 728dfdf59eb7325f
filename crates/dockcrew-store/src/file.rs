//! JSON file store, one document per tenant
//!
//! ```text
//! store_dir/
//! ├── <tenant>.json
//! └── <tenant>.lock
//! ```
//!
//! Updates hold an exclusive lock on the tenant's `.lock` file (so separate
//! processes sharing the directory serialize too) and are written through a
//! temporary file that is renamed over the document.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use fs2::FileExt;

use dockcrew_types::{Result, StorageError, TenantId};

use crate::{DockStore, TenantRecords};

/// File-backed store
#[derive(Debug)]
pub struct FileStore {
    store_dir: PathBuf,
    guard: Mutex<()>,
}

impl FileStore {
    /// Create or open a store directory
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir).map_err(StorageError::from)?;
        Ok(Self {
            store_dir,
            guard: Mutex::new(()),
        })
    }

    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    /// Path of a tenant's JSON document
    pub fn tenant_path(&self, tenant: &TenantId) -> PathBuf {
        self.store_dir.join(format!("{}.json", tenant))
    }

    fn local_guard(&self) -> Result<MutexGuard<'_, ()>> {
        self.guard
            .lock()
            .map_err(|e| StorageError::Poisoned(e.to_string()).into())
    }

    fn lock_tenant(&self, tenant: &TenantId) -> Result<TenantLock> {
        let lock_path = self.store_dir.join(format!("{}.lock", tenant));
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(StorageError::from)?;
        file.lock_exclusive().map_err(StorageError::from)?;
        Ok(TenantLock { file })
    }

    fn load(path: &Path) -> Result<TenantRecords> {
        if !path.exists() {
            return Ok(TenantRecords::default());
        }

        let content = fs::read_to_string(path).map_err(StorageError::from)?;
        if content.trim().is_empty() {
            return Ok(TenantRecords::default());
        }

        serde_json::from_str(&content).map_err(|e| {
            StorageError::Corrupted(format!("{}: {}", path.display(), e)).into()
        })
    }

    fn persist(path: &Path, records: &TenantRecords) -> Result<()> {
        let tmp_path = path.with_extension("json.tmp");
        let written = Self::write_temp(&tmp_path, records).and_then(|()| {
            fs::rename(&tmp_path, path).map_err(StorageError::from)?;
            Ok(())
        });
        if written.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        written
    }

    fn write_temp(tmp_path: &Path, records: &TenantRecords) -> Result<()> {
        let file = File::create(tmp_path).map_err(StorageError::from)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, records)
            .map_err(|e| StorageError::Corrupted(e.to_string()))?;
        writer.flush().map_err(StorageError::from)?;
        let file = writer
            .into_inner()
            .map_err(|e| StorageError::Io(e.into_error()))?;
        file.sync_all().map_err(StorageError::from)?;
        Ok(())
    }
}

impl DockStore for FileStore {
    fn snapshot(&self, tenant: &TenantId) -> Result<TenantRecords> {
        let _guard = self.local_guard()?;
        let _lock = self.lock_tenant(tenant)?;
        Self::load(&self.tenant_path(tenant))
    }

    fn transact(
        &self,
        tenant: &TenantId,
        apply: &mut dyn FnMut(&mut TenantRecords) -> Result<()>,
    ) -> Result<()> {
        let _guard = self.local_guard()?;
        let _lock = self.lock_tenant(tenant)?;

        let path = self.tenant_path(tenant);
        let mut records = Self::load(&path)?;
        apply(&mut records)?;
        Self::persist(&path, &records)?;

        tracing::debug!(tenant = %tenant, path = %path.display(), "store document written");
        Ok(())
    }
}

/// Exclusive lock on a tenant's lock file, released on drop
struct TenantLock {
    file: File,
}

impl Drop for TenantLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!("failed to release store lock: {}", e);
        }
    }
}
