//! Store adapters for the persistence layer

use std::path::PathBuf;
use std::sync::Arc;

use dockcrew_store::{DockStore, FileStore, MemoryStore};
use dockcrew_types::Result;

use crate::config::Config;

/// Open the file store configured for this installation
pub fn open_store(config: &Config) -> Result<FileStore> {
    let store_dir = config.store_dir()?;
    FileStore::open(store_dir)
}

/// Open a file store at a custom directory
pub fn open_store_at(store_dir: PathBuf) -> Result<FileStore> {
    FileStore::open(store_dir)
}

/// Shared handle to the configured file store
pub fn shared_store(config: &Config) -> Result<Arc<dyn DockStore>> {
    Ok(Arc::new(open_store(config)?))
}

/// Shared handle to a fresh in-memory store
pub fn shared_memory_store() -> Arc<dyn DockStore> {
    Arc::new(MemoryStore::new())
}
