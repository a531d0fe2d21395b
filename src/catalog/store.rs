//! # Record Store
//!
//! Backing storage for the catalog. The whole collection is loaded once and
//! rewritten in full on every mutation; there is no incremental patching.
//!
//! `JsonFileStore` keeps the collection as one JSON document on disk.
//! Writes go to a sibling temp file which is fsynced and then renamed over
//! the store, so a crash leaves either the old or the new document.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info, warn};

use super::errors::{CatalogError, CatalogResult};
use super::record::Collection;

/// Where the collection lives between restarts
pub trait RecordStore: Send + Sync {
    /// Read the full collection
    fn load(&self) -> CatalogResult<Collection>;

    /// Replace the stored collection
    fn save(&self, collection: &Collection) -> CatalogResult<()>;
}

/// Flat JSON file store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    temp_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut temp_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "store.json".into());
        temp_name.push(".tmp");
        let temp_path = path.with_file_name(temp_name);

        Self { path, temp_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for JsonFileStore {
    /// A missing file is an empty collection.
    fn load(&self) -> CatalogResult<Collection> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "store file absent, starting empty");
                return Ok(Collection::default());
            }
            Err(e) => {
                return Err(CatalogError::store(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let mut collection: Collection = serde_json::from_str(&content).map_err(|e| {
            CatalogError::store(format!(
                "failed to parse {}: {}",
                self.path.display(),
                e
            ))
        })?;

        if !collection.is_consistent() {
            warn!(
                stored = collection.total_pokemons,
                actual = collection.len(),
                "totalPokemons disagrees with record count, re-deriving"
            );
            collection.recount();
        }

        debug!(path = %self.path.display(), records = collection.len(), "store loaded");
        Ok(collection)
    }

    fn save(&self, collection: &Collection) -> CatalogResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                CatalogError::store(format!("failed to create store directory: {}", e))
            })?;
        }

        let content = serde_json::to_string(collection)
            .map_err(|e| CatalogError::store(format!("failed to serialize store: {}", e)))?;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.temp_path)
            .map_err(|e| CatalogError::store(format!("failed to create temp store file: {}", e)))?;

        file.write_all(content.as_bytes())
            .map_err(|e| CatalogError::store(format!("failed to write store: {}", e)))?;
        file.sync_all()
            .map_err(|e| CatalogError::store(format!("failed to fsync store: {}", e)))?;

        fs::rename(&self.temp_path, &self.path)
            .map_err(|e| CatalogError::store(format!("failed to commit store: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }

        debug!(path = %self.path.display(), records = collection.len(), "store saved");
        Ok(())
    }
}

/// In-memory store for tests and throwaway instances
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<Collection>,
}

impl MemoryStore {
    pub fn new(collection: Collection) -> Self {
        Self {
            data: Mutex::new(collection),
        }
    }

    /// What a fresh `load` would return right now
    pub fn snapshot(&self) -> CatalogResult<Collection> {
        self.load()
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> CatalogResult<Collection> {
        self.data
            .lock()
            .map(|c| c.clone())
            .map_err(|_| CatalogError::Internal("Lock poisoned".to_string()))
    }

    fn save(&self, collection: &Collection) -> CatalogResult<()> {
        let mut data = self
            .data
            .lock()
            .map_err(|_| CatalogError::Internal("Lock poisoned".to_string()))?;
        *data = collection.clone();
        Ok(())
    }
}
