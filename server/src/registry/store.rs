use crate::err::Result;
use crate::global_var::LOGGER;
use crate::registry::entry::GraphEntry;
use crate::{registry_error, registry_error_with_source};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// The whole metadata document: tracked path -> persisted record.
pub type GraphMap = HashMap<String, GraphEntry>;

/// Persistence layer for the metadata document.
///
/// One RwLock is the sole mutual-exclusion boundary of the registry.
/// Mutations hold the write half across the whole load-modify-save cycle,
/// so concurrent writers cannot interleave on the document. An unreadable
/// or corrupt document degrades to an empty map on load; a failed save is
/// an error for the caller.
pub struct GraphStore {
    db_path: PathBuf,
    tmp_dir: PathBuf,
    lock: RwLock<()>,
}

impl GraphStore {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(db_path: P, tmp_dir: Q) -> Self {
        Self {
            db_path: db_path.into(),
            tmp_dir: tmp_dir.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Snapshot the current document.
    pub async fn load_all(&self) -> GraphMap {
        let _guard = self.lock.read().await;
        self.load_unlocked().await
    }

    /// Run one load-modify-save cycle under the write lock. An error from
    /// the closure aborts the cycle before anything is written.
    pub async fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut GraphMap) -> Result<T>,
    {
        let _guard = self.lock.write().await;
        let mut map = self.load_unlocked().await;
        let out = f(&mut map)?;
        self.save_unlocked(&map).await?;
        Ok(out)
    }

    async fn load_unlocked(&self) -> GraphMap {
        match tokio::fs::read(&self.db_path).await {
            Ok(bytes) => match serde_json::from_slice::<GraphMap>(&bytes) {
                Ok(map) => map,
                Err(e) => {
                    LOGGER.warn(format!(
                        "metadata document at {} is unreadable, starting from an empty map: {}",
                        self.db_path.display(),
                        e
                    ));
                    GraphMap::new()
                }
            },
            Err(_) => GraphMap::new(),
        }
    }

    async fn save_unlocked(&self, map: &GraphMap) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(map).map_err(|e| {
            registry_error_with_source!(StoreUnavailable, e, "failed to encode metadata document")
        })?;

        // Write to a scratch file first, then rename over the document so a
        // crash mid-write cannot leave a torn file behind.
        let tmp_path = self
            .tmp_dir
            .join(format!("graph_db.{:016x}.tmp", rand::random::<u64>()));
        tokio::fs::write(&tmp_path, &bytes).await.map_err(|e| {
            registry_error_with_source!(
                StoreUnavailable,
                e,
                "failed to stage metadata document at {}",
                tmp_path.display()
            )
        })?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.db_path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(registry_error_with_source!(
                StoreUnavailable,
                e,
                "failed to persist metadata document at {}",
                self.db_path.display()
            )
            .into());
        }
        LOGGER.trace(format!(
            "persisted metadata document, {} entries",
            map.len()
        ));
        Ok(())
    }

    /// Validate that the store's directories are usable before serving.
    pub fn check_layout(&self) -> Result<()> {
        let tmp_ok = self.tmp_dir.is_dir();
        let parent_ok = self
            .db_path
            .parent()
            .map(|p| p.is_dir())
            .unwrap_or(false);
        if !tmp_ok || !parent_ok {
            return Err(registry_error!(
                StoreUnavailable,
                "store layout is incomplete under {}",
                self.db_path
                    .parent()
                    .unwrap_or_else(|| Path::new("?"))
                    .display()
            )
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::entry::StoredStatus;
    use std::time::SystemTime;

    struct TempDirGuard(PathBuf);

    impl TempDirGuard {
        fn new(name: &str) -> Self {
            let mut p = std::env::temp_dir();
            p.push(format!(
                "graph_store_{}_{}_{}",
                name,
                std::process::id(),
                rand::random::<u32>()
            ));
            std::fs::create_dir_all(p.join("tmp")).expect("create temp dirs");
            Self(p)
        }

        fn store(&self) -> GraphStore {
            GraphStore::new(self.0.join("graph_db.json"), self.0.join("tmp"))
        }
    }

    impl Drop for TempDirGuard {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    fn sample_entry(label: &str) -> GraphEntry {
        GraphEntry {
            label: label.into(),
            status: StoredStatus::New,
            stored_mtime: SystemTime::now(),
        }
    }

    #[tokio::test]
    async fn missing_document_loads_empty() {
        let tmp = TempDirGuard::new("missing");
        let store = tmp.store();
        assert!(store.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_document_loads_empty() {
        let tmp = TempDirGuard::new("corrupt");
        let store = tmp.store();
        std::fs::write(store.db_path(), b"{not json").unwrap();
        assert!(store.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn update_persists_and_reloads() {
        let tmp = TempDirGuard::new("roundtrip");
        let store = tmp.store();

        store
            .update(|map| {
                map.insert("/g/a.json".into(), sample_entry("a"));
                Ok(())
            })
            .await
            .expect("update");

        let map = store.load_all().await;
        assert_eq!(map.len(), 1);
        assert_eq!(map["/g/a.json"].label, "a");

        // A fresh store over the same path sees the persisted document.
        let reopened = tmp.store();
        assert_eq!(reopened.load_all().await.len(), 1);
    }

    #[tokio::test]
    async fn failed_closure_leaves_document_untouched() {
        let tmp = TempDirGuard::new("abort");
        let store = tmp.store();
        store
            .update(|map| {
                map.insert("/g/a.json".into(), sample_entry("a"));
                Ok(())
            })
            .await
            .unwrap();

        let res: Result<()> = store
            .update(|map| {
                map.clear();
                Err("validation failed".into())
            })
            .await;
        assert!(res.is_err());
        assert_eq!(store.load_all().await.len(), 1);
    }

    #[tokio::test]
    async fn save_without_layout_is_store_unavailable() {
        let tmp = TempDirGuard::new("nolayout");
        let store = GraphStore::new(
            tmp.0.join("graph_db.json"),
            tmp.0.join("no_such_tmp_dir"),
        );
        let res = store.update(|_map| Ok(())).await;
        let err = res.err().expect("save should fail");
        let re = err
            .downcast_ref::<crate::err::RegistryError>()
            .expect("registry error");
        assert_eq!(re.kind(), crate::err::ErrorKind::StoreUnavailable);
    }
}
