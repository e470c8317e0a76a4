use crate::constants::{DB_FILE_NAME, REGISTRY_DIR_NAME, TMP_DIR_NAME};
use crate::err::Result;
use crate::global_var::{ENV_VAR, LOGGER};
use crate::registry::entry::{GraphEntry, GraphStatus, GraphView, StoredStatus, live_view};
use crate::registry::store::GraphStore;
use crate::{registry_error, registry_error_with_source};
use std::path::Path;
use std::sync::LazyLock;
use std::time::SystemTime;
use tokio::sync::OnceCell;

/// Stat a regular file's modification time. Absent paths, non-files and
/// stat failures all read as "not there".
fn probe_mtime<P: AsRef<Path>>(path: P) -> Option<SystemTime> {
    let meta = std::fs::metadata(path.as_ref()).ok()?;
    if !meta.is_file() {
        return None;
    }
    meta.modified().ok()
}

fn sort_key<'a>(path: &'a str, view: &'a GraphView) -> (u8, &'a str, &'a str) {
    let label = if view.label.is_empty() {
        path
    } else {
        view.label.as_str()
    };
    (view.status.priority(), label, path)
}

/// The freshness registry. Every operation runs one load or one
/// load-modify-save cycle against the store; nothing is cached between
/// requests, so the document on disk is always the source of truth.
pub struct GraphRegistry {
    store: GraphStore,
}

impl GraphRegistry {
    pub fn new(store: GraphStore) -> Self {
        Self { store }
    }

    /// Build a registry rooted at a working dir, with its document and
    /// scratch space under the registry-internal directory.
    pub fn at_working_dir<P: AsRef<Path>>(base: P) -> Self {
        let registry_dir = base.as_ref().join(REGISTRY_DIR_NAME);
        Self::new(GraphStore::new(
            registry_dir.join(DB_FILE_NAME),
            registry_dir.join(TMP_DIR_NAME),
        ))
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Compute the listing: every tracked entry with the live filesystem
    /// state overlaid, ordered so entries needing attention come first
    /// (NEW, then UPDATED), then by label, with the path as tie-break.
    ///
    /// Listing is read-only. Watermarks and persisted statuses are not
    /// advanced here, so a banner survives any number of listings.
    pub async fn list(&self) -> Vec<(String, GraphView)> {
        let map = self.store.load_all().await;
        let mut rows: Vec<(String, GraphView)> = map
            .iter()
            .map(|(path, entry)| (path.clone(), live_view(entry, probe_mtime(path))))
            .collect();
        rows.sort_by(|(pa, va), (pb, vb)| sort_key(pa, va).cmp(&sort_key(pb, vb)));
        rows
    }

    /// Acknowledge one graph: hand its current content to the caller and
    /// advance the watermark to the live mtime observed now. After this
    /// the entry reads NORMAL until the file changes again.
    ///
    /// Unknown paths and absent files fail without mutating anything.
    pub async fn acknowledge(&self, path: &str) -> Result<Vec<u8>> {
        let path_owned = path.to_string();
        let content = self
            .store
            .update(move |map| {
                let entry = map.get_mut(&path_owned).ok_or_else(|| {
                    crate::err::Error::from(registry_error!(
                        NotFound,
                        "graph '{}' is not tracked by the registry",
                        path_owned
                    ))
                })?;
                let live = probe_mtime(&path_owned).ok_or_else(|| {
                    crate::err::Error::from(registry_error!(
                        NotFound,
                        "graph file '{}' does not exist on disk",
                        path_owned
                    ))
                })?;
                let content = std::fs::read(&path_owned).map_err(|e| {
                    registry_error_with_source!(
                        Internal,
                        e,
                        "failed to read graph file '{}'",
                        path_owned
                    )
                })?;
                entry.status = StoredStatus::Normal;
                entry.stored_mtime = live;
                Ok(content)
            })
            .await?;
        LOGGER.debug(format!("acknowledged graph '{}'", path));
        Ok(content)
    }

    /// Track a graph file, or re-register one that is already tracked.
    ///
    /// A first registration records NEW; re-registering an existing path
    /// records UPDATED and overwrites the label. Either way the watermark
    /// is set to the live mtime observed now.
    pub async fn register(&self, path: &str, label: &str) -> Result<GraphStatus> {
        let label = label.trim();
        if label.is_empty() {
            return Err(registry_error!(InvalidInput, "a non-empty label is required").into());
        }
        if path.trim().is_empty() {
            return Err(registry_error!(InvalidInput, "a non-empty path is required").into());
        }
        let live = probe_mtime(path).ok_or_else(|| {
            crate::err::Error::from(registry_error!(
                InvalidInput,
                "path '{}' does not exist or is not a regular file",
                path
            ))
        })?;

        let path_owned = path.to_string();
        let label_owned = label.to_string();
        let status = self
            .store
            .update(move |map| match map.get_mut(&path_owned) {
                Some(entry) => {
                    entry.label = label_owned;
                    entry.status = StoredStatus::Updated;
                    entry.stored_mtime = live;
                    Ok(StoredStatus::Updated)
                }
                None => {
                    map.insert(
                        path_owned,
                        GraphEntry {
                            label: label_owned,
                            status: StoredStatus::New,
                            stored_mtime: live,
                        },
                    );
                    Ok(StoredStatus::New)
                }
            })
            .await?;
        LOGGER.info(format!(
            "registered graph '{}' ('{}') as {:?}",
            path, label, status
        ));
        Ok(status.into())
    }
}

static REGISTRY_CELL: LazyLock<OnceCell<GraphRegistry>> = LazyLock::new(OnceCell::new);

/// Process-wide registry handle. Panics if used before [`init_registry`].
pub static REGISTRY: LazyLock<&'static GraphRegistry> = LazyLock::new(|| {
    REGISTRY_CELL
        .get()
        .expect("registry used before init_registry()")
});

/// Build the process-wide registry from the resolved runtime config.
pub async fn init_registry() -> Result<&'static GraphRegistry> {
    let registry = REGISTRY_CELL
        .get_or_try_init(|| async {
            let env_var = ENV_VAR
                .get()
                .ok_or_else(|| crate::err::Error::from("ENV_VAR not initialized"))?;
            let registry = GraphRegistry::at_working_dir(env_var.get_working_dir());
            registry.store().check_layout()?;
            let count = registry.store().load_all().await.len();
            LOGGER.info(format!("graph registry ready, {} tracked entries", count));
            Ok::<GraphRegistry, crate::err::Error>(registry)
        })
        .await?;
    Ok(registry)
}
