mod engine;
mod entry;
mod store;
pub mod util;

pub use engine::{GraphRegistry, REGISTRY, init_registry};
pub use entry::{GraphEntry, GraphStatus, GraphView, StoredStatus, live_view};
pub use store::{GraphMap, GraphStore};

use crate::constants::{LOG_DIR_NAME, REGISTRY_DIR_NAME, TMP_DIR_NAME, UPLOAD_DIR_NAME};
use crate::err::Result;
use crate::registry_error;
use crate::utilities::{AsyncLogger, init_file_logger};
use std::path::Path;
use tokio::task::JoinHandle;

/// Prepare the working dir for serving: verify it is usable, lay out the
/// registry-internal directories and the upload dir, and start the file
/// logger under the log dir.
pub async fn init_working_dir<P: AsRef<Path>>(
    working_dir: P,
) -> Result<(AsyncLogger, JoinHandle<()>)> {
    let working_dir = working_dir.as_ref();

    let perms = util::check_dir_permissions(working_dir);
    if perms != util::DirPermissions::all() {
        return Err(registry_error!(
            StoreUnavailable,
            "working dir '{}' is missing or lacks permissions (read={}, write={}, traverse={})",
            working_dir.display(),
            perms.read,
            perms.write,
            perms.execute
        )
        .into());
    }

    let registry_dir = working_dir.join(REGISTRY_DIR_NAME);
    tokio::fs::create_dir_all(registry_dir.join(LOG_DIR_NAME)).await?;
    tokio::fs::create_dir_all(registry_dir.join(TMP_DIR_NAME)).await?;
    tokio::fs::create_dir_all(working_dir.join(UPLOAD_DIR_NAME)).await?;

    let log_path = registry_dir.join(LOG_DIR_NAME).join("server.log");
    let (logger, task) = init_file_logger(&log_path).await?;
    logger.info(format!(
        "working dir '{}' initialized",
        working_dir.display()
    ));
    Ok((logger, task))
}
