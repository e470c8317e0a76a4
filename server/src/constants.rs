/// Port the registry API listens on when the config does not say otherwise.
pub const DEFAULT_API_PORT: u16 = 8001;

/// Directory under the working dir holding registry-internal state.
pub const REGISTRY_DIR_NAME: &str = ".registry";

/// Log directory under the registry dir.
pub const LOG_DIR_NAME: &str = "logs";

/// Scratch directory for atomic persists, under the registry dir.
pub const TMP_DIR_NAME: &str = "tmp";

/// File name of the persisted metadata document.
pub const DB_FILE_NAME: &str = "graph_db.json";

/// Directory under the working dir where uploaded graphs land.
pub const UPLOAD_DIR_NAME: &str = "uploads";

/// The only file extension accepted for uploaded graphs.
pub const ALLOWED_UPLOAD_EXT: &str = "json";
