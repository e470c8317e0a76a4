pub mod format;
pub mod logger;

pub use logger::{AsyncLogger, init_file_logger};
