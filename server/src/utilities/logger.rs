//! Async file logger.
//!
//! A background tokio task receives log records over an mpsc channel and
//! appends them to the log file, so request handlers never block on disk.
//! When the last handle is dropped or a shutdown record is sent, the task
//! flushes and exits.

use crate::err::Result;
use crate::global_var::{DEBUG_MODE, LOGGER_CELL};
use std::fmt;
use std::ops::Deref;
use std::path::Path;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Log level for messages.
#[derive(Clone, Copy, Debug)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        write!(f, "{}", s)
    }
}

/// A simple async logger handle. Cloning creates another sender handle.
#[derive(Clone, Debug)]
pub struct AsyncLogger {
    tx: mpsc::Sender<LogRecord>,
}

impl AsyncLogger {
    fn log<S: Into<String>>(&self, level: LogLevel, msg: S) {
        let str_msg = msg.into();
        if *DEBUG_MODE {
            println!("{}: {}", level, &str_msg);
        }
        match self.tx.try_send(LogRecord::new(level, str_msg)) {
            Ok(_) => {}
            Err(err) => {
                eprintln!("Failed to send log message: {}", err);
            }
        }
    }

    /// Request the logger task to flush and shut down.
    pub async fn shutdown(&self) {
        // Ignore send error (e.g., task already closed)
        let _ = self.tx.send(LogRecord::Shutdown).await;
    }

    pub fn trace<S: Into<String>>(&self, msg: S) {
        self.log(LogLevel::Trace, msg);
    }
    pub fn debug<S: Into<String>>(&self, msg: S) {
        if *DEBUG_MODE {
            self.log(LogLevel::Debug, msg);
        }
    }
    pub fn info<S: Into<String>>(&self, msg: S) {
        self.log(LogLevel::Info, msg);
    }
    pub fn warn<S: Into<String>>(&self, msg: S) {
        self.log(LogLevel::Warn, msg);
    }
    pub fn error<S: Into<String>>(&self, msg: S) {
        self.log(LogLevel::Error, msg);
    }
}

#[derive(Debug)]
enum LogRecord {
    Message {
        level: LogLevel,
        msg: String,
        ts_millis: i64,
    },
    Shutdown,
}

impl LogRecord {
    fn new(level: LogLevel, msg: String) -> Self {
        Self::Message {
            level,
            msg,
            ts_millis: chrono::Utc::now().timestamp_millis(),
        }
    }

    fn format_line(&self) -> Option<String> {
        match self {
            LogRecord::Message {
                level,
                msg,
                ts_millis,
            } => {
                // Format: 2025-10-08T21:22:33.123Z [LEVEL] message\n
                let ts = chrono::DateTime::from_timestamp_millis(*ts_millis)
                    .unwrap_or_default()
                    .format("%Y-%m-%dT%H:%M:%S%.3fZ");
                Some(format!("{} [{}] {}\n", ts, level, msg))
            }
            LogRecord::Shutdown => None,
        }
    }
}

/// Initialize a file-based async logger. Returns the logger handle and the
/// background task handle. Dropping the last logger handle closes the channel
/// and lets the task shut down.
pub async fn init_file_logger<P: AsRef<Path>>(path: P) -> Result<(AsyncLogger, JoinHandle<()>)> {
    // Keep a copy of the path so we can reopen the file if a writing error occurs.
    let path_buf = path.as_ref().to_path_buf();

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path_buf)
        .await?;

    let (tx, mut rx) = mpsc::channel::<LogRecord>(1024);
    let mut writer = BufWriter::new(file);

    let task = tokio::spawn(async move {
        while let Some(rec) = rx.recv().await {
            match rec {
                LogRecord::Message { .. } => {
                    if let Some(line) = rec.format_line() {
                        if let Err(_e) = writer.write_all(line.as_bytes()).await {
                            // Attempt to recover: flush, reopen the file, swap the writer, and retry once.
                            let _ = writer.flush().await;
                            match OpenOptions::new()
                                .create(true)
                                .append(true)
                                .open(&path_buf)
                                .await
                            {
                                Ok(new_file) => {
                                    writer = BufWriter::new(new_file);
                                    let _ = writer.write_all(line.as_bytes()).await;
                                }
                                Err(_) => {
                                    // Couldn't reopen. Drop the message and avoid tight loop.
                                    tokio::time::sleep(std::time::Duration::from_millis(200))
                                        .await;
                                }
                            }
                        }
                    }
                }
                LogRecord::Shutdown => {
                    break;
                }
            }
        }
        // Flush remaining data before exit
        let _ = writer.flush().await;
    });

    Ok((AsyncLogger { tx }, task))
}

pub struct Logger;

impl Deref for Logger {
    type Target = AsyncLogger;
    fn deref(&self) -> &Self::Target {
        if let Some(l) = LOGGER_CELL.get() {
            return l;
        }
        #[cfg(test)]
        {
            // In test builds, lazily install a fallback no-op logger so unit tests
            // can call LOGGER.*() without an explicit init. The fallback keeps a
            // channel alive but spawns no task and writes nothing.
            let _ = LOGGER_CELL.set(test_fallback_logger());
            return LOGGER_CELL
                .get()
                .expect("LOGGER_CELL should be set by test fallback");
        }
        LOGGER_CELL.get().expect("LOGGER_CELL should be set")
    }
}

#[cfg(test)]
fn test_fallback_logger() -> AsyncLogger {
    // Create a channel and leak the receiver to keep it alive without a runtime.
    let (tx, rx) = mpsc::channel::<LogRecord>(1024);
    let _ = Box::leak(Box::new(rx));
    AsyncLogger { tx }
}
