use crate::utilities::format::mtime_to_display;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Statuses that may be written into the metadata document. A missing
/// file is deliberately not representable here; it only exists on
/// [`GraphStatus`], computed at listing time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoredStatus {
    New,
    Updated,
    Normal,
}

/// Freshness of a graph as derived from the live filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphStatus {
    New,
    Updated,
    Normal,
    Missing,
}

impl From<StoredStatus> for GraphStatus {
    fn from(s: StoredStatus) -> Self {
        match s {
            StoredStatus::New => GraphStatus::New,
            StoredStatus::Updated => GraphStatus::Updated,
            StoredStatus::Normal => GraphStatus::Normal,
        }
    }
}

impl GraphStatus {
    /// Listing sort bucket. Entries needing attention come first.
    pub fn priority(&self) -> u8 {
        match self {
            GraphStatus::New => 0,
            GraphStatus::Updated => 1,
            GraphStatus::Normal | GraphStatus::Missing => 2,
        }
    }
}

/// Persisted record for one tracked graph. `stored_mtime` is the
/// watermark: the live modification time that was last acknowledged to a
/// consumer (or observed at registration).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEntry {
    pub label: String,
    pub status: StoredStatus,
    pub stored_mtime: SystemTime,
}

/// What a listing shows for one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphView {
    pub label: String,
    pub status: GraphStatus,
    pub display_mtime: Option<String>,
}

/// Overlay the live filesystem state onto a persisted record.
///
/// The overlay is pure: it never touches the record. An absent file reads
/// as MISSING; a live mtime strictly past the watermark reads as UPDATED
/// and carries the rendered mtime; otherwise the persisted status stands.
pub fn live_view(entry: &GraphEntry, live_mtime: Option<SystemTime>) -> GraphView {
    match live_mtime {
        None => GraphView {
            label: entry.label.clone(),
            status: GraphStatus::Missing,
            display_mtime: None,
        },
        Some(live) if live > entry.stored_mtime => GraphView {
            label: entry.label.clone(),
            status: GraphStatus::Updated,
            display_mtime: Some(mtime_to_display(live)),
        },
        Some(_) => GraphView {
            label: entry.label.clone(),
            status: entry.status.into(),
            display_mtime: None,
        },
    }
}
