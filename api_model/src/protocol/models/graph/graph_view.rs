use serde::{Deserialize, Serialize};

/// Freshness of a tracked graph as computed at listing time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphStatus {
    New,
    Updated,
    Normal,
    Missing,
}

impl std::fmt::Display for GraphStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GraphStatus::New => "new",
            GraphStatus::Updated => "updated",
            GraphStatus::Normal => "normal",
            GraphStatus::Missing => "missing",
        };
        write!(f, "{}", s)
    }
}

/// One row of a listing. `display_mtime` is only present when the live
/// file changed since the entry was last acknowledged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphView {
    pub path: String,
    pub label: String,
    pub status: GraphStatus,
    pub display_mtime: Option<String>,
}
