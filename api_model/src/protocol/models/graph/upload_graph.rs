use crate::protocol::models::graph::graph_view::GraphStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadGraphRequest {
    pub file_name: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadGraphResponse {
    pub path: String,
    pub status: GraphStatus,
}
