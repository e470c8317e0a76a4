use crate::protocol::models::graph::graph_view::GraphStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterGraphRequest {
    pub path: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterGraphResponse {
    pub path: String,
    pub status: GraphStatus,
}
