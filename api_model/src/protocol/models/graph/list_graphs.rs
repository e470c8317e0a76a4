use crate::protocol::models::graph::graph_view::GraphView;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ListGraphsRequest;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ListGraphsResponse {
    pub graphs: Vec<GraphView>,
}
