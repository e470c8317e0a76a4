pub mod fetch_graph;
pub mod list_graphs;
pub mod register_graph;
pub mod upload_graph;

pub use fetch_graph::fetch_graph;
pub use list_graphs::list_graphs;
pub use register_graph::register_graph;
pub use upload_graph::upload_graph;

use crate::registry::GraphStatus;
use api_model::protocol::message::api_request_message::ApiRequestKind;
use api_model::protocol::message::api_response_message::ApiResponseKind;
use api_model::protocol::models::graph::graph_view::GraphStatus as WireStatus;

pub(crate) fn to_wire_status(status: GraphStatus) -> WireStatus {
    match status {
        GraphStatus::New => WireStatus::New,
        GraphStatus::Updated => WireStatus::Updated,
        GraphStatus::Normal => WireStatus::Normal,
        GraphStatus::Missing => WireStatus::Missing,
    }
}

/// Dispatch one decoded request to its handler. Handler errors are already
/// folded into the Error response variant by the handler wrappers.
pub async fn run_handler(api_request_kind: &ApiRequestKind) -> ApiResponseKind {
    match api_request_kind {
        ApiRequestKind::ListGraphs(req) => list_graphs(req).await,
        ApiRequestKind::FetchGraph(req) => fetch_graph(req).await,
        ApiRequestKind::RegisterGraph(req) => register_graph(req).await,
        ApiRequestKind::UploadGraph(req) => upload_graph(req).await,
    }
}
