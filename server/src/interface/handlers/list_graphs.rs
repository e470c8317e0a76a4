use crate::err::Result;
use crate::interface::handlers::to_wire_status;
use crate::registry::REGISTRY;
use api_model::protocol::models::graph::graph_view::GraphView;
use api_model::protocol::models::graph::list_graphs::{ListGraphsRequest, ListGraphsResponse};
use cli_handler::cli_handler;

#[cli_handler(ListGraphs)]
pub async fn list_graphs(_request: &ListGraphsRequest) -> Result<ListGraphsResponse> {
    let rows = REGISTRY.list().await;
    let graphs = rows
        .into_iter()
        .map(|(path, view)| GraphView {
            path,
            label: view.label,
            status: to_wire_status(view.status),
            display_mtime: view.display_mtime,
        })
        .collect();
    Ok(ListGraphsResponse { graphs })
}
