use crate::err::Result;
use crate::registry::REGISTRY;
use api_model::protocol::models::graph::fetch_graph::{FetchGraphRequest, FetchGraphResponse};
use cli_handler::cli_handler;

/// Fetching a graph acknowledges it: the caller gets the file content and
/// the entry's watermark moves to the mtime observed now.
#[cli_handler(FetchGraph)]
pub async fn fetch_graph(request: &FetchGraphRequest) -> Result<FetchGraphResponse> {
    let content = REGISTRY.acknowledge(&request.path).await?;
    Ok(FetchGraphResponse {
        path: request.path.clone(),
        content,
    })
}
