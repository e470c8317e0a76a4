use crate::err::Result;
use crate::interface::handlers::to_wire_status;
use crate::registry::REGISTRY;
use api_model::protocol::models::graph::register_graph::{
    RegisterGraphRequest, RegisterGraphResponse,
};
use cli_handler::cli_handler;

#[cli_handler(RegisterGraph)]
pub async fn register_graph(request: &RegisterGraphRequest) -> Result<RegisterGraphResponse> {
    let status = REGISTRY.register(&request.path, &request.label).await?;
    Ok(RegisterGraphResponse {
        path: request.path.clone(),
        status: to_wire_status(status),
    })
}
