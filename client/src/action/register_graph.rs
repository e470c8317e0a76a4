use crate::action::conn::{Connection, ConnectionConfig};
use crate::error::ClientError;
use crate::extract_response;
use api_model::protocol::message::api_request_message::ApiRequestKind;
use api_model::protocol::message::api_response_message::ApiResponseKind;
use api_model::protocol::models::graph::register_graph::RegisterGraphRequest;
use cli_handler::cli_impl;

#[cli_impl]
pub fn register_graph(port: u16, path: &str, label: &str) -> Result<(), ClientError> {
    let conn = Connection::new(Some(ConnectionConfig::with_port(port)));

    let res = extract_response!(
        conn.request(ApiRequestKind::RegisterGraph(RegisterGraphRequest {
            path: path.to_string(),
            label: label.to_string(),
        }))?,
        ApiResponseKind::RegisterGraph
    )?;

    println!("tracked '{}' as {}", res.path, res.status);
    Ok(())
}
