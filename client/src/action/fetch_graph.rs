use crate::action::conn::{Connection, ConnectionConfig};
use crate::error::ClientError;
use crate::extract_response;
use api_model::protocol::message::api_request_message::ApiRequestKind;
use api_model::protocol::message::api_response_message::ApiResponseKind;
use api_model::protocol::models::graph::fetch_graph::FetchGraphRequest;
use cli_handler::cli_impl;
use std::io::Write;
use std::path::Path;

#[cli_impl]
pub fn fetch_graph(port: u16, path: &str, output: Option<&Path>) -> Result<(), ClientError> {
    let conn = Connection::new(Some(ConnectionConfig::with_port(port)));

    let res = extract_response!(
        conn.request(ApiRequestKind::FetchGraph(FetchGraphRequest {
            path: path.to_string(),
        }))?,
        ApiResponseKind::FetchGraph
    )?;

    match output {
        Some(out) => {
            std::fs::write(out, &res.content).map_err(|e| {
                ClientError::InternalError(
                    format!("failed to write '{}'", out.display()),
                    e.to_string(),
                )
            })?;
            println!("wrote {} bytes to {}", res.content.len(), out.display());
        }
        None => {
            std::io::stdout().write_all(&res.content).map_err(|e| {
                ClientError::InternalError(String::from("failed to write stdout"), e.to_string())
            })?;
        }
    }

    Ok(())
}
