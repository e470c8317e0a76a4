use crate::action::conn::{Connection, ConnectionConfig};
use crate::error::ClientError;
use crate::extract_response;
use api_model::protocol::message::api_request_message::ApiRequestKind;
use api_model::protocol::message::api_response_message::ApiResponseKind;
use api_model::protocol::models::graph::upload_graph::UploadGraphRequest;
use cli_handler::cli_impl;
use std::path::Path;

#[cli_impl]
pub fn upload_graph(port: u16, file: &Path, name: Option<&str>) -> Result<(), ClientError> {
    let content = std::fs::read(file).map_err(|e| {
        ClientError::InternalError(
            format!("failed to read '{}'", file.display()),
            e.to_string(),
        )
    })?;
    let file_name = match name {
        Some(n) => n.to_string(),
        None => file
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string())
            .ok_or_else(|| {
                ClientError::InternalError(
                    format!("'{}' has no usable file name", file.display()),
                    String::new(),
                )
            })?,
    };

    let conn = Connection::new(Some(ConnectionConfig::with_port(port)));
    let res = extract_response!(
        conn.request(ApiRequestKind::UploadGraph(UploadGraphRequest {
            file_name,
            content,
        }))?,
        ApiResponseKind::UploadGraph
    )?;

    println!("uploaded to '{}' as {}", res.path, res.status);
    Ok(())
}
