use crate::constants::UPLOAD_DIR_NAME;
use crate::err::Result;
use crate::global_var::{ENV_VAR, LOGGER};
use crate::interface::handlers::to_wire_status;
use crate::registry::REGISTRY;
use crate::registry::util::{has_allowed_extension, sanitize_file_name};
use crate::{registry_error, registry_error_with_source};
use api_model::protocol::models::graph::upload_graph::{UploadGraphRequest, UploadGraphResponse};
use cli_handler::cli_handler;
use std::path::PathBuf;

/// Materialize an uploaded graph under the upload dir and track it. The
/// client-supplied name is reduced to its final path component before any
/// path is built from it.
#[cli_handler(UploadGraph)]
pub async fn upload_graph(request: &UploadGraphRequest) -> Result<UploadGraphResponse> {
    let name = sanitize_file_name(&request.file_name).ok_or_else(|| {
        crate::err::Error::from(registry_error!(
            InvalidInput,
            "upload name '{}' does not reduce to a usable file name",
            request.file_name
        ))
    })?;
    if !has_allowed_extension(&name) {
        return Err(registry_error!(
            InvalidInput,
            "only .json graph files are accepted, got '{}'",
            name
        )
        .into());
    }

    let env_var = ENV_VAR
        .get()
        .ok_or_else(|| crate::err::Error::from("ENV_VAR not initialized"))?;
    let upload_dir = PathBuf::from(env_var.get_working_dir()).join(UPLOAD_DIR_NAME);
    let dest = upload_dir.join(&name);

    // Stage next to the destination, then rename, so a re-upload replaces
    // the previous content in one step.
    let staged = upload_dir.join(format!(".{}.{:016x}.part", name, rand::random::<u64>()));
    tokio::fs::write(&staged, &request.content)
        .await
        .map_err(|e| {
            registry_error_with_source!(Internal, e, "failed to stage upload '{}'", name)
        })?;
    if let Err(e) = tokio::fs::rename(&staged, &dest).await {
        let _ = tokio::fs::remove_file(&staged).await;
        return Err(
            registry_error_with_source!(Internal, e, "failed to place upload '{}'", name).into(),
        );
    }
    LOGGER.info(format!("stored upload '{}' ({} bytes)", name, request.content.len()));

    let dest_str = dest.to_string_lossy().to_string();
    let status = REGISTRY.register(&dest_str, &name).await?;
    Ok(UploadGraphResponse {
        path: dest_str,
        status: to_wire_status(status),
    })
}
