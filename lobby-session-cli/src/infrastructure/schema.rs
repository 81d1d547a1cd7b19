use crate::infrastructure::error::{CliError, Result};
use lobby_session_core::{InboundFrame, OutboundFrame};
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Write JSON Schemas for both frame unions into `dir`.
///
/// Returns the files written.
pub fn export_schemas(dir: &Path) -> Result<Vec<PathBuf>> {
    if dir.exists() && !dir.is_dir() {
        return Err(CliError::invalid_directory(dir.to_path_buf()));
    }
    fs::create_dir_all(dir)?;

    let schemas = [
        ("client_frame.schema.json", schema_for!(OutboundFrame)),
        ("server_frame.schema.json", schema_for!(InboundFrame)),
    ];

    let mut written = Vec::with_capacity(schemas.len());
    for (file_name, schema) in schemas {
        let path = dir.join(file_name);
        fs::write(&path, serde_json::to_string_pretty(&schema)?)?;
        info!("Wrote {}", path.display());
        written.push(path);
    }

    Ok(written)
}
