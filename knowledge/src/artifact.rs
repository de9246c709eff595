//! Generated JavaScript artifact holding the embedded knowledge base.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::ArtifactError;
use crate::record::AugmentedRecord;

const DESCRIPTION: &str = "// Contains text and embeddings for the knowledge base";

/// Renders the artifact text.
///
/// The records are serialized as pretty JSON (2-space indent, non-ASCII
/// kept as-is) and bound to `variable` with a `const` declaration.
pub fn render_artifact(
    records: &[AugmentedRecord],
    generated_at: DateTime<Utc>,
    variable: &str,
) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string_pretty(records)?;
    Ok(format!(
        "// Generated on {}\n{DESCRIPTION}\nconst {variable} = {json};\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
    ))
}

/// Renders the artifact stamped with the current time and writes it to
/// `path`, replacing any previous file.
pub fn write_artifact(
    path: &Path,
    records: &[AugmentedRecord],
    variable: &str,
) -> Result<(), ArtifactError> {
    let content = render_artifact(records, Utc::now(), variable)?;
    let io_err = |source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, content).map_err(io_err)
}
