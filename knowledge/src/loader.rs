use std::io::ErrorKind;
use std::path::Path;

use tracing::{error, info};

use crate::error::LoadError;
use crate::record::KnowledgeRecord;

/// Reads the knowledge base from a JSON array of objects.
///
/// Records keep their input order. Failures are logged here and returned;
/// the caller decides to abort.
pub fn load_knowledge_base(path: &Path) -> Result<Vec<KnowledgeRecord>, LoadError> {
    let result = read_records(path);
    match &result {
        Ok(records) => info!("loaded {} items from {}", records.len(), path.display()),
        Err(err) => error!("{err}"),
    }
    result
}

fn read_records(path: &Path) -> Result<Vec<KnowledgeRecord>, LoadError> {
    let data = std::fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    serde_json::from_slice(&data).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
