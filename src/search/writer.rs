use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IndexError, Result};
use crate::search::record::PageRecord;

/// Serialize records into the index document (a JSON array).
pub fn to_json(records: &[PageRecord], pretty: bool) -> Result<Vec<u8>> {
    let mut bytes = if pretty {
        serde_json::to_vec_pretty(records)?
    } else {
        serde_json::to_vec(records)?
    };
    bytes.push(b'\n');
    Ok(bytes)
}

/// Replace the index file at `path` with `records`.
///
/// The document is written to a sibling temp file first and renamed into
/// place, so readers see either the previous index or the new one.
pub fn write_index(path: &Path, records: &[PageRecord], pretty: bool) -> Result<()> {
    let bytes = to_json(records, pretty)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| IndexError::io(parent, e))?;
    }

    let tmp = temp_path(path);
    if let Err(e) = fs::write(&tmp, &bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(IndexError::io(&tmp, e));
    }

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(IndexError::io(path, e));
    }

    tracing::info!(
        "Wrote {} records ({} bytes) to {}",
        records.len(),
        bytes.len(),
        path.display()
    );
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "index.json".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}
