//! DOCX writing module.
//!
//! Documents are written back whole: the main part is regenerated from the
//! block list and every other package entry is copied unchanged.

mod document_xml;
mod options;
mod package;

pub use options::WriteOptions;

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::Document;

/// Serialize a document to DOCX bytes.
pub fn to_bytes(doc: &Document) -> Result<Vec<u8>> {
    package::package_bytes(doc)
}

/// Write a document to `path`.
///
/// Returns the backup path when [`WriteOptions::backup`] is set and the
/// destination already existed.
pub fn save<P: AsRef<Path>>(doc: &Document, path: P, options: &WriteOptions) -> Result<Option<PathBuf>> {
    let path = path.as_ref();
    let bytes = to_bytes(doc)?;

    let backup = match options.backup {
        Some(ref operation) if path.exists() => Some(create_backup(path, operation)?),
        _ => None,
    };

    std::fs::write(path, bytes).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Saved {}", path.display());

    Ok(backup)
}

/// Copy `path` to `<stem>_before_<operation><ext>` next to it.
pub fn create_backup<P: AsRef<Path>>(path: P, operation: &str) -> Result<PathBuf> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    let target = backup_path(path, operation);
    std::fs::copy(path, &target).map_err(|source| Error::Write {
        path: target.clone(),
        source,
    })?;
    log::info!("Backup created: {}", target.display());
    Ok(target)
}

/// Name of the backup copy for `path`.
pub fn backup_path(path: &Path, operation: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    path.with_file_name(format!("{}_before_{}{}", stem, operation, ext))
}
