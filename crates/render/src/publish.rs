//! Atomic publication of the finished document.
//!
//! Bytes are staged in a uniquely named temporary file in the destination
//! directory and renamed into place. The staging file is removed on every
//! failure path, so the destination either holds a complete document or is
//! left untouched.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use gstinvoice_core::{InvoiceError, InvoiceResult};

fn destination_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Write `bytes` to `path` in one rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> InvoiceResult<()> {
    if path.file_name().is_none() {
        return Err(InvoiceError::render(format!(
            "output path {} does not name a file",
            path.display()
        )));
    }

    let dir = destination_dir(path);
    let mut staged = NamedTempFile::new_in(&dir).map_err(|e| {
        InvoiceError::render(format!("cannot stage output in {}: {e}", dir.display()))
    })?;
    debug!(staging = %staged.path().display(), "staging output");

    staged
        .write_all(bytes)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|e| InvoiceError::render(format!("cannot write staged output: {e}")))?;

    staged.persist(path).map_err(|e| {
        InvoiceError::render(format!("cannot publish {}: {}", path.display(), e.error))
    })?;
    Ok(())
}
