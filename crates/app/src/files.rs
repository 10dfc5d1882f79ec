//! File access for the binary.
//!
//! Output goes through a temporary file in the destination directory and is
//! renamed over the target only once it is complete, so a failed run never
//! leaves a partial or truncated output behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use huffpack_core::Result;
use tempfile::NamedTempFile;
use tracing::debug;

/// Read a whole input file.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    let data = fs::read(path)?;
    debug!(path = %path.display(), bytes = data.len(), "read input");
    Ok(data)
}

/// Write `data` to `path`, replacing any existing file atomically.
pub fn write_atomically(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    debug!(path = %path.display(), bytes = data.len(), "published output");
    Ok(())
}
