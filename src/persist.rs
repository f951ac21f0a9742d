//! Atomic file replacement

use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Directory a target file will be created in (`.` for bare file names)
pub(crate) fn parent_dir(target: &Path) -> &Path {
    match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Write `bytes` to `target` through a temp file in the same directory
///
/// The target is only replaced once the content is fully written and
/// synced; on any error the temp file is removed and the target is left
/// as it was.
pub(crate) fn write_atomic(target: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut tmp = NamedTempFile::new_in(parent_dir(target))?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}
