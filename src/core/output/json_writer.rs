//! JSON output writer.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{Result, TimelineError};

/// Converts a value to a pretty-printed JSON string (two-space indent).
///
/// Same format as [`write_json`], but returns a String instead of writing to
/// a file.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Writes a value as pretty-printed JSON, replacing `output_path` atomically.
///
/// The document goes to a temporary file in the same directory first and is
/// renamed into place once fully written, so readers never see a partial
/// file.
///
/// # Errors
///
/// Returns [`TimelineError::Write`] with the target path if the temporary
/// file cannot be created, written or renamed.
pub fn write_json<T: Serialize + ?Sized>(value: &T, output_path: &Path) -> Result<()> {
    let json = to_json(value)?;
    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let fail = |e: std::io::Error| TimelineError::write(output_path, e);

    let mut file = NamedTempFile::new_in(dir).map_err(fail)?;
    file.write_all(json.as_bytes()).map_err(fail)?;
    file.write_all(b"\n").map_err(fail)?;
    file.as_file().sync_all().map_err(fail)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(fail)?;
    }

    file.persist(output_path).map_err(|e| fail(e.error))?;
    Ok(())
}
