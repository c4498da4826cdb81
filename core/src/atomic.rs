//! Crash-safe file replacement.
//!
//! New content goes to a sibling `<name>.tmp`, is flushed to disk, then
//! renamed over the target. Readers see either the old file or the new
//! one. Where rename cannot replace the target we fall back to copying,
//! which is not atomic, and say so in the log.

use crate::error::{RecorderError, RecorderResult};
use std::{
    ffi::OsString,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

/// Sibling temp path for `path`: `foo.json` -> `foo.json.tmp`.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// First half of a replace: durably write `bytes` to the temp sibling.
pub fn write_temp(path: &Path, bytes: &[u8]) -> RecorderResult<PathBuf> {
    write_temp_with(path, |file| {
        file.write_all(bytes)?;
        file.sync_all()
    })
}

/// `write_temp` with the fill step supplied by the caller. A temp file
/// left half written by a failed fill is removed.
pub fn write_temp_with(
    path: &Path,
    fill: impl FnOnce(&mut File) -> io::Result<()>,
) -> RecorderResult<PathBuf> {
    let tmp = temp_path(path);
    let mut file = File::create(&tmp).map_err(|e| RecorderError::write_failure(&tmp, e))?;
    if let Err(e) = fill(&mut file) {
        drop(file);
        if let Err(rm) = fs::remove_file(&tmp) {
            log::warn!("atomic: could not remove partial {}: {rm}", tmp.display());
        }
        return Err(RecorderError::write_failure(&tmp, e));
    }
    Ok(tmp)
}

/// Second half of a replace: move the temp file onto `path`.
pub fn commit_temp(tmp: &Path, path: &Path) -> RecorderResult<()> {
    commit_temp_with(tmp, path, |from, to| fs::rename(from, to))
}

/// `commit_temp` with the rename step supplied by the caller. When it
/// fails the temp file is copied over `path` and then removed.
pub fn commit_temp_with(
    tmp: &Path,
    path: &Path,
    rename: impl FnOnce(&Path, &Path) -> io::Result<()>,
) -> RecorderResult<()> {
    match rename(tmp, path) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            log::warn!(
                "atomic: rename {} -> {} failed ({rename_err}); falling back to non-atomic copy",
                tmp.display(),
                path.display()
            );
            fs::copy(tmp, path).map_err(|e| RecorderError::write_failure(path, e))?;
            if let Err(e) = fs::remove_file(tmp) {
                log::warn!("atomic: could not remove {}: {e}", tmp.display());
            }
            Ok(())
        }
    }
}

/// Replace the whole content of `path` with `bytes`, creating parent
/// directories as needed.
pub fn atomic_replace(path: &Path, bytes: &[u8]) -> RecorderResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| RecorderError::write_failure(parent, e))?;
    }
    let tmp = write_temp(path, bytes)?;
    commit_temp(&tmp, path)
}
