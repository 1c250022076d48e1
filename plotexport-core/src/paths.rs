use crate::ExportError;
use std::path::{Path, PathBuf};

const RESERVED: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Fails with `FileAlreadyExists` when `path` exists and overwriting is not
/// allowed. With overwrite allowed an existing file is reported and left for
/// the caller to replace.
pub fn check_overwrite(path: &Path, overwrite: bool) -> Result<(), ExportError> {
    if !path.exists() {
        return Ok(());
    }
    if !overwrite {
        return Err(ExportError::FileAlreadyExists(path.to_path_buf()));
    }
    log::warn!("{} exists and will be overwritten", path.display());
    Ok(())
}

/// Filename-safe version of a free-form title.
pub fn sanitize_file_stem(title: &str) -> String {
    title
        .trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || c.is_control() || RESERVED.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// `dir/<base>.<extension>`
pub fn file_in_dir(dir: &Path, base: &str, extension: &str) -> PathBuf {
    dir.join(format!("{base}.{extension}"))
}

/// An existing directory resolves to `<dir>/<base>.<extension>`; anything
/// else is used as the file path itself.
pub fn resolve_destination(destination: &Path, base: &str, extension: &str) -> PathBuf {
    if destination.is_dir() {
        file_in_dir(destination, base, extension)
    } else {
        destination.to_path_buf()
    }
}

pub fn ensure_dir(dir: &Path) -> Result<(), ExportError> {
    if !dir.is_dir() {
        log::debug!("creating destination directory {}", dir.display());
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
