use std::path::{Component, Path, PathBuf};

use hotrod_core::{FileError, FileRecord, ReadTarget};

use crate::decode::decode_utf8;

/// Absolute path for a read; UI-supplied paths hang off the install directory.
///
/// Root and prefix components of a UI-supplied path are dropped, so
/// `/etc/passwd` names `<install_dir>/etc/passwd`.
pub fn resolve_target(install_dir: &Path, target: &ReadTarget) -> PathBuf {
    match target {
        ReadTarget::InstallRelative(path) => {
            let relative: PathBuf = path
                .components()
                .filter(|part| matches!(part, Component::Normal(_) | Component::ParentDir))
                .collect();
            install_dir.join(relative)
        }
        ReadTarget::Absolute(path) => path.clone(),
    }
}

/// Read `path` completely and decode it. Any failure, including invalid UTF-8,
/// becomes a [`FileError`] naming the path.
pub async fn read_file_record(path: &Path) -> Result<FileRecord, FileError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| FileError::read(path, err))?;
    let contents = decode_utf8(&bytes).map_err(|err| FileError::decode(path, err))?;
    Ok(FileRecord::from_read(path, contents))
}
