use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// A file that was read to completion and decoded as UTF-8.
///
/// There is no public way to build a record other than [`FileRecord::from_read`],
/// so a record always stands for a finished read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    name: String,
    extension: String,
    contents: String,
}

impl FileRecord {
    /// Builds the record for `path` once its full contents are available.
    pub fn from_read(path: &Path, contents: String) -> Self {
        Self {
            name: file_name_of(path),
            extension: extension_of(path),
            contents,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }
}

/// Final path component, or an empty string for paths such as `/` or `..`.
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Suffix including the leading `.`; empty when the name has no extension.
///
/// Dotfiles such as `.bashrc` have no extension.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FileErrorKind {
    DialogCancelled,
    Busy,
    HostUnavailable,
    Read,
    Decode,
    Parse,
}

impl fmt::Display for FileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileErrorKind::DialogCancelled => write!(f, "dialog cancelled"),
            FileErrorKind::Busy => write!(f, "busy"),
            FileErrorKind::HostUnavailable => write!(f, "host unavailable"),
            FileErrorKind::Read => write!(f, "read error"),
            FileErrorKind::Decode => write!(f, "decode error"),
            FileErrorKind::Parse => write!(f, "parse error"),
        }
    }
}

/// In-band failure delivered on the `fileError` or `packageJson` port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct FileError {
    pub kind: FileErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl FileError {
    pub fn new(kind: FileErrorKind, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self {
            kind,
            message: message.into(),
            path,
        }
    }

    pub fn cancelled() -> Self {
        Self::new(FileErrorKind::DialogCancelled, "no file selected", None)
    }

    pub fn busy() -> Self {
        Self::new(
            FileErrorKind::Busy,
            "a file request is already in progress",
            None,
        )
    }

    pub fn host_unavailable() -> Self {
        Self::new(
            FileErrorKind::HostUnavailable,
            "host did not answer the file request",
            None,
        )
    }

    pub fn read(path: &Path, err: impl fmt::Display) -> Self {
        Self::new(
            FileErrorKind::Read,
            format!("failed to read {}: {err}", path.display()),
            Some(path.to_path_buf()),
        )
    }

    pub fn decode(path: &Path, err: impl fmt::Display) -> Self {
        Self::new(
            FileErrorKind::Decode,
            format!("failed to decode {}: {err}", path.display()),
            Some(path.to_path_buf()),
        )
    }

    pub fn parse(path: &Path, err: impl fmt::Display) -> Self {
        Self::new(
            FileErrorKind::Parse,
            format!("failed to parse {}: {err}", path.display()),
            Some(path.to_path_buf()),
        )
    }
}

/// Parsed manifest of arbitrary shape, or the reason it could not be produced.
pub type ManifestRecord = Result<serde_json::Value, FileError>;
