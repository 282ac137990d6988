use std::path::PathBuf;

use crate::{FileError, FileRecord, ManifestRecord, RequestId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The UI component finished loading (or reloading) and subscribed its ports.
    UiLoaded,
    /// `fetchFile` fired. `Some(path)` reads relative to the install directory,
    /// `None` asks the host for a dialog.
    FetchFileRequested { path: Option<PathBuf> },
    /// `get-file-reply` arrived for a request.
    DialogReplied {
        request_id: RequestId,
        paths: Vec<PathBuf>,
    },
    /// The host link closed before the request was answered.
    DialogUnavailable { request_id: RequestId },
    /// A file read finished, successfully or not.
    FileRead {
        request_id: RequestId,
        result: Result<FileRecord, FileError>,
    },
    /// `fetchPackageJson` fired.
    ManifestRequested,
    /// The manifest read finished.
    ManifestLoaded(ManifestRecord),
}
