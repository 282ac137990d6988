use std::path::PathBuf;

use crate::{OutboundPort, RequestId};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send `get-file` to the host.
    RequestDialog { request_id: RequestId },
    ReadFile {
        request_id: RequestId,
        target: ReadTarget,
    },
    ReadManifest,
    /// Push a message to the embedded UI component.
    Deliver(OutboundPort),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadTarget {
    /// Path supplied by the UI, resolved against the install directory.
    InstallRelative(PathBuf),
    /// Path returned by the host dialog.
    Absolute(PathBuf),
}

impl ReadTarget {
    pub fn path(&self) -> &std::path::Path {
        match self {
            ReadTarget::InstallRelative(path) | ReadTarget::Absolute(path) => path,
        }
    }
}
